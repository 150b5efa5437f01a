//! geobatch - batch conversion utilities for geospatial data
//!
//! The centrepiece is the tiled WMS mosaic builder: a bounding box is split
//! into a grid of sub-requests, each sub-request is fetched (or read from a
//! content-addressed disk cache), the blocks are stitched into one 8-bit
//! buffer, and the buffer is written as a tiled, DEFLATE-compressed GeoTIFF
//! with internal overviews.
//!
//! Alongside it live a few small converters: grayscale GeoTIFF to RGB, CSV
//! points to GeoJSON, and origin/destination flows to GeoJSON lines.
//!
//! # Example
//!
//! ```ignore
//! use geobatch::coord::BoundingBox;
//! use geobatch::grid::TileGrid;
//! use geobatch::fetch::TileFetcher;
//! use geobatch::mosaic::MosaicBuilder;
//! use geobatch::provider::{ReqwestClient, WmsProvider};
//!
//! let bbox = BoundingBox::new(5.9, 45.8, 10.5, 47.8)?;
//! let grid = TileGrid::new(bbox, 4000, 2000, 2048, "GUF28_DLR_v1_Mosaic")?;
//! let provider = WmsProvider::new(ReqwestClient::new()?);
//! let fetcher = TileFetcher::new(provider, None, 128);
//! let mosaic = MosaicBuilder::new(&fetcher, 128).build(&grid, |_| {});
//! ```

pub mod cache;
pub mod cog;
pub mod config;
pub mod convert;
pub mod coord;
pub mod fetch;
pub mod grid;
pub mod guf;
pub mod logging;
pub mod mosaic;
pub mod provider;

/// Library version, written into output metadata.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
