//! GeoTIFF output with internal tiling and overviews
//!
//! Pure-Rust writer built on the `tiff` encoder's low-level directory API:
//! 8-bit gray or RGB, square DEFLATE blocks with the horizontal predictor,
//! EPSG:4326 GeoKeys, `GDAL_NODATA` and `GDAL_METADATA`, and averaged
//! reduced-resolution IFDs. A matching reader lets converters carry
//! georeferencing from one file to the next.
//!
//! The layout is tiled with internal overviews but not strict COG ordering:
//! each IFD is written after its own image data, and the overviews follow
//! the full-resolution image instead of preceding it.
//!
//! # Example
//!
//! ```ignore
//! use geobatch::cog::{write_cog, CogOptions, GeoTags, Raster};
//!
//! let geo = GeoTags::wgs84(&grid.geo_transform());
//! let options = CogOptions::default().with_nodata(128);
//! write_cog(Path::new("out.tif"), &Raster::from(image), &geo, &options)?;
//! ```

mod error;
mod geo;
pub mod metadata;
mod options;
pub mod overview;
mod raster;
mod reader;
mod writer;

pub use error::CogError;
pub use geo::GeoTags;
pub use options::{CogOptions, DEFAULT_BLOCK_SIZE, DEFAULT_DEFLATE_LEVEL, DEFAULT_OVERVIEW_FACTORS};
pub use raster::Raster;
pub use reader::{read_geotiff, GeoRaster, GeoTiffRows};
pub use writer::{write_cog, write_cog_from, write_to, BandLayout, CogSummary, RowSource};
