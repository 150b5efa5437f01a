//! CLI command implementations.
//!
//! # Command Modules
//!
//! - [`guf`] - Download a GUF area as a tiled GeoTIFF
//! - [`gray_to_rgb`] - Expand a grayscale GeoTIFF to RGB
//! - [`csv_to_geojson`] - CSV points to GeoJSON
//! - [`flows_to_geojson`] - Flow table to GeoJSON lines

pub mod common;
pub mod csv_to_geojson;
pub mod flows_to_geojson;
pub mod gray_to_rgb;
pub mod guf;
