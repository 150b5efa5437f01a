//! Small format converters
//!
//! - [`gray_to_rgb`]: single-band 8-bit GeoTIFF to three-band RGB
//! - [`csv_to_geojson`]: CSV rows to GeoJSON points
//! - [`flows_to_geojson`]: origin/destination flow table to GeoJSON lines

mod flows;
pub mod geojson;
mod points;
mod rgb;

pub use flows::{flows_to_geojson, read_centroids, read_flows, Centroids, FlowSummary};
pub use points::{csv_to_geojson, read_points, PointOptions, PointSummary};
pub use rgb::{default_rgb_output, gray_to_rgb};

use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::cog::CogError;

/// Errors from the converters.
#[derive(Debug, Error)]
pub enum ConvertError {
    #[error("input file not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Raster(#[from] CogError),

    #[error("missing column '{0}'")]
    MissingColumn(String),

    #[error("invalid {column} value '{value}'")]
    InvalidValue { column: String, value: String },

    #[error("invalid input: {0}")]
    InvalidInput(String),
}
