//! Raster I/O errors.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Errors reading or writing GeoTIFF files.
#[derive(Debug, Error)]
pub enum CogError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("TIFF error: {0}")]
    Tiff(String),

    #[error("invalid raster: {0}")]
    InvalidRaster(String),

    #[error("invalid options: {0}")]
    InvalidOptions(String),

    #[error("unsupported input {path}: {reason}")]
    Unsupported { path: PathBuf, reason: String },

    #[error("output exceeds the 4 GiB limit of classic TIFF")]
    FileTooLarge,
}

impl From<tiff::TiffError> for CogError {
    fn from(e: tiff::TiffError) -> Self {
        CogError::Tiff(e.to_string())
    }
}
