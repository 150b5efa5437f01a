//! Grayscale GeoTIFF to RGB.

use std::path::{Path, PathBuf};

use tracing::info;

use super::ConvertError;
use crate::cog::{write_cog_from, BandLayout, CogOptions, CogSummary, GeoTiffRows, RowSource};

/// `<stem>_rgb<ext>` next to the input.
pub fn default_rgb_output(input: &Path) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let name = match input.extension() {
        Some(ext) => format!("{}_rgb.{}", stem, ext.to_string_lossy()),
        None => format!("{}_rgb", stem),
    };
    input.with_file_name(name)
}

/// Converts a single-band 8-bit GeoTIFF into a three-band RGB GeoTIFF.
///
/// The input is decoded one chunk row at a time and expanded while it is
/// written, so memory stays near one block row plus the overview levels.
/// Georeferencing, no-data and metadata are carried over; layout and
/// compression follow `options` (its `nodata` and `metadata` are replaced
/// by the input's).
pub fn gray_to_rgb(
    input: &Path,
    output: &Path,
    options: &CogOptions,
) -> Result<CogSummary, ConvertError> {
    if !input.exists() {
        return Err(ConvertError::NotFound(input.to_path_buf()));
    }

    let mut source = GeoTiffRows::open(input)?;
    if source.bands() != 1 {
        return Err(ConvertError::InvalidInput(format!(
            "expected a single-band raster, found {} bands",
            source.bands()
        )));
    }
    let geo = source.geo().cloned().ok_or_else(|| {
        ConvertError::InvalidInput(format!("{} is not georeferenced", input.display()))
    })?;
    info!(
        input = %input.display(),
        width = source.width(),
        height = source.height(),
        "Converting grayscale to RGB"
    );

    let metadata = source
        .metadata()
        .iter()
        .filter(|(name, _)| name != "OVERVIEW_RESAMPLING")
        .cloned()
        .collect();
    let options = CogOptions {
        nodata: source.nodata(),
        metadata,
        ..options.clone()
    };

    Ok(write_cog_from(
        output,
        &mut source,
        BandLayout::GrayToRgb,
        &geo,
        &options,
    )?)
}
