//! gray2rgb command - expand a single-band GeoTIFF to RGB.

use std::path::PathBuf;

use geobatch::convert::{default_rgb_output, gray_to_rgb};

use super::common::{cog_options, format_bytes};
use crate::error::CliError;
use crate::runner::CliRunner;

/// Arguments for the gray2rgb command.
pub struct GrayToRgbArgs {
    pub input: PathBuf,
    pub output: Option<PathBuf>,
}

/// Run the gray2rgb command.
pub fn run(args: GrayToRgbArgs, runner: &CliRunner) -> Result<(), CliError> {
    runner.log_startup("gray2rgb");

    let output = args
        .output
        .unwrap_or_else(|| default_rgb_output(&args.input));

    println!("Converting {} -> {}", args.input.display(), output.display());
    let summary = gray_to_rgb(&args.input, &output, &cog_options(runner.config()))?;

    println!(
        "Wrote {}x{} RGB raster ({}, {} overviews)",
        summary.width,
        summary.height,
        format_bytes(summary.bytes),
        summary.overview_factors.len()
    );
    Ok(())
}
