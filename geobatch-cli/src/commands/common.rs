//! Common helpers shared across CLI commands.

use std::path::PathBuf;

use geobatch::cache::default_cache_dir;
use geobatch::cog::CogOptions;
use geobatch::config::ConfigFile;
use indicatif::{ProgressBar, ProgressStyle};

/// Raster layout and compression from the `[output]` section.
pub fn cog_options(config: &ConfigFile) -> CogOptions {
    CogOptions {
        block_size: config.output.block_size,
        deflate_level: config.output.deflate_level,
        overview_factors: config.output.overviews.clone(),
        ..CogOptions::default()
    }
}

/// Resolve the tile cache directory from CLI args and config.
///
/// Returns `None` when caching is disabled or no directory can be found.
pub fn resolve_cache_dir(
    cli_dir: Option<PathBuf>,
    no_cache: bool,
    config: &ConfigFile,
) -> Option<PathBuf> {
    if no_cache {
        return None;
    }
    // CLI takes precedence, then config, then the platform cache dir
    cli_dir
        .or_else(|| config.cache.directory.clone())
        .or_else(default_cache_dir)
}

/// Progress bar for `total` tiles.
pub fn tile_progress_bar(total: u64) -> ProgressBar {
    let bar = ProgressBar::new(total);
    bar.set_style(
        ProgressStyle::with_template(
            "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} tiles ({eta}) {msg}",
        )
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("=>-"),
    );
    bar
}

/// Human-readable byte count.
pub fn format_bytes(bytes: u64) -> String {
    const UNITS: [&str; 4] = ["B", "KB", "MB", "GB"];
    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    if unit == 0 {
        format!("{} {}", bytes, UNITS[0])
    } else {
        format!("{:.1} {}", value, UNITS[unit])
    }
}
