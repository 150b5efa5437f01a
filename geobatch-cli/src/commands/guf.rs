//! GUF command - download an area of the Global Urban Footprint as a tiled
//! GeoTIFF.

use std::path::PathBuf;
use std::time::Instant;

use geobatch::cache::DiskTileCache;
use geobatch::cog::{write_cog, GeoTags, Raster};
use geobatch::coord::resolve_area;
use geobatch::fetch::TileFetcher;
use geobatch::grid::TileGrid;
use geobatch::guf::{self, output_size, GufResolution};
use geobatch::mosaic::MosaicBuilder;
use geobatch::provider::{ReqwestClient, WmsProvider};
use tracing::{info, warn};

use super::common::{cog_options, format_bytes, resolve_cache_dir, tile_progress_bar};
use crate::error::CliError;
use crate::runner::CliRunner;

/// Arguments for the guf command.
pub struct GufArgs {
    pub region: Option<String>,
    pub bbox: Option<String>,
    pub resolution: GufResolution,
    pub tile_size: u32,
    pub max_pixels: u32,
    pub output: Option<PathBuf>,
    pub cache_dir: Option<PathBuf>,
    pub no_cache: bool,
}

/// Run the guf command.
pub fn run(args: GufArgs, runner: &CliRunner) -> Result<(), CliError> {
    runner.log_startup("guf");
    let config = runner.config();

    // Everything that can be rejected is checked before the first request
    let area = resolve_area(args.region.as_deref(), args.bbox.as_deref())?;
    if args.tile_size == 0 {
        return Err(CliError::Config("--tile-size must be at least 1".to_string()));
    }
    if args.max_pixels == 0 {
        return Err(CliError::Config("--max-pixels must be at least 1".to_string()));
    }

    let size = output_size(&area.bbox, args.resolution.degrees(), args.max_pixels).ok_or_else(
        || {
            CliError::Config(format!(
                "area {} is smaller than one pixel at {} arcsec",
                area.bbox, args.resolution
            ))
        },
    )?;
    let grid = TileGrid::new(
        area.bbox,
        size.width,
        size.height,
        args.tile_size,
        args.resolution.layer(),
    )?;

    let options = cog_options(config).with_nodata(config.output.nodata);
    options
        .validate()
        .map_err(|e| CliError::Config(e.to_string()))?;

    let output = args
        .output
        .unwrap_or_else(|| PathBuf::from(guf::default_output_name(&area.name, args.resolution)));
    let cache = resolve_cache_dir(args.cache_dir, args.no_cache, config).map(DiskTileCache::new);

    println!("Global Urban Footprint download:");
    println!("  Area: {} ({})", area.name, area.bbox);
    println!(
        "  Resolution: {} arcsec (effective {:.3} arcsec)",
        args.resolution,
        size.effective_arcsec()
    );
    println!("  Output: {}x{} px -> {}", size.width, size.height, output.display());
    println!(
        "  Tiles: {} ({} rows x {} cols, up to {} px)",
        grid.len(),
        grid.rows(),
        grid.cols(),
        grid.tile_size()
    );
    match &cache {
        Some(cache) => println!("  Cache: {}", cache.directory().display()),
        None => println!("  Cache: disabled"),
    }
    println!();

    if size.degrees_per_pixel > args.resolution.degrees() * (1.0 + 1e-9) {
        warn!(
            max_pixels = args.max_pixels,
            effective_arcsec = size.effective_arcsec(),
            "Output capped, resolution reduced"
        );
    }

    let client = ReqwestClient::with_timeout(config.wms.timeout)?;
    let provider = WmsProvider::with_endpoint(client, config.wms.endpoint.clone());
    let fetcher = TileFetcher::new(provider, cache, config.output.nodata);

    let start = Instant::now();
    let progress = tile_progress_bar(grid.len() as u64);
    let mut failed = 0usize;
    let mosaic = MosaicBuilder::new(&fetcher, config.output.nodata).build(&grid, |p| {
        if p.failed {
            failed += 1;
        }
        progress.set_position(p.completed as u64);
        if failed > 0 {
            progress.set_message(format!("{} failed", failed));
        }
    });
    progress.finish_and_clear();

    let report = mosaic.report;
    println!(
        "Fetched {} tiles in {:.1}s ({} cached, {} downloaded, {} failed)",
        report.total,
        start.elapsed().as_secs_f64(),
        report.from_cache,
        report.from_network,
        report.failed
    );
    for rect in &report.failed_rects {
        warn!(
            x = rect.x,
            y = rect.y,
            width = rect.width,
            height = rect.height,
            "Region left as no-data"
        );
    }

    let geo = GeoTags::wgs84(&grid.geo_transform());
    let options = options.with_metadata(guf::metadata(args.resolution, &area.bbox, report.failed));
    let summary = write_cog(&output, &Raster::from(mosaic.image), &geo, &options)?;

    info!(path = %output.display(), bytes = summary.bytes, "Output written");
    println!(
        "Wrote {} ({}, {} overviews)",
        output.display(),
        format_bytes(summary.bytes),
        summary.overview_factors.len()
    );
    if !report.is_complete() {
        println!(
            "Warning: {} tile(s) could not be fetched and were filled with no-data ({}).",
            report.failed, config.output.nodata
        );
        println!("Run the same command again to retry them; cached tiles are reused.");
    }

    Ok(())
}
