//! geobatch CLI - Command-line interface
//!
//! Thin wrapper over the geobatch library: each subcommand parses its
//! arguments, loads the shared configuration and hands off to a handler in
//! [`commands`].

mod commands;
mod error;
mod runner;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use geobatch::guf::{GufResolution, DEFAULT_MAX_PIXELS, DEFAULT_TILE_SIZE};

use commands::csv_to_geojson::CsvToGeoJsonArgs;
use commands::flows_to_geojson::FlowsToGeoJsonArgs;
use commands::gray_to_rgb::GrayToRgbArgs;
use commands::guf::GufArgs;
use runner::CliRunner;

#[derive(Parser)]
#[command(name = "geobatch")]
#[command(version, about = "Download and convert geospatial data", long_about = None)]
struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Config file (default: ~/.geobatch/config.ini)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Download Global Urban Footprint data as a tiled GeoTIFF with overviews
    Guf {
        /// Named region (global, europe, asia, africa, north_america, south_america, oceania)
        #[arg(long, conflicts_with = "bbox")]
        region: Option<String>,

        /// Custom bounding box as west,south,east,north
        #[arg(long, allow_hyphen_values = true)]
        bbox: Option<String>,

        /// Resolution in arc seconds (0.4 or 2.8)
        #[arg(long, default_value = "2.8")]
        resolution: GufResolution,

        /// Maximum WMS request side in pixels
        #[arg(long, default_value_t = DEFAULT_TILE_SIZE)]
        tile_size: u32,

        /// Cap on either output dimension in pixels
        #[arg(long, default_value_t = DEFAULT_MAX_PIXELS)]
        max_pixels: u32,

        /// Output file (default: guf_<region>_<res>arcsec_cog.tif)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Tile cache directory
        #[arg(long, conflicts_with = "no_cache")]
        cache_dir: Option<PathBuf>,

        /// Disable the tile cache
        #[arg(long)]
        no_cache: bool,
    },

    /// Convert a single-band GeoTIFF to three-band RGB
    #[command(name = "gray2rgb")]
    GrayToRgb {
        /// Input grayscale GeoTIFF
        input: PathBuf,

        /// Output file (default: <input>_rgb.<ext>)
        output: Option<PathBuf>,
    },

    /// Convert CSV rows to GeoJSON points
    #[command(name = "csv2geojson")]
    CsvToGeoJson {
        /// Input CSV with a header row
        input: PathBuf,

        /// Output GeoJSON file
        output: PathBuf,

        /// Longitude column
        #[arg(long, default_value = "x")]
        lon: String,

        /// Latitude column
        #[arg(long, default_value = "y")]
        lat: String,

        /// Comma-separated columns to keep as properties (default: all)
        #[arg(long, value_delimiter = ',')]
        properties: Option<Vec<String>>,
    },

    /// Convert an origin/destination flow table to GeoJSON lines
    #[command(name = "flows2geojson")]
    FlowsToGeoJson {
        /// Cell centroids CSV (id,lon,lat)
        centroids: PathBuf,

        /// Flows CSV (origin,dest,flow)
        flows: PathBuf,

        /// Output GeoJSON file
        #[arg(short, long)]
        output: PathBuf,
    },
}

fn main() {
    let cli = Cli::parse();

    let runner = match CliRunner::new(cli.verbose, cli.config.as_deref()) {
        Ok(runner) => runner,
        Err(e) => e.exit(),
    };

    let result = match cli.command {
        Commands::Guf {
            region,
            bbox,
            resolution,
            tile_size,
            max_pixels,
            output,
            cache_dir,
            no_cache,
        } => commands::guf::run(
            GufArgs {
                region,
                bbox,
                resolution,
                tile_size,
                max_pixels,
                output,
                cache_dir,
                no_cache,
            },
            &runner,
        ),

        Commands::GrayToRgb { input, output } => {
            commands::gray_to_rgb::run(GrayToRgbArgs { input, output }, &runner)
        }

        Commands::CsvToGeoJson {
            input,
            output,
            lon,
            lat,
            properties,
        } => commands::csv_to_geojson::run(
            CsvToGeoJsonArgs {
                input,
                output,
                lon,
                lat,
                properties,
            },
            &runner,
        ),

        Commands::FlowsToGeoJson {
            centroids,
            flows,
            output,
        } => commands::flows_to_geojson::run(
            FlowsToGeoJsonArgs {
                centroids,
                flows,
                output,
            },
            &runner,
        ),
    };

    if let Err(e) = result {
        e.exit();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_guf_defaults() {
        let cli = Cli::parse_from(["geobatch", "guf", "--region", "europe"]);
        match cli.command {
            Commands::Guf {
                region,
                resolution,
                tile_size,
                max_pixels,
                no_cache,
                ..
            } => {
                assert_eq!(region.as_deref(), Some("europe"));
                assert_eq!(resolution, GufResolution::Arcsec28);
                assert_eq!(tile_size, 2048);
                assert_eq!(max_pixels, 50_000);
                assert!(!no_cache);
            }
            _ => panic!("expected guf"),
        }
    }

    #[test]
    fn test_guf_negative_bbox() {
        let cli = Cli::parse_from(["geobatch", "guf", "--bbox", "-10,35,5,44", "--resolution", "0.4"]);
        match cli.command {
            Commands::Guf { bbox, resolution, .. } => {
                assert_eq!(bbox.as_deref(), Some("-10,35,5,44"));
                assert_eq!(resolution, GufResolution::Arcsec04);
            }
            _ => panic!("expected guf"),
        }
    }

    #[test]
    fn test_region_and_bbox_conflict() {
        assert!(Cli::try_parse_from([
            "geobatch", "guf", "--region", "europe", "--bbox", "0,0,1,1"
        ])
        .is_err());
    }

    #[test]
    fn test_csv_properties_list() {
        let cli = Cli::parse_from([
            "geobatch",
            "csv2geojson",
            "in.csv",
            "out.geojson",
            "--properties",
            "name,height",
        ]);
        match cli.command {
            Commands::CsvToGeoJson { properties, lon, .. } => {
                assert_eq!(
                    properties,
                    Some(vec!["name".to_string(), "height".to_string()])
                );
                assert_eq!(lon, "x");
            }
            _ => panic!("expected csv2geojson"),
        }
    }
}
