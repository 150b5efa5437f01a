//! csv2geojson command - CSV rows to GeoJSON points.

use std::path::PathBuf;

use geobatch::convert::{csv_to_geojson, PointOptions};

use crate::error::CliError;
use crate::runner::CliRunner;

/// Arguments for the csv2geojson command.
pub struct CsvToGeoJsonArgs {
    pub input: PathBuf,
    pub output: PathBuf,
    pub lon: String,
    pub lat: String,
    pub properties: Option<Vec<String>>,
}

/// Run the csv2geojson command.
pub fn run(args: CsvToGeoJsonArgs, runner: &CliRunner) -> Result<(), CliError> {
    runner.log_startup("csv2geojson");

    let options = PointOptions {
        lon_column: args.lon,
        lat_column: args.lat,
        properties: args.properties,
    };
    let summary = csv_to_geojson(&args.input, &args.output, &options)?;

    println!(
        "Wrote {} point(s) to {}",
        summary.features,
        args.output.display()
    );
    if summary.skipped > 0 {
        println!("Skipped {} row(s) without valid coordinates", summary.skipped);
    }
    if let Some([west, south, east, north]) = summary.bounds {
        println!("Extent: {},{},{},{}", west, south, east, north);
    }
    Ok(())
}
