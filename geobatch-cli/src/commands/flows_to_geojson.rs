//! flows2geojson command - origin/destination flows to GeoJSON lines.

use std::path::PathBuf;

use geobatch::convert::flows_to_geojson;

use crate::error::CliError;
use crate::runner::CliRunner;

/// Arguments for the flows2geojson command.
pub struct FlowsToGeoJsonArgs {
    pub centroids: PathBuf,
    pub flows: PathBuf,
    pub output: PathBuf,
}

/// Run the flows2geojson command.
pub fn run(args: FlowsToGeoJsonArgs, runner: &CliRunner) -> Result<(), CliError> {
    runner.log_startup("flows2geojson");

    let summary = flows_to_geojson(&args.centroids, &args.flows, &args.output)?;

    println!("Flow rows: {}", summary.total_rows);
    println!("  Self-flows removed: {}", summary.self_flows);
    println!("  Unmatched cell ids: {}", summary.unmatched);
    println!(
        "Wrote {} line(s) to {}",
        summary.features,
        args.output.display()
    );
    if let Some((min, max)) = summary.flow_range {
        println!("Flow range: {} - {}", min, max);
    }
    Ok(())
}
