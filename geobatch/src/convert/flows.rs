//! Origin/destination flows to GeoJSON lines.
//!
//! Cell centroids come from a CSV table with `id`, `lon` and `lat` columns.
//! Flows come from a CSV with `origin`, `dest` and `flow` columns; any other
//! columns (such as a leading unnamed index) are ignored.

use std::collections::HashMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use serde::Deserialize;
use serde_json::{json, Map};
use tracing::info;

use super::geojson::{Feature, FeatureCollection, Geometry};
use super::ConvertError;

/// Cell id → (lon, lat).
pub type Centroids = HashMap<i64, [f64; 2]>;

#[derive(Debug, Deserialize)]
struct CentroidRow {
    id: String,
    lon: f64,
    lat: f64,
}

#[derive(Debug, Deserialize)]
struct FlowRow {
    origin: String,
    dest: String,
    flow: f64,
}

/// Outcome of a flow conversion.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FlowSummary {
    /// Rows in the flow table
    pub total_rows: usize,
    /// Rows dropped because origin == dest
    pub self_flows: usize,
    /// Rows dropped because an id has no centroid
    pub unmatched: usize,
    pub features: usize,
    /// (min, max) flow over the written features
    pub flow_range: Option<(f64, f64)>,
}

/// Joins `flows` with `centroids` and writes a LineString collection.
pub fn flows_to_geojson(
    centroids: &Path,
    flows: &Path,
    output: &Path,
) -> Result<FlowSummary, ConvertError> {
    for path in [centroids, flows] {
        if !path.exists() {
            return Err(ConvertError::NotFound(path.to_path_buf()));
        }
    }

    let table = read_centroids(File::open(centroids)?)?;
    info!(cells = table.len(), "Loaded centroids");

    let (collection, summary) = read_flows(File::open(flows)?, &table)?;
    collection.write_to_path(output)?;

    info!(
        rows = summary.total_rows,
        self_flows = summary.self_flows,
        unmatched = summary.unmatched,
        features = summary.features,
        output = %output.display(),
        "Converted flows to GeoJSON lines"
    );
    if let Some((min, max)) = summary.flow_range {
        info!(min, max, "Flow range");
    }
    Ok(summary)
}

/// Reads an `id,lon,lat` table.
pub fn read_centroids<R: Read>(reader: R) -> Result<Centroids, ConvertError> {
    let mut csv_reader = csv::Reader::from_reader(reader);
    let mut table = Centroids::new();

    for row in csv_reader.deserialize() {
        let row: CentroidRow = row?;
        let id = parse_id(&row.id)?;
        table.insert(id, [row.lon, row.lat]);
    }
    Ok(table)
}

/// Builds LineString features for every flow whose ends are both known.
pub fn read_flows<R: Read>(
    reader: R,
    centroids: &Centroids,
) -> Result<(FeatureCollection, FlowSummary), ConvertError> {
    let mut csv_reader = csv::Reader::from_reader(reader);
    let mut collection = FeatureCollection::default();
    let mut summary = FlowSummary::default();

    for row in csv_reader.deserialize() {
        let row: FlowRow = row?;
        summary.total_rows += 1;

        let origin = parse_id(&row.origin)?;
        let dest = parse_id(&row.dest)?;
        if origin == dest {
            summary.self_flows += 1;
            continue;
        }

        let (Some(from), Some(to)) = (centroids.get(&origin), centroids.get(&dest)) else {
            summary.unmatched += 1;
            continue;
        };

        let mut properties = Map::new();
        properties.insert("flow".to_string(), json!(row.flow));
        properties.insert("origin".to_string(), json!(origin));
        properties.insert("dest".to_string(), json!(dest));

        summary.flow_range = Some(match summary.flow_range {
            None => (row.flow, row.flow),
            Some((min, max)) => (min.min(row.flow), max.max(row.flow)),
        });
        collection.features.push(Feature {
            geometry: Geometry::LineString {
                coordinates: vec![*from, *to],
            },
            properties,
        });
    }

    summary.features = collection.len();
    Ok((collection, summary))
}

/// Parses a cell id, accepting integral floats such as `12.0`.
fn parse_id(raw: &str) -> Result<i64, ConvertError> {
    let trimmed = raw.trim();
    if let Ok(id) = trimmed.parse::<i64>() {
        return Ok(id);
    }
    match trimmed.parse::<f64>() {
        Ok(v) if v.fract() == 0.0 && v.abs() < i64::MAX as f64 => Ok(v as i64),
        _ => Err(ConvertError::InvalidValue {
            column: "id".to_string(),
            value: raw.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;
    use tempfile::TempDir;

    const CENTROIDS: &str = "id,lon,lat\n1,6.1,46.2\n2,6.6,46.5\n3,7.0,46.8\n";
    const FLOWS: &str = ",origin,dest,flow\n\
                         0,1,2,15\n\
                         1,2,2,40\n\
                         2,2,3,3.5\n\
                         3,1,99,8\n";

    #[test]
    fn test_parse_id() {
        assert_eq!(parse_id("12").unwrap(), 12);
        assert_eq!(parse_id(" 12.0 ").unwrap(), 12);
        assert!(parse_id("12.5").is_err());
        assert!(parse_id("cell").is_err());
    }

    #[test]
    fn test_read_centroids() {
        let table = read_centroids(CENTROIDS.as_bytes()).unwrap();
        assert_eq!(table.len(), 3);
        assert_eq!(table[&2], [6.6, 46.5]);
    }

    #[test]
    fn test_read_flows() {
        let table = read_centroids(CENTROIDS.as_bytes()).unwrap();
        let (collection, summary) = read_flows(FLOWS.as_bytes(), &table).unwrap();

        assert_eq!(summary.total_rows, 4);
        assert_eq!(summary.self_flows, 1);
        assert_eq!(summary.unmatched, 1);
        assert_eq!(summary.features, 2);
        assert_eq!(summary.flow_range, Some((3.5, 15.0)));

        let first = &collection.features[0];
        assert_eq!(
            first.geometry,
            Geometry::LineString {
                coordinates: vec![[6.1, 46.2], [6.6, 46.5]]
            }
        );
        assert_eq!(first.properties["flow"], json!(15.0));
        assert_eq!(first.properties["origin"], json!(1));
        assert_eq!(first.properties["dest"], json!(2));
    }

    #[test]
    fn test_flows_to_geojson_file() {
        let dir = TempDir::new().unwrap();
        let centroids = dir.path().join("cells.csv");
        let flows = dir.path().join("flows.csv");
        let output = dir.path().join("flows.geojson");
        std::fs::write(&centroids, CENTROIDS).unwrap();
        std::fs::write(&flows, FLOWS).unwrap();

        let summary = flows_to_geojson(&centroids, &flows, &output).unwrap();
        assert_eq!(summary.features, 2);

        let written: Value =
            serde_json::from_str(&std::fs::read_to_string(&output).unwrap()).unwrap();
        assert_eq!(written["features"][1]["geometry"]["type"], json!("LineString"));
    }

    #[test]
    fn test_missing_centroids_file() {
        let dir = TempDir::new().unwrap();
        let flows = dir.path().join("flows.csv");
        std::fs::write(&flows, FLOWS).unwrap();
        assert!(matches!(
            flows_to_geojson(&dir.path().join("absent.csv"), &flows, &dir.path().join("o")),
            Err(ConvertError::NotFound(_))
        ));
    }
}
