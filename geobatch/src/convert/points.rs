//! CSV rows to GeoJSON points.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use serde_json::{Map, Number, Value};
use tracing::{debug, info};

use super::geojson::{Feature, FeatureCollection, Geometry};
use super::ConvertError;

/// Column selection for [`csv_to_geojson`].
#[derive(Debug, Clone, PartialEq)]
pub struct PointOptions {
    pub lon_column: String,
    pub lat_column: String,
    /// Columns to keep as properties; `None` keeps every non-coordinate column
    pub properties: Option<Vec<String>>,
}

impl Default for PointOptions {
    fn default() -> Self {
        Self {
            lon_column: "x".to_string(),
            lat_column: "y".to_string(),
            properties: None,
        }
    }
}

/// Outcome of a point conversion.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PointSummary {
    pub features: usize,
    /// Rows whose coordinates did not parse
    pub skipped: usize,
    /// (min_lon, min_lat, max_lon, max_lat) over all written points
    pub bounds: Option<[f64; 4]>,
}

/// Converts a headed CSV file into a point `FeatureCollection` file.
pub fn csv_to_geojson(
    input: &Path,
    output: &Path,
    options: &PointOptions,
) -> Result<PointSummary, ConvertError> {
    if !input.exists() {
        return Err(ConvertError::NotFound(input.to_path_buf()));
    }

    let (collection, summary) = read_points(File::open(input)?, options)?;
    collection.write_to_path(output)?;

    info!(
        input = %input.display(),
        output = %output.display(),
        features = summary.features,
        skipped = summary.skipped,
        "Converted CSV to GeoJSON points"
    );
    if let Some([min_lon, min_lat, max_lon, max_lat]) = summary.bounds {
        info!(min_lon, min_lat, max_lon, max_lat, "Point extent");
    }
    Ok(summary)
}

/// Reads points from CSV data.
pub fn read_points<R: Read>(
    reader: R,
    options: &PointOptions,
) -> Result<(FeatureCollection, PointSummary), ConvertError> {
    let mut csv_reader = csv::Reader::from_reader(reader);
    let headers = csv_reader.headers()?.clone();

    let column = |name: &str| {
        headers
            .iter()
            .position(|h| h == name)
            .ok_or_else(|| ConvertError::MissingColumn(name.to_string()))
    };
    let lon_index = column(&options.lon_column)?;
    let lat_index = column(&options.lat_column)?;

    let property_columns: Vec<(usize, String)> = match &options.properties {
        Some(names) => names
            .iter()
            .map(|name| Ok((column(name)?, name.clone())))
            .collect::<Result<_, ConvertError>>()?,
        None => headers
            .iter()
            .enumerate()
            .filter(|(i, _)| *i != lon_index && *i != lat_index)
            .map(|(i, name)| (i, name.to_string()))
            .collect(),
    };

    let mut collection = FeatureCollection::default();
    let mut summary = PointSummary::default();

    for (line, record) in csv_reader.records().enumerate() {
        let record = record?;
        let lon = record.get(lon_index).and_then(parse_coordinate);
        let lat = record.get(lat_index).and_then(parse_coordinate);
        let (Some(lon), Some(lat)) = (lon, lat) else {
            debug!(row = line + 1, "Skipping row with unparsable coordinates");
            summary.skipped += 1;
            continue;
        };

        let mut properties = Map::new();
        for (index, name) in &property_columns {
            let raw = record.get(*index).unwrap_or("");
            properties.insert(name.clone(), typed_value(raw));
        }

        extend_bounds(&mut summary.bounds, lon, lat);
        collection.features.push(Feature {
            geometry: Geometry::Point {
                coordinates: [lon, lat],
            },
            properties,
        });
    }

    summary.features = collection.len();
    Ok((collection, summary))
}

fn parse_coordinate(raw: &str) -> Option<f64> {
    raw.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Integers become JSON integers, other finite numbers floats, anything
/// else a string.
pub(crate) fn typed_value(raw: &str) -> Value {
    let trimmed = raw.trim();
    if let Ok(int) = trimmed.parse::<i64>() {
        return Value::Number(int.into());
    }
    if let Some(number) = trimmed.parse::<f64>().ok().and_then(Number::from_f64) {
        return Value::Number(number);
    }
    Value::String(raw.to_string())
}

fn extend_bounds(bounds: &mut Option<[f64; 4]>, lon: f64, lat: f64) {
    *bounds = Some(match *bounds {
        None => [lon, lat, lon, lat],
        Some([w, s, e, n]) => [w.min(lon), s.min(lat), e.max(lon), n.max(lat)],
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    const SAMPLE: &str = "city,x,y,height_fit,year\n\
                          Beijing,116.4,39.9,12.5,2015-01-01\n\
                          Shanghai,121.5,31.2,18,2016-01-01\n\
                          Nowhere,n/a,30.0,1,2017-01-01\n";

    #[test]
    fn test_typed_values() {
        assert_eq!(typed_value("42"), json!(42));
        assert_eq!(typed_value("-7"), json!(-7));
        assert_eq!(typed_value("12.5"), json!(12.5));
        assert_eq!(typed_value("Beijing"), json!("Beijing"));
        assert_eq!(typed_value("2015-01-01"), json!("2015-01-01"));
        assert_eq!(typed_value("NaN"), json!("NaN"));
    }

    #[test]
    fn test_read_points_default_columns() {
        let (collection, summary) =
            read_points(SAMPLE.as_bytes(), &PointOptions::default()).unwrap();

        assert_eq!(summary.features, 2);
        assert_eq!(summary.skipped, 1);
        assert_eq!(summary.bounds, Some([116.4, 31.2, 121.5, 39.9]));

        let first = &collection.features[0];
        assert_eq!(
            first.geometry,
            Geometry::Point {
                coordinates: [116.4, 39.9]
            }
        );
        assert_eq!(first.properties["city"], json!("Beijing"));
        assert_eq!(first.properties["height_fit"], json!(12.5));
        assert!(!first.properties.contains_key("x"));
        assert_eq!(collection.features[1].properties["height_fit"], json!(18));
    }

    #[test]
    fn test_selected_properties() {
        let options = PointOptions {
            properties: Some(vec!["city".to_string()]),
            ..PointOptions::default()
        };
        let (collection, _) = read_points(SAMPLE.as_bytes(), &options).unwrap();
        assert_eq!(collection.features[0].properties.len(), 1);
    }

    #[test]
    fn test_custom_coordinate_columns() {
        let data = "lng,lat,name\n8.5,47.4,Zurich\n";
        let options = PointOptions {
            lon_column: "lng".to_string(),
            lat_column: "lat".to_string(),
            properties: None,
        };
        let (collection, summary) = read_points(data.as_bytes(), &options).unwrap();
        assert_eq!(summary.features, 1);
        assert_eq!(collection.features[0].properties["name"], json!("Zurich"));
    }

    #[test]
    fn test_missing_column() {
        let options = PointOptions {
            lon_column: "lon".to_string(),
            ..PointOptions::default()
        };
        assert!(matches!(
            read_points(SAMPLE.as_bytes(), &options),
            Err(ConvertError::MissingColumn(c)) if c == "lon"
        ));
    }

    #[test]
    fn test_csv_to_geojson_file() {
        let dir = TempDir::new().unwrap();
        let input = dir.path().join("points.csv");
        let output = dir.path().join("points.geojson");
        std::fs::write(&input, SAMPLE).unwrap();

        let summary = csv_to_geojson(&input, &output, &PointOptions::default()).unwrap();
        assert_eq!(summary.features, 2);

        let written: Value =
            serde_json::from_str(&std::fs::read_to_string(&output).unwrap()).unwrap();
        assert_eq!(written["type"], json!("FeatureCollection"));
        assert_eq!(written["features"].as_array().unwrap().len(), 2);
    }

    #[test]
    fn test_missing_input() {
        let dir = TempDir::new().unwrap();
        assert!(matches!(
            csv_to_geojson(
                &dir.path().join("absent.csv"),
                &dir.path().join("out.geojson"),
                &PointOptions::default()
            ),
            Err(ConvertError::NotFound(_))
        ));
    }
}
