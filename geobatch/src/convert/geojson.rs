//! Minimal GeoJSON model.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::ConvertError;

/// Geometry types produced by the converters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Geometry {
    Point { coordinates: [f64; 2] },
    LineString { coordinates: Vec<[f64; 2]> },
}

/// A single feature.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename = "Feature")]
pub struct Feature {
    pub geometry: Geometry,
    pub properties: Map<String, Value>,
}

/// A `FeatureCollection`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "type", rename = "FeatureCollection")]
pub struct FeatureCollection {
    pub features: Vec<Feature>,
}

impl FeatureCollection {
    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    /// Writes compact JSON to `path`.
    pub fn write_to_path(&self, path: &Path) -> Result<(), ConvertError> {
        let mut writer = BufWriter::new(File::create(path)?);
        serde_json::to_writer(&mut writer, self)?;
        writer.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_point_feature_json() {
        let mut properties = Map::new();
        properties.insert("city".to_string(), json!("Bern"));
        let collection = FeatureCollection {
            features: vec![Feature {
                geometry: Geometry::Point {
                    coordinates: [7.44, 46.95],
                },
                properties,
            }],
        };

        let value = serde_json::to_value(&collection).unwrap();
        assert_eq!(
            value,
            json!({
                "type": "FeatureCollection",
                "features": [{
                    "type": "Feature",
                    "geometry": {"type": "Point", "coordinates": [7.44, 46.95]},
                    "properties": {"city": "Bern"}
                }]
            })
        );
    }

    #[test]
    fn test_line_string_json() {
        let geometry = Geometry::LineString {
            coordinates: vec![[0.0, 0.0], [1.0, 1.0]],
        };
        assert_eq!(
            serde_json::to_value(&geometry).unwrap(),
            json!({"type": "LineString", "coordinates": [[0.0, 0.0], [1.0, 1.0]]})
        );
    }

    #[test]
    fn test_empty_collection() {
        let value = serde_json::to_value(FeatureCollection::default()).unwrap();
        assert_eq!(value, json!({"type": "FeatureCollection", "features": []}));
    }
}
