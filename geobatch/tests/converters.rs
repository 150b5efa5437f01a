//! Integration tests for the format converters.
//!
//! Run with: `cargo test --test converters`

use std::fs;

use serde_json::{json, Value};
use tempfile::TempDir;

use geobatch::cog::{read_geotiff, write_cog, CogOptions, GeoTags, Raster};
use geobatch::convert::{
    csv_to_geojson, default_rgb_output, flows_to_geojson, gray_to_rgb, PointOptions,
};
use geobatch::coord::{BoundingBox, GeoTransform};

fn read_json(path: &std::path::Path) -> Value {
    serde_json::from_str(&fs::read_to_string(path).unwrap()).unwrap()
}

#[test]
fn test_gray_to_rgb_preserves_georeferencing() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("guf_custom_2.8arcsec_cog.tif");

    let pixels: Vec<u8> = (0..64 * 48)
        .map(|i| if i % 7 == 0 { 255 } else { 0 })
        .collect();
    let raster = Raster::new(64, 48, 1, pixels).unwrap();
    let bbox = BoundingBox::new(-1.0, 50.0, 1.0, 51.5).unwrap();
    let geo = GeoTags::wgs84(&GeoTransform::from_bounds(&bbox, 64, 48));
    let options = CogOptions {
        block_size: 32,
        ..CogOptions::default()
    };
    write_cog(&input, &raster, &geo, &options.clone().with_nodata(128)).unwrap();

    let output = default_rgb_output(&input);
    gray_to_rgb(&input, &output, &options).unwrap();
    assert_eq!(
        output.file_name().unwrap(),
        "guf_custom_2.8arcsec_cog_rgb.tif"
    );

    let source = read_geotiff(&input).unwrap();
    let converted = read_geotiff(&output).unwrap();
    assert_eq!(converted.raster.bands(), 3);
    assert_eq!(converted.geo, source.geo);
    assert_eq!(converted.nodata, Some(128));
    assert_eq!(converted.extra_images, source.extra_images);

    for y in 0..48 {
        for x in 0..64 {
            let gray = source.raster.sample(x, y, 0);
            for band in 0..3 {
                assert_eq!(converted.raster.sample(x, y, band), gray);
            }
        }
    }
}

#[test]
fn test_csv_points_end_to_end() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("cities.csv");
    let output = dir.path().join("cities.geojson");
    fs::write(
        &input,
        "name,lon,lat,population\nParis,2.35,48.86,2148000\nLyon,4.84,45.76,513000\nbad,,,0\n",
    )
    .unwrap();

    let options = PointOptions {
        lon_column: "lon".to_string(),
        lat_column: "lat".to_string(),
        properties: Some(vec!["name".to_string(), "population".to_string()]),
    };
    let summary = csv_to_geojson(&input, &output, &options).unwrap();
    assert_eq!(summary.features, 2);
    assert_eq!(summary.skipped, 1);

    let written = read_json(&output);
    assert_eq!(
        written["features"][0],
        json!({
            "type": "Feature",
            "geometry": {"type": "Point", "coordinates": [2.35, 48.86]},
            "properties": {"name": "Paris", "population": 2148000}
        })
    );
}

#[test]
fn test_flows_end_to_end() {
    let dir = TempDir::new().unwrap();
    let centroids = dir.path().join("cells.csv");
    let flows = dir.path().join("flows.csv");
    let output = dir.path().join("flows.geojson");
    fs::write(&centroids, "id,lon,lat\n10,0.5,0.5\n11,1.5,0.5\n12,2.5,0.5\n").unwrap();
    fs::write(
        &flows,
        ",origin,dest,flow\n0,10.0,11.0,4\n1,11,11,9\n2,12,10,2.5\n3,12,77,1\n",
    )
    .unwrap();

    let summary = flows_to_geojson(&centroids, &flows, &output).unwrap();
    assert_eq!(summary.total_rows, 4);
    assert_eq!(summary.self_flows, 1);
    assert_eq!(summary.unmatched, 1);
    assert_eq!(summary.flow_range, Some((2.5, 4.0)));

    let written = read_json(&output);
    let features = written["features"].as_array().unwrap();
    assert_eq!(features.len(), 2);
    assert_eq!(
        features[1]["geometry"]["coordinates"],
        json!([[2.5, 0.5], [0.5, 0.5]])
    );
    assert_eq!(features[1]["properties"]["origin"], json!(12));
    assert_eq!(features[1]["properties"]["dest"], json!(10));
}
