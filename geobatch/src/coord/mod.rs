//! Geographic coordinate types
//!
//! Bounding boxes in EPSG:4326 degrees, the fixed registry of named regions,
//! and the affine transform that places a raster on the globe.

mod region;
mod transform;
mod types;

pub use region::{
    parse_bbox, region_bbox, region_names, resolve_area, AreaSelection, CUSTOM_REGION_NAME,
};
pub use transform::GeoTransform;
pub use types::{BoundingBox, CoordError, MAX_LAT, MAX_LON, MIN_LAT, MIN_LON};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bbox_valid() {
        let bbox = BoundingBox::new(-10.0, -5.0, 10.0, 5.0).unwrap();
        assert_eq!(bbox.width_deg(), 20.0);
        assert_eq!(bbox.height_deg(), 10.0);
        assert!(bbox.contains(0.0, 0.0));
        assert!(!bbox.contains(11.0, 0.0));
    }

    #[test]
    fn test_bbox_out_of_range() {
        assert!(matches!(
            BoundingBox::new(-181.0, 0.0, 0.0, 1.0),
            Err(CoordError::InvalidLongitude(_))
        ));
        assert!(matches!(
            BoundingBox::new(0.0, -91.0, 1.0, 1.0),
            Err(CoordError::InvalidLatitude(_))
        ));
    }

    #[test]
    fn test_bbox_non_finite() {
        assert_eq!(
            BoundingBox::new(f64::NAN, 0.0, 1.0, 1.0),
            Err(CoordError::NonFinite("west"))
        );
    }

    #[test]
    fn test_bbox_display_matches_cli_order() {
        let bbox = BoundingBox::new(-25.0, 35.0, 45.0, 72.0).unwrap();
        assert_eq!(bbox.to_string(), "-25,35,45,72");
        assert_eq!(parse_bbox(&bbox.to_string()).unwrap(), bbox);
    }

    #[test]
    fn test_error_display() {
        let err = CoordError::MalformedBbox("1,2".to_string());
        assert!(err.to_string().contains("west,south,east,north"));
    }
}
