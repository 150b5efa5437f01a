//! Global Urban Footprint (GUF) product definitions.
//!
//! The DLR WMS serves the GUF mosaic at two resolutions. Pixel values are
//! `255` for built-up areas, `0` for non-built-up surfaces and `128` where
//! there is no satellite coverage.

use std::fmt;
use std::str::FromStr;

use crate::coord::BoundingBox;

/// Pixel value the service uses for "no coverage".
pub const GUF_NODATA: u8 = 128;

/// Default WMS tile side in pixels.
pub const DEFAULT_TILE_SIZE: u32 = 2048;

/// Default cap on either output dimension.
pub const DEFAULT_MAX_PIXELS: u32 = 50_000;

const ARCSEC_PER_DEGREE: f64 = 3600.0;

/// Absorbs float noise such as `1.0 / 0.01 = 99.99999999999999`.
const DIMENSION_EPSILON: f64 = 1e-6;

/// Available GUF resolutions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GufResolution {
    /// 0.4 arcsec (~12 m)
    Arcsec04,
    /// 2.8 arcsec (~84 m)
    #[default]
    Arcsec28,
}

impl GufResolution {
    /// WMS layer identifier for this resolution.
    pub fn layer(&self) -> &'static str {
        match self {
            GufResolution::Arcsec04 => "GUF04_DLR_v1_Mosaic",
            GufResolution::Arcsec28 => "GUF28_DLR_v1_Mosaic",
        }
    }

    /// Label used on the command line, in file names and in metadata.
    pub fn label(&self) -> &'static str {
        match self {
            GufResolution::Arcsec04 => "0.4",
            GufResolution::Arcsec28 => "2.8",
        }
    }

    /// Resolution in arc seconds.
    pub fn arcsec(&self) -> f64 {
        match self {
            GufResolution::Arcsec04 => 0.4,
            GufResolution::Arcsec28 => 2.8,
        }
    }

    /// Resolution in degrees per pixel.
    pub fn degrees(&self) -> f64 {
        self.arcsec() / ARCSEC_PER_DEGREE
    }
}

impl fmt::Display for GufResolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for GufResolution {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "0.4" => Ok(GufResolution::Arcsec04),
            "2.8" => Ok(GufResolution::Arcsec28),
            other => Err(format!("unknown resolution '{}' (expected 0.4 or 2.8)", other)),
        }
    }
}

/// Output raster dimensions after applying the pixel cap.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OutputSize {
    pub width: u32,
    pub height: u32,
    /// Effective degrees per pixel along the axis that was capped last
    pub degrees_per_pixel: f64,
}

impl OutputSize {
    /// Effective resolution in arc seconds.
    pub fn effective_arcsec(&self) -> f64 {
        self.degrees_per_pixel * ARCSEC_PER_DEGREE
    }
}

/// Computes output dimensions for `bbox` at `degrees_per_pixel`.
///
/// Each dimension is truncated to whole pixels. If either exceeds
/// `max_pixels` it is clamped and the other dimension scaled to keep the
/// aspect ratio. Returns `None` when the area rounds to zero pixels.
pub fn output_size(bbox: &BoundingBox, degrees_per_pixel: f64, max_pixels: u32) -> Option<OutputSize> {
    if !(degrees_per_pixel > 0.0) || max_pixels == 0 {
        return None;
    }

    let mut res = degrees_per_pixel;
    let mut width = (bbox.width_deg() / res + DIMENSION_EPSILON).floor();
    let mut height = (bbox.height_deg() / res + DIMENSION_EPSILON).floor();
    let cap = max_pixels as f64;

    if width > cap {
        let scale = cap / width;
        width = cap;
        height = (height * scale).floor();
        res = bbox.width_deg() / width;
    }

    if height > cap {
        let scale = cap / height;
        height = cap;
        width = (width * scale).floor();
        res = bbox.height_deg() / height;
    }

    if width < 1.0 || height < 1.0 {
        return None;
    }

    Some(OutputSize {
        width: width as u32,
        height: height as u32,
        degrees_per_pixel: res,
    })
}

/// Default output file name, e.g. `guf_europe_2.8arcsec_cog.tif`.
pub fn default_output_name(region: &str, resolution: GufResolution) -> String {
    format!("guf_{}_{}arcsec_cog.tif", region, resolution.label())
}

/// File-level metadata written into the GeoTIFF.
pub fn metadata(
    resolution: GufResolution,
    bbox: &BoundingBox,
    failed_tiles: usize,
) -> Vec<(String, String)> {
    vec![
        (
            "DESCRIPTION".to_string(),
            format!(
                "Global Urban Footprint (GUF) - {} arcsec resolution",
                resolution.label()
            ),
        ),
        (
            "SOURCE".to_string(),
            "German Aerospace Center (DLR)".to_string(),
        ),
        (
            "LICENSE".to_string(),
            "Free for scientific and non-commercial use".to_string(),
        ),
        (
            "RESOLUTION_ARCSEC".to_string(),
            resolution.label().to_string(),
        ),
        ("BBOX".to_string(), bbox.to_string()),
        ("FAILED_TILES".to_string(), failed_tiles.to_string()),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layers() {
        assert_eq!(GufResolution::Arcsec04.layer(), "GUF04_DLR_v1_Mosaic");
        assert_eq!(GufResolution::Arcsec28.layer(), "GUF28_DLR_v1_Mosaic");
        assert_eq!(GufResolution::default(), GufResolution::Arcsec28);
    }

    #[test]
    fn test_parse_resolution() {
        assert_eq!("0.4".parse(), Ok(GufResolution::Arcsec04));
        assert_eq!("2.8".parse(), Ok(GufResolution::Arcsec28));
        assert!("1.0".parse::<GufResolution>().is_err());
    }

    #[test]
    fn test_output_size_unit_box() {
        let bbox = BoundingBox::new(0.0, 0.0, 1.0, 1.0).unwrap();
        let size = output_size(&bbox, 0.01, 50_000).unwrap();
        assert_eq!(size.width, 100);
        assert_eq!(size.height, 100);
    }

    #[test]
    fn test_output_size_guf28() {
        // 1 degree at 2.8 arcsec is 3600 / 2.8 = 1285.7 pixels
        let bbox = BoundingBox::new(8.0, 47.0, 9.0, 48.0).unwrap();
        let size = output_size(&bbox, GufResolution::Arcsec28.degrees(), 50_000).unwrap();
        assert_eq!(size.width, 1285);
        assert_eq!(size.height, 1285);
    }

    #[test]
    fn test_output_size_width_cap() {
        let bbox = BoundingBox::new(0.0, 0.0, 10.0, 5.0).unwrap();
        let size = output_size(&bbox, 0.01, 500).unwrap();
        assert_eq!(size.width, 500);
        assert_eq!(size.height, 250);
        assert!((size.degrees_per_pixel - 0.02).abs() < 1e-12);
    }

    #[test]
    fn test_output_size_height_cap() {
        let bbox = BoundingBox::new(0.0, 0.0, 5.0, 10.0).unwrap();
        let size = output_size(&bbox, 0.01, 500).unwrap();
        assert_eq!(size.height, 500);
        assert_eq!(size.width, 250);
    }

    #[test]
    fn test_output_size_too_small() {
        let bbox = BoundingBox::new(0.0, 0.0, 0.001, 1.0).unwrap();
        assert!(output_size(&bbox, 0.01, 50_000).is_none());
        assert!(output_size(&bbox, 0.0, 50_000).is_none());
    }

    #[test]
    fn test_default_output_name() {
        assert_eq!(
            default_output_name("europe", GufResolution::Arcsec28),
            "guf_europe_2.8arcsec_cog.tif"
        );
    }

    #[test]
    fn test_metadata_items() {
        let bbox = BoundingBox::new(0.0, 0.0, 1.0, 1.0).unwrap();
        let items = metadata(GufResolution::Arcsec04, &bbox, 3);
        let get = |k: &str| {
            items
                .iter()
                .find(|(key, _)| key == k)
                .map(|(_, v)| v.clone())
        };
        assert_eq!(get("RESOLUTION_ARCSEC").as_deref(), Some("0.4"));
        assert_eq!(get("BBOX").as_deref(), Some("0,0,1,1"));
        assert_eq!(get("FAILED_TILES").as_deref(), Some("3"));
    }
}
