//! Pixel ↔ geographic affine transform.

use super::BoundingBox;

/// North-up affine transform from pixel space to geographic degrees.
///
/// Coefficients follow the GDAL ordering:
/// `lon = c[0] + px * c[1] + py * c[2]`, `lat = c[3] + px * c[4] + py * c[5]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoTransform {
    coefficients: [f64; 6],
}

impl GeoTransform {
    /// Builds the transform that stretches `bbox` over a `width` × `height` raster.
    ///
    /// Pixel (0, 0) maps to (west, north) and pixel (width, height) maps to
    /// (east, south).
    pub fn from_bounds(bbox: &BoundingBox, width: u32, height: u32) -> Self {
        let pixel_width = bbox.width_deg() / width as f64;
        let pixel_height = bbox.height_deg() / height as f64;
        Self {
            coefficients: [bbox.west, pixel_width, 0.0, bbox.north, 0.0, -pixel_height],
        }
    }

    /// Builds a transform from a GeoTIFF tiepoint and pixel scale.
    ///
    /// The tiepoint ties raster position (i, j) to model (x, y); only the
    /// common north-up case is supported.
    pub fn from_tiepoint(tiepoint: &[f64], pixel_scale: &[f64]) -> Option<Self> {
        if tiepoint.len() < 6 || pixel_scale.len() < 2 {
            return None;
        }
        let (i, j, x, y) = (tiepoint[0], tiepoint[1], tiepoint[3], tiepoint[4]);
        let (sx, sy) = (pixel_scale[0], pixel_scale[1]);
        Some(Self {
            coefficients: [x - i * sx, sx, 0.0, y + j * sy, 0.0, -sy],
        })
    }

    /// Longitude of the raster's left edge.
    pub fn origin_x(&self) -> f64 {
        self.coefficients[0]
    }

    /// Latitude of the raster's top edge.
    pub fn origin_y(&self) -> f64 {
        self.coefficients[3]
    }

    /// Degrees per pixel along x (always positive for north-up rasters).
    pub fn pixel_width(&self) -> f64 {
        self.coefficients[1]
    }

    /// Degrees per pixel along y, as a positive number.
    pub fn pixel_height(&self) -> f64 {
        -self.coefficients[5]
    }

    /// Maps a (possibly fractional) pixel position to (lon, lat).
    pub fn pixel_to_geo(&self, px: f64, py: f64) -> (f64, f64) {
        let c = &self.coefficients;
        (c[0] + px * c[1] + py * c[2], c[3] + px * c[4] + py * c[5])
    }

    /// GeoTIFF `ModelPixelScale` values: `[sx, sy, 0]`.
    pub fn model_pixel_scale(&self) -> [f64; 3] {
        [self.pixel_width(), self.pixel_height(), 0.0]
    }

    /// GeoTIFF `ModelTiepoint` values tying pixel (0, 0) to the origin.
    pub fn model_tiepoint(&self) -> [f64; 6] {
        [0.0, 0.0, 0.0, self.origin_x(), self.origin_y(), 0.0]
    }
}
