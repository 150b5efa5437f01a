//! In-memory 8-bit rasters.

use image::GrayImage;

use super::CogError;

/// Pixel-interleaved 8-bit raster with one (gray) or three (RGB) bands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Raster {
    width: u32,
    height: u32,
    bands: u16,
    pixels: Vec<u8>,
}

impl Raster {
    /// Wraps interleaved samples.
    pub fn new(width: u32, height: u32, bands: u16, pixels: Vec<u8>) -> Result<Self, CogError> {
        if width == 0 || height == 0 {
            return Err(CogError::InvalidRaster(format!(
                "dimensions must be positive, got {}x{}",
                width, height
            )));
        }
        if bands != 1 && bands != 3 {
            return Err(CogError::InvalidRaster(format!(
                "expected 1 or 3 bands, got {}",
                bands
            )));
        }
        let expected = width as usize * height as usize * bands as usize;
        if pixels.len() != expected {
            return Err(CogError::InvalidRaster(format!(
                "expected {} samples, got {}",
                expected,
                pixels.len()
            )));
        }
        Ok(Self {
            width,
            height,
            bands,
            pixels,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn bands(&self) -> u16 {
        self.bands
    }

    /// Interleaved samples, row-major.
    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    /// Samples of row `y` (`width × bands` bytes).
    pub fn row(&self, y: u32) -> &[u8] {
        let stride = self.width as usize * self.bands as usize;
        let start = y as usize * stride;
        &self.pixels[start..start + stride]
    }

    /// Sample at (`x`, `y`) in `band`.
    pub fn sample(&self, x: u32, y: u32, band: u16) -> u8 {
        let index = (y as usize * self.width as usize + x as usize) * self.bands as usize
            + band as usize;
        self.pixels[index]
    }
}

impl From<GrayImage> for Raster {
    fn from(image: GrayImage) -> Self {
        let (width, height) = image.dimensions();
        Self {
            width,
            height,
            bands: 1,
            pixels: image.into_raw(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Luma;

    #[test]
    fn test_new_validates() {
        assert!(Raster::new(2, 2, 1, vec![0; 4]).is_ok());
        assert!(Raster::new(2, 2, 3, vec![0; 12]).is_ok());
        assert!(Raster::new(2, 2, 2, vec![0; 8]).is_err());
        assert!(Raster::new(2, 2, 1, vec![0; 5]).is_err());
        assert!(Raster::new(0, 2, 1, vec![]).is_err());
    }

    #[test]
    fn test_sample_and_row() {
        let raster = Raster::new(2, 2, 3, (0..12).collect()).unwrap();
        assert_eq!(raster.sample(1, 0, 2), 5);
        assert_eq!(raster.sample(0, 1, 0), 6);
        assert_eq!(raster.row(1), &[6, 7, 8, 9, 10, 11]);
    }

    #[test]
    fn test_from_gray_image() {
        let image = GrayImage::from_pixel(3, 2, Luma([42]));
        let raster = Raster::from(image);
        assert_eq!((raster.width(), raster.height(), raster.bands()), (3, 2, 1));
        assert_eq!(raster.pixels(), &[42; 6]);
    }
}
