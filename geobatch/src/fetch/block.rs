//! Decoded single-band pixel blocks.

use image::{DynamicImage, GrayImage};
use serde::{Deserialize, Serialize};

use super::FetchError;

/// `width × height` 8-bit samples in row-major order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TileBlock {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
}

impl TileBlock {
    /// Wraps raw samples, checking the length matches the dimensions.
    pub fn new(width: u32, height: u32, pixels: Vec<u8>) -> Result<Self, FetchError> {
        let expected = width as usize * height as usize;
        if pixels.len() != expected {
            return Err(FetchError::BufferLength {
                expected,
                actual: pixels.len(),
            });
        }
        Ok(Self {
            width,
            height,
            pixels,
        })
    }

    /// Block of uniform value.
    pub fn filled(width: u32, height: u32, value: u8) -> Self {
        Self {
            width,
            height,
            pixels: vec![value; width as usize * height as usize],
        }
    }

    /// Decodes an encoded image, keeping only the first channel.
    pub fn decode(bytes: &[u8]) -> Result<Self, FetchError> {
        let image =
            image::load_from_memory(bytes).map_err(|e| FetchError::Decode(e.to_string()))?;
        let (width, height) = (image.width(), image.height());

        let pixels = match image {
            DynamicImage::ImageLuma8(gray) => gray.into_raw(),
            other => other.to_rgba8().pixels().map(|p| p.0[0]).collect(),
        };

        Self::new(width, height, pixels)
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    /// True when the sample count matches the dimensions.
    ///
    /// Blocks built through the constructors always are; deserialized ones
    /// may not be.
    pub fn is_consistent(&self) -> bool {
        self.pixels.len() == self.width as usize * self.height as usize
    }

    /// Converts into an `image` buffer for compositing.
    pub fn into_gray_image(self) -> Result<GrayImage, FetchError> {
        let expected = self.width as usize * self.height as usize;
        let actual = self.pixels.len();
        GrayImage::from_raw(self.width, self.height, self.pixels)
            .ok_or(FetchError::BufferLength { expected, actual })
    }
}
