//! Writer options.

use super::CogError;

/// Default internal block side.
pub const DEFAULT_BLOCK_SIZE: u32 = 512;

/// Default zlib level.
pub const DEFAULT_DEFLATE_LEVEL: u32 = 9;

/// Default overview decimation factors.
pub const DEFAULT_OVERVIEW_FACTORS: [u32; 5] = [2, 4, 8, 16, 32];

/// How a GeoTIFF is laid out and compressed.
#[derive(Debug, Clone, PartialEq)]
pub struct CogOptions {
    /// Internal tile side; must be a positive multiple of 16
    pub block_size: u32,
    /// zlib level 0-9
    pub deflate_level: u32,
    /// Value written as `GDAL_NODATA` and ignored when averaging overviews
    pub nodata: Option<u8>,
    /// Overview decimation factors, each at least 2
    pub overview_factors: Vec<u32>,
    /// `GDAL_METADATA` items on the full-resolution image
    pub metadata: Vec<(String, String)>,
}

impl Default for CogOptions {
    fn default() -> Self {
        Self {
            block_size: DEFAULT_BLOCK_SIZE,
            deflate_level: DEFAULT_DEFLATE_LEVEL,
            nodata: None,
            overview_factors: DEFAULT_OVERVIEW_FACTORS.to_vec(),
            metadata: Vec::new(),
        }
    }
}

impl CogOptions {
    pub fn with_nodata(mut self, nodata: u8) -> Self {
        self.nodata = Some(nodata);
        self
    }

    pub fn with_metadata(mut self, metadata: Vec<(String, String)>) -> Self {
        self.metadata = metadata;
        self
    }

    pub fn with_overview_factors(mut self, factors: Vec<u32>) -> Self {
        self.overview_factors = factors;
        self
    }

    /// Checks the options before any output is created.
    pub fn validate(&self) -> Result<(), CogError> {
        if self.block_size == 0 || self.block_size % 16 != 0 {
            return Err(CogError::InvalidOptions(format!(
                "block size must be a positive multiple of 16, got {}",
                self.block_size
            )));
        }
        if self.deflate_level > 9 {
            return Err(CogError::InvalidOptions(format!(
                "deflate level must be 0-9, got {}",
                self.deflate_level
            )));
        }
        if let Some(&factor) = self.overview_factors.iter().find(|&&f| f < 2) {
            return Err(CogError::InvalidOptions(format!(
                "overview factors must be at least 2, got {}",
                factor
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let options = CogOptions::default();
        assert_eq!(options.block_size, 512);
        assert_eq!(options.deflate_level, 9);
        assert_eq!(options.overview_factors, vec![2, 4, 8, 16, 32]);
        assert!(options.validate().is_ok());
    }

    #[test]
    fn test_invalid_options() {
        let options = CogOptions {
            block_size: 100,
            ..CogOptions::default()
        };
        assert!(options.validate().is_err());

        let options = CogOptions {
            deflate_level: 10,
            ..CogOptions::default()
        };
        assert!(options.validate().is_err());

        let options = CogOptions::default().with_overview_factors(vec![2, 1]);
        assert!(options.validate().is_err());
    }
}
