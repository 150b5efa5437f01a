//! Content-addressed cache keys.

use sha2::{Digest, Sha256};

use crate::grid::TileRequest;

/// Identity of a tile request for caching purposes.
///
/// Two requests with the same layer, extent and pixel size map to the same
/// key regardless of where they sit in a grid.
#[derive(Debug, Clone, PartialEq)]
pub struct CacheKey {
    normalized: String,
    digest: String,
}

impl CacheKey {
    /// Builds the key for a tile request.
    pub fn for_request(request: &TileRequest) -> Self {
        let bbox = request.bbox();
        Self::from_normalized(format!(
            "{}_{}_{}_{}_{}_{}_{}",
            request.layer(),
            bbox.west,
            bbox.south,
            bbox.east,
            bbox.north,
            request.width(),
            request.height()
        ))
    }

    fn from_normalized(normalized: String) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(normalized.as_bytes());
        let digest = format!("{:x}", hasher.finalize());
        Self { normalized, digest }
    }

    /// The string that was hashed.
    pub fn normalized(&self) -> &str {
        &self.normalized
    }

    /// Lowercase hex SHA-256 of the normalized string.
    pub fn digest(&self) -> &str {
        &self.digest
    }

    /// File name of the cache entry, `tile_{digest}.bin`.
    pub fn file_name(&self) -> String {
        format!("tile_{}.bin", self.digest)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coord::BoundingBox;
    use crate::grid::{PixelRect, TileRequest};

    fn request(row: u32, col: u32, west: f64) -> TileRequest {
        TileRequest::new(
            row,
            col,
            PixelRect {
                x: 0,
                y: 0,
                width: 256,
                height: 128,
            },
            BoundingBox::new(west, 0.0, west + 1.0, 0.5).unwrap(),
            "GUF28_DLR_v1_Mosaic",
        )
    }

    #[test]
    fn test_normalized_string() {
        let key = CacheKey::for_request(&request(0, 0, 8.0));
        assert_eq!(key.normalized(), "GUF28_DLR_v1_Mosaic_8_0_9_0.5_256_128");
    }

    #[test]
    fn test_digest_is_sha256_hex() {
        let key = CacheKey::for_request(&request(0, 0, 8.0));
        assert_eq!(key.digest().len(), 64);
        assert!(key.digest().chars().all(|c| c.is_ascii_hexdigit()));
        assert!(key.file_name().starts_with("tile_"));
        assert!(key.file_name().ends_with(".bin"));
    }

    #[test]
    fn test_known_digest() {
        // sha256("abc")
        let key = CacheKey::from_normalized("abc".to_string());
        assert_eq!(
            key.digest(),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[test]
    fn test_grid_position_does_not_matter() {
        assert_eq!(
            CacheKey::for_request(&request(0, 0, 8.0)),
            CacheKey::for_request(&request(3, 7, 8.0))
        );
        assert_ne!(
            CacheKey::for_request(&request(0, 0, 8.0)),
            CacheKey::for_request(&request(0, 0, 8.5))
        );
    }
}
