//! Tile fetching with cache and failure fallback
//!
//! [`TileFetcher`] resolves a [`TileRequest`] to a [`TileBlock`] of exactly
//! the requested size: from the disk cache when possible, otherwise from the
//! provider. A tile that cannot be fetched or decoded is replaced by a block
//! of no-data so one bad tile never aborts a run.

mod block;

pub use block::TileBlock;

use thiserror::Error;
use tracing::{debug, warn};

use crate::cache::{CacheKey, DiskTileCache};
use crate::grid::TileRequest;
use crate::provider::{MapProvider, ProviderError};

/// Errors resolving a single tile.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FetchError {
    #[error(transparent)]
    Provider(#[from] ProviderError),

    #[error("failed to decode image: {0}")]
    Decode(String),

    #[error("expected {expected_width}x{expected_height} image, got {actual_width}x{actual_height}")]
    SizeMismatch {
        expected_width: u32,
        expected_height: u32,
        actual_width: u32,
        actual_height: u32,
    },

    #[error("pixel buffer has {actual} samples, expected {expected}")]
    BufferLength { expected: usize, actual: usize },
}

/// Where a tile's pixels came from.
#[derive(Debug, Clone, PartialEq)]
pub enum TileOrigin {
    /// Read from the disk cache
    Cache,
    /// Downloaded from the provider
    Network,
    /// Could not be fetched; the block is all no-data
    Failed(FetchError),
}

/// Result of resolving one request.
#[derive(Debug, Clone, PartialEq)]
pub struct FetchedTile {
    pub block: TileBlock,
    pub origin: TileOrigin,
}

impl FetchedTile {
    pub fn is_failed(&self) -> bool {
        matches!(self.origin, TileOrigin::Failed(_))
    }
}

/// Anything that can turn a request into a block.
///
/// Implementations must return a block of exactly the requested dimensions.
pub trait TileSource {
    fn fetch(&self, request: &TileRequest) -> FetchedTile;
}

/// Cache-first fetcher over a [`MapProvider`].
pub struct TileFetcher<P: MapProvider> {
    provider: P,
    cache: Option<DiskTileCache>,
    nodata: u8,
}

impl<P: MapProvider> TileFetcher<P> {
    /// Creates a fetcher. `cache = None` disables caching.
    pub fn new(provider: P, cache: Option<DiskTileCache>, nodata: u8) -> Self {
        Self {
            provider,
            cache,
            nodata,
        }
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    pub fn cache(&self) -> Option<&DiskTileCache> {
        self.cache.as_ref()
    }

    pub fn nodata(&self) -> u8 {
        self.nodata
    }

    /// Fetches and decodes from the provider, bypassing the cache.
    pub fn download(&self, request: &TileRequest) -> Result<TileBlock, FetchError> {
        let bytes = self.provider.get_map(request)?;
        let block = TileBlock::decode(&bytes)?;

        if block.width() != request.width() || block.height() != request.height() {
            return Err(FetchError::SizeMismatch {
                expected_width: request.width(),
                expected_height: request.height(),
                actual_width: block.width(),
                actual_height: block.height(),
            });
        }
        Ok(block)
    }

    fn try_fetch(&self, request: &TileRequest) -> Result<(TileBlock, TileOrigin), FetchError> {
        let key = self.cache.as_ref().map(|_| CacheKey::for_request(request));

        if let (Some(cache), Some(key)) = (&self.cache, &key) {
            if let Some(block) = cache.get(key, request.width(), request.height()) {
                return Ok((block, TileOrigin::Cache));
            }
        }

        let block = self.download(request)?;

        if let (Some(cache), Some(key)) = (&self.cache, &key) {
            if let Err(e) = cache.put(key, &block) {
                warn!(error = %e, "Failed to write tile to cache");
            }
        }

        Ok((block, TileOrigin::Network))
    }
}

impl<P: MapProvider> TileSource for TileFetcher<P> {
    fn fetch(&self, request: &TileRequest) -> FetchedTile {
        match self.try_fetch(request) {
            Ok((block, origin)) => {
                debug!(
                    provider = self.provider.name(),
                    row = request.row(),
                    col = request.col(),
                    origin = ?origin,
                    "Tile resolved"
                );
                FetchedTile { block, origin }
            }
            Err(e) => {
                warn!(
                    provider = self.provider.name(),
                    row = request.row(),
                    col = request.col(),
                    bbox = %request.bbox(),
                    error = %e,
                    "Tile fetch failed, filling with no-data"
                );
                FetchedTile {
                    block: TileBlock::filled(request.width(), request.height(), self.nodata),
                    origin: TileOrigin::Failed(e),
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coord::BoundingBox;
    use crate::grid::PixelRect;
    use crate::provider::{MockHttpClient, RecordingHttpClient, WmsProvider};
    use image::{DynamicImage, GrayImage, ImageFormat, Luma};
    use std::io::Cursor;
    use tempfile::TempDir;

    fn png(width: u32, height: u32, value: u8) -> Vec<u8> {
        let image = GrayImage::from_pixel(width, height, Luma([value]));
        let mut bytes = Vec::new();
        DynamicImage::ImageLuma8(image)
            .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
            .unwrap();
        bytes
    }

    fn request(width: u32, height: u32) -> TileRequest {
        TileRequest::new(
            0,
            0,
            PixelRect {
                x: 0,
                y: 0,
                width,
                height,
            },
            BoundingBox::new(0.0, 0.0, 1.0, 1.0).unwrap(),
            "L",
        )
    }

    #[test]
    fn test_fetch_from_network() {
        let provider = WmsProvider::new(MockHttpClient {
            response: Ok(png(8, 4, 255)),
        });
        let fetcher = TileFetcher::new(provider, None, 128);

        let tile = fetcher.fetch(&request(8, 4));
        assert_eq!(tile.origin, TileOrigin::Network);
        assert_eq!(tile.block.pixels(), &[255; 32]);
    }

    #[test]
    fn test_network_error_gives_nodata() {
        let provider = WmsProvider::new(MockHttpClient {
            response: Err(ProviderError::HttpError("HTTP 500".to_string())),
        });
        let fetcher = TileFetcher::new(provider, None, 128);

        let tile = fetcher.fetch(&request(8, 4));
        assert!(tile.is_failed());
        assert_eq!((tile.block.width(), tile.block.height()), (8, 4));
        assert!(tile.block.pixels().iter().all(|&p| p == 128));
    }

    #[test]
    fn test_size_mismatch_gives_nodata() {
        let provider = WmsProvider::new(MockHttpClient {
            response: Ok(png(4, 4, 255)),
        });
        let fetcher = TileFetcher::new(provider, None, 7);

        let tile = fetcher.fetch(&request(8, 4));
        assert!(matches!(
            tile.origin,
            TileOrigin::Failed(FetchError::SizeMismatch { actual_width: 4, .. })
        ));
        assert!(tile.block.pixels().iter().all(|&p| p == 7));
    }

    #[test]
    fn test_second_fetch_hits_cache() {
        let dir = TempDir::new().unwrap();
        let provider = WmsProvider::new(RecordingHttpClient::new(Ok(png(8, 4, 0))));
        let fetcher = TileFetcher::new(provider, Some(DiskTileCache::new(dir.path())), 128);

        let first = fetcher.fetch(&request(8, 4));
        let second = fetcher.fetch(&request(8, 4));

        assert_eq!(first.origin, TileOrigin::Network);
        assert_eq!(second.origin, TileOrigin::Cache);
        assert_eq!(first.block, second.block);
        assert_eq!(fetcher.provider().http_client().call_count(), 1);
    }

    #[test]
    fn test_failed_tiles_are_not_cached() {
        let dir = TempDir::new().unwrap();
        let provider = WmsProvider::new(MockHttpClient {
            response: Err(ProviderError::HttpError("timeout".to_string())),
        });
        let cache = DiskTileCache::new(dir.path());
        let fetcher = TileFetcher::new(provider, Some(cache.clone()), 128);

        assert!(fetcher.fetch(&request(8, 4)).is_failed());
        assert_eq!(cache.entry_count(), 0);
    }
}
