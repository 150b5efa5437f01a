//! Mosaic assembly
//!
//! Walks a [`TileGrid`] in row-major order, resolves each request through a
//! [`TileSource`] and copies the block into one grayscale buffer sized to
//! the output. The buffer starts out filled with no-data, so any pixel not
//! covered by a successful tile stays no-data.

use image::{GrayImage, Luma};
use tracing::{debug, info, instrument, warn};

use crate::fetch::{TileBlock, TileOrigin, TileSource};
use crate::grid::{PixelRect, TileGrid, TileRequest};

/// Tile outcome counts for one run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MosaicReport {
    pub total: usize,
    pub from_cache: usize,
    pub from_network: usize,
    pub failed: usize,
    /// Pixel rectangles left as no-data because their fetch failed
    pub failed_rects: Vec<PixelRect>,
}

impl MosaicReport {
    /// True when every tile was resolved.
    pub fn is_complete(&self) -> bool {
        self.failed == 0
    }
}

/// Progress notification sent after each tile.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MosaicProgress {
    /// Tiles placed so far
    pub completed: usize,
    /// Tiles in the grid
    pub total: usize,
    pub from_cache: bool,
    pub failed: bool,
}

/// Assembled raster plus its report.
#[derive(Debug, Clone)]
pub struct Mosaic {
    pub image: GrayImage,
    pub report: MosaicReport,
}

/// Builds a mosaic from any [`TileSource`].
pub struct MosaicBuilder<'a, S: TileSource> {
    source: &'a S,
    nodata: u8,
}

impl<'a, S: TileSource> MosaicBuilder<'a, S> {
    pub fn new(source: &'a S, nodata: u8) -> Self {
        Self { source, nodata }
    }

    /// Fetches every tile of `grid` and stitches them together.
    ///
    /// `on_progress` is called once per tile, after it has been placed.
    #[instrument(skip_all, fields(width = grid.width(), height = grid.height(), tiles = grid.len()))]
    pub fn build<F>(&self, grid: &TileGrid, mut on_progress: F) -> Mosaic
    where
        F: FnMut(MosaicProgress),
    {
        let mut image = GrayImage::from_pixel(grid.width(), grid.height(), Luma([self.nodata]));
        let mut report = MosaicReport {
            total: grid.len(),
            ..MosaicReport::default()
        };

        info!(rows = grid.rows(), cols = grid.cols(), "Building mosaic");

        for (index, request) in grid.requests().enumerate() {
            let fetched = self.source.fetch(&request);
            let mut failed = matches!(fetched.origin, TileOrigin::Failed(_));

            if !failed && !self.place(&mut image, &request, fetched.block) {
                failed = true;
            }

            match fetched.origin {
                TileOrigin::Cache if !failed => report.from_cache += 1,
                TileOrigin::Network if !failed => report.from_network += 1,
                _ => {}
            }
            if failed {
                report.failed += 1;
                report.failed_rects.push(request.rect());
            }

            on_progress(MosaicProgress {
                completed: index + 1,
                total: report.total,
                from_cache: matches!(fetched.origin, TileOrigin::Cache),
                failed,
            });
        }

        info!(
            cached = report.from_cache,
            downloaded = report.from_network,
            failed = report.failed,
            "Mosaic complete"
        );

        Mosaic { image, report }
    }

    /// Copies a block into its rectangle. Returns false (leaving the area as
    /// no-data) if the block does not match the request.
    fn place(&self, image: &mut GrayImage, request: &TileRequest, block: TileBlock) -> bool {
        let rect = request.rect();
        if block.width() != rect.width || block.height() != rect.height {
            warn!(
                row = request.row(),
                col = request.col(),
                block_width = block.width(),
                block_height = block.height(),
                "Tile source returned a block of the wrong size"
            );
            return false;
        }

        match block.into_gray_image() {
            Ok(tile) => {
                image::imageops::replace(image, &tile, rect.x as i64, rect.y as i64);
                debug!(row = request.row(), col = request.col(), "Placed tile");
                true
            }
            Err(e) => {
                warn!(row = request.row(), col = request.col(), error = %e, "Invalid tile block");
                false
            }
        }
    }
}
