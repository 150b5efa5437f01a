//! Grid partitioning of the output raster into WMS sub-requests.
//!
//! The output raster is cut into `ceil(height / tile) × ceil(width / tile)`
//! cells. Cells on the last row and column are clamped to the raster edge,
//! so the cells tile the output exactly: no overlap and no gap. Each cell's
//! geographic extent is found by linear interpolation, longitude growing with
//! the pixel column and latitude shrinking with the pixel row.

mod request;

pub use request::{PixelRect, TileRequest};

use thiserror::Error;

use crate::coord::{BoundingBox, GeoTransform};

/// Errors building a tile grid.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GridError {
    /// Tile side length of zero
    #[error("tile size must be at least 1 pixel")]
    ZeroTileSize,

    /// Output raster has no pixels
    #[error("output raster has invalid dimensions: {0}x{1}")]
    EmptyOutput(u32, u32),
}

/// Partition of a `width × height` raster over `bbox` into tiles of at most
/// `tile_size` pixels per side.
#[derive(Debug, Clone, PartialEq)]
pub struct TileGrid {
    bbox: BoundingBox,
    width: u32,
    height: u32,
    tile_size: u32,
    rows: u32,
    cols: u32,
    layer: String,
}

impl TileGrid {
    /// Creates a grid.
    pub fn new(
        bbox: BoundingBox,
        width: u32,
        height: u32,
        tile_size: u32,
        layer: impl Into<String>,
    ) -> Result<Self, GridError> {
        if tile_size == 0 {
            return Err(GridError::ZeroTileSize);
        }
        if width == 0 || height == 0 {
            return Err(GridError::EmptyOutput(width, height));
        }

        Ok(Self {
            bbox,
            width,
            height,
            tile_size,
            rows: height.div_ceil(tile_size),
            cols: width.div_ceil(tile_size),
            layer: layer.into(),
        })
    }

    /// Number of tile rows.
    pub fn rows(&self) -> u32 {
        self.rows
    }

    /// Number of tile columns.
    pub fn cols(&self) -> u32 {
        self.cols
    }

    /// Total number of tiles.
    pub fn len(&self) -> usize {
        self.rows as usize * self.cols as usize
    }

    /// A valid grid always has at least one tile.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Output width in pixels.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Output height in pixels.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Maximum tile side length.
    pub fn tile_size(&self) -> u32 {
        self.tile_size
    }

    /// Geographic extent of the whole output.
    pub fn bbox(&self) -> &BoundingBox {
        &self.bbox
    }

    /// WMS layer every request targets.
    pub fn layer(&self) -> &str {
        &self.layer
    }

    /// Affine transform of the full output raster.
    pub fn geo_transform(&self) -> GeoTransform {
        GeoTransform::from_bounds(&self.bbox, self.width, self.height)
    }

    /// Pixel rectangle of the cell at (`row`, `col`), clamped to the output.
    ///
    /// Cells outside the grid come back empty at the raster edge.
    pub fn pixel_rect(&self, row: u32, col: u32) -> PixelRect {
        let x = col.saturating_mul(self.tile_size).min(self.width);
        let y = row.saturating_mul(self.tile_size).min(self.height);
        let x_end = x.saturating_add(self.tile_size).min(self.width);
        let y_end = y.saturating_add(self.tile_size).min(self.height);
        PixelRect {
            x,
            y,
            width: x_end - x,
            height: y_end - y,
        }
    }

    /// Builds the request for the cell at (`row`, `col`).
    ///
    /// Returns `None` outside the grid.
    pub fn request(&self, row: u32, col: u32) -> Option<TileRequest> {
        if row >= self.rows || col >= self.cols {
            return None;
        }

        let rect = self.pixel_rect(row, col);
        let lon_span = self.bbox.width_deg();
        let lat_span = self.bbox.height_deg();
        let width = self.width as f64;
        let height = self.height as f64;

        let tile_bbox = BoundingBox {
            west: self.bbox.west + (rect.x as f64 / width) * lon_span,
            east: self.bbox.west + (rect.x_end() as f64 / width) * lon_span,
            north: self.bbox.north - (rect.y as f64 / height) * lat_span,
            south: self.bbox.north - (rect.y_end() as f64 / height) * lat_span,
        };

        Some(TileRequest::new(row, col, rect, tile_bbox, self.layer.clone()))
    }

    /// Iterates over all requests in row-major order.
    pub fn requests(&self) -> TileRequests<'_> {
        TileRequests {
            grid: self,
            current: 0,
        }
    }
}

/// Row-major iterator over a grid's requests.
#[derive(Debug, Clone)]
pub struct TileRequests<'a> {
    grid: &'a TileGrid,
    current: usize,
}

impl Iterator for TileRequests<'_> {
    type Item = TileRequest;

    fn next(&mut self) -> Option<Self::Item> {
        if self.current >= self.grid.len() {
            return None;
        }

        let cols = self.grid.cols as usize;
        let row = (self.current / cols) as u32;
        let col = (self.current % cols) as u32;
        self.current += 1;

        self.grid.request(row, col)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.grid.len() - self.current;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for TileRequests<'_> {}
