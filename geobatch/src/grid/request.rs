//! Tile request types.

use crate::coord::BoundingBox;

/// Rectangle in output pixel space.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PixelRect {
    /// Column of the left edge
    pub x: u32,
    /// Row of the top edge
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl PixelRect {
    /// Exclusive right edge.
    #[inline]
    pub fn x_end(&self) -> u32 {
        self.x + self.width
    }

    /// Exclusive bottom edge.
    #[inline]
    pub fn y_end(&self) -> u32 {
        self.y + self.height
    }

    /// Number of pixels covered.
    #[inline]
    pub fn area(&self) -> u64 {
        self.width as u64 * self.height as u64
    }

    /// Returns true if the two rectangles share at least one pixel.
    pub fn intersects(&self, other: &PixelRect) -> bool {
        self.x < other.x_end()
            && other.x < self.x_end()
            && self.y < other.y_end()
            && other.y < self.y_end()
    }
}

/// One WMS sub-request: where it lands in the mosaic and what it covers on
/// the ground.
///
/// # Example
///
/// ```
/// use geobatch::coord::BoundingBox;
/// use geobatch::grid::TileGrid;
///
/// let bbox = BoundingBox::new(0.0, 0.0, 1.0, 1.0).unwrap();
/// let grid = TileGrid::new(bbox, 100, 100, 60, "layer").unwrap();
/// let first = grid.requests().next().unwrap();
/// assert_eq!((first.width(), first.height()), (60, 60));
/// assert_eq!(first.layer(), "layer");
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct TileRequest {
    row: u32,
    col: u32,
    rect: PixelRect,
    bbox: BoundingBox,
    layer: String,
}

impl TileRequest {
    /// Creates a request directly, bypassing a grid.
    pub fn new(row: u32, col: u32, rect: PixelRect, bbox: BoundingBox, layer: impl Into<String>) -> Self {
        Self {
            row,
            col,
            rect,
            bbox,
            layer: layer.into(),
        }
    }

    /// Grid row (0 at the north edge).
    pub fn row(&self) -> u32 {
        self.row
    }

    /// Grid column (0 at the west edge).
    pub fn col(&self) -> u32 {
        self.col
    }

    /// Pixel rectangle this tile fills in the mosaic.
    pub fn rect(&self) -> PixelRect {
        self.rect
    }

    /// Geographic extent of the tile.
    pub fn bbox(&self) -> &BoundingBox {
        &self.bbox
    }

    /// WMS layer identifier.
    pub fn layer(&self) -> &str {
        &self.layer
    }

    /// Requested width in pixels.
    pub fn width(&self) -> u32 {
        self.rect.width
    }

    /// Requested height in pixels.
    pub fn height(&self) -> u32 {
        self.rect.height
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rect(x: u32, y: u32, width: u32, height: u32) -> PixelRect {
        PixelRect {
            x,
            y,
            width,
            height,
        }
    }

    #[test]
    fn test_rect_edges() {
        let r = rect(10, 20, 30, 40);
        assert_eq!(r.x_end(), 40);
        assert_eq!(r.y_end(), 60);
        assert_eq!(r.area(), 1200);
    }

    #[test]
    fn test_rect_intersects() {
        let a = rect(0, 0, 10, 10);
        assert!(a.intersects(&rect(5, 5, 10, 10)));
        // Touching edges do not overlap
        assert!(!a.intersects(&rect(10, 0, 10, 10)));
        assert!(!a.intersects(&rect(0, 10, 10, 10)));
    }
}
