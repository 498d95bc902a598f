//! Region structure for defining a cutout box
//!
//! This module defines the Region structure that specifies a rectangular
//! area of an image. The coordinates are zero-based pixel indices where
//! (0,0) is the first pixel of the data array. A region may extend beyond
//! the image, which is how an unclipped cutout request is represented.

use std::fmt;

/// Rectangular pixel region, half-open on both axes
///
/// Represents the area `[row, row + height) x [col, col + width)`. Edges
/// past the `i64` range saturate at `i64::MIN` / `i64::MAX`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Region {
    /// Row of the first pixel (may be negative)
    pub row: i64,

    /// Column of the first pixel (may be negative)
    pub col: i64,

    /// Height of the region in pixels
    pub height: i64,

    /// Width of the region in pixels
    pub width: i64,
}

impl Region {
    /// Create a new region
    ///
    /// # Arguments
    /// * `row` - Row of the first pixel
    /// * `col` - Column of the first pixel
    /// * `height` - Height of the region in pixels
    /// * `width` - Width of the region in pixels
    pub fn new(row: i64, col: i64, height: i64, width: i64) -> Self {
        Region { row, col, height, width }
    }

    /// Region of the given size around an integer center
    ///
    /// Odd sizes are symmetric about the center. Even sizes put the extra
    /// pixel on the low-index side, covering `[c - n/2, c + n/2)`.
    pub fn centered_on(row: i64, col: i64, height: i64, width: i64) -> Self {
        Region::new(row.saturating_sub(height / 2), col.saturating_sub(width / 2), height, width)
    }

    /// Get the row immediately after the region (exclusive)
    pub fn end_row(&self) -> i64 {
        self.row.saturating_add(self.height)
    }

    /// Get the column immediately after the region (exclusive)
    pub fn end_col(&self) -> i64 {
        self.col.saturating_add(self.width)
    }

    /// Number of pixels in the region
    pub fn area(&self) -> i64 {
        self.height.max(0).saturating_mul(self.width.max(0))
    }

    pub fn is_empty(&self) -> bool {
        self.height <= 0 || self.width <= 0
    }

    /// Whether a pixel index lies inside the region
    pub fn contains(&self, row: i64, col: i64) -> bool {
        row >= self.row && row < self.end_row() && col >= self.col && col < self.end_col()
    }

    /// Intersection with another region
    ///
    /// # Returns
    /// The overlapping region, or `None` when they do not overlap
    pub fn intersect(&self, other: &Region) -> Option<Region> {
        let row = self.row.max(other.row);
        let col = self.col.max(other.col);
        let end_row = self.end_row().min(other.end_row());
        let end_col = self.end_col().min(other.end_col());

        let region = Region::new(row, col, end_row.saturating_sub(row), end_col.saturating_sub(col));
        (!region.is_empty()).then_some(region)
    }

    /// Clip the region to an image of the given shape
    pub fn clip_to(&self, height: usize, width: usize) -> Option<Region> {
        self.intersect(&Region::new(0, 0, height as i64, width as i64))
    }

    /// Same region in a grid whose origin is at `(row0, col0)`
    pub fn translate(&self, row0: i64, col0: i64) -> Region {
        Region::new(self.row.saturating_sub(row0), self.col.saturating_sub(col0), self.height, self.width)
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "rows [{}, {}) x cols [{}, {})",
               self.row, self.end_row(), self.col, self.end_col())
    }
}
