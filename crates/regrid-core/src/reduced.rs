//! Cell-resolution images produced by the sampler and the quantizer.

use serde::{Deserialize, Serialize};

/// A grid of per-cell values at the recovered true resolution.
///
/// `ReducedImage<Rgb>` holds the sampler's raw colors, `ReducedImage<u8>`
/// the finalized palette indices.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReducedImage<T> {
    /// Number of cells per row.
    pub width: u32,
    /// Number of cell rows.
    pub height: u32,
    /// Row-major cell values. Length is width * height.
    pub cells: Vec<T>,
}

impl<T: Copy> ReducedImage<T> {
    /// Create a reduced image from row-major cell values.
    pub fn new(width: u32, height: u32, cells: Vec<T>) -> Self {
        debug_assert_eq!(
            cells.len(),
            (width as usize) * (height as usize),
            "Cell buffer size mismatch"
        );
        Self {
            width,
            height,
            cells,
        }
    }

    /// Value of cell `(x, y)`. Panics when out of bounds.
    #[inline]
    pub fn get(&self, x: u32, y: u32) -> T {
        self.cells[(y as usize) * (self.width as usize) + x as usize]
    }

    /// Total number of cells.
    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }

    /// True when there are no cells.
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Apply `f` to every cell, keeping the layout.
    pub fn map<U: Copy>(&self, f: impl FnMut(T) -> U) -> ReducedImage<U> {
        ReducedImage {
            width: self.width,
            height: self.height,
            cells: self.cells.iter().copied().map(f).collect(),
        }
    }
}
