//! Canvas: the row-major radiance accumulation buffer.

use std::ops::{Index, IndexMut};

/// A 2-D grid of radiance accumulators, one f32 cell per pixel, row-major.
///
/// Zero-initialized at creation. During a render each worker owns a disjoint
/// range of pixel ids, so no cell is ever written by two threads; after the
/// exposure pass every cell holds a luminance in [0, 1].
pub struct Canvas {
    width: usize,
    height: usize,
    cells: Vec<f32>,
}

impl Canvas {
    /// Create a canvas filled with zeros.
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            cells: vec![0.0; width * height],
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Total number of pixels (cells).
    pub fn pixel_count(&self) -> usize {
        self.cells.len()
    }

    pub fn get(&self, row: usize, col: usize) -> f32 {
        self.cells[row * self.width + col]
    }

    pub fn set(&mut self, row: usize, col: usize, value: f32) {
        self.cells[row * self.width + col] = value;
    }

    /// Brightest cell value (0.0 for an empty canvas).
    pub fn max_value(&self) -> f32 {
        self.cells.iter().fold(0.0f32, |acc, &c| acc.max(c))
    }

    /// Copy a contiguous run of values starting at pixel id `start`.
    ///
    /// Used by the scheduler to splice a finished block back into place.
    /// Panics when the run overflows the buffer (a scheduler bug, not a data
    /// error).
    pub fn write_range(&mut self, start: usize, values: &[f32]) {
        self.cells[start..start + values.len()].copy_from_slice(values);
    }

    pub fn cells(&self) -> &[f32] {
        &self.cells
    }

    pub fn cells_mut(&mut self) -> &mut [f32] {
        &mut self.cells
    }
}

impl Index<usize> for Canvas {
    type Output = [f32];

    /// Row access: `canvas[row]` yields the row's cell slice.
    fn index(&self, row: usize) -> &[f32] {
        &self.cells[row * self.width..(row + 1) * self.width]
    }
}

impl IndexMut<usize> for Canvas {
    fn index_mut(&mut self, row: usize) -> &mut [f32] {
        &mut self.cells[row * self.width..(row + 1) * self.width]
    }
}
