//! Block partitioning for the render scheduler.
//!
//! The image is divided into contiguous ranges of flat pixel ids; each block
//! is one unit of work for a worker thread. Because blocks never overlap and
//! together cover every pixel id exactly once, workers write disjoint canvas
//! ranges and the render is deterministic regardless of scheduling order.

use crate::camera::Camera;
use crate::trace::Tracer;

/// Default number of pixels per block.
pub const DEFAULT_BLOCK_SIZE: usize = 4096;

/// A contiguous range of flat pixel ids `[start, end)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Block {
    pub start: usize,
    pub end: usize,
}

impl Block {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// Number of pixels in this block.
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start >= self.end
    }
}

/// Partition `pixel_count` pixels into blocks of at most `block_size`.
///
/// The final block is short when the pixel count is not a multiple of the
/// block size. Panics on a zero block size (a programming error).
pub fn generate_blocks(pixel_count: usize, block_size: usize) -> Vec<Block> {
    assert!(block_size > 0, "block size must be positive");

    let mut blocks = Vec::with_capacity(pixel_count.div_ceil(block_size));
    let mut start = 0;
    while start < pixel_count {
        let end = (start + block_size).min(pixel_count);
        blocks.push(Block::new(start, end));
        start = end;
    }
    blocks
}

/// Trace every pixel of one block into a local buffer.
///
/// Returns radiances in pixel-id order. The buffer is spliced into the
/// canvas by the scheduler after the block completes; nothing here touches
/// shared mutable state.
pub fn render_block(
    block: &Block,
    camera: &Camera,
    tracer: &Tracer<'_>,
    width: usize,
    height: usize,
) -> Vec<f32> {
    let mut radiances = Vec::with_capacity(block.len());
    for pixel in block.start..block.end {
        let row = pixel / width;
        let col = pixel % width;
        let ray = camera.primary_ray(row, col, width, height);
        radiances.push(tracer.render_ray(&ray, 1.0, 0));
    }
    radiances
}
