//! Glint Renderer - CPU Ray Tracing
//!
//! An offline whitted-style ray tracer with octree-accelerated visibility
//! queries and a block-queue worker pool.

mod block;
mod camera;
mod canvas;
mod octree;
mod renderer;
mod trace;

pub use block::{generate_blocks, render_block, Block, DEFAULT_BLOCK_SIZE};
pub use camera::{Camera, Exposure};
pub use canvas::Canvas;
pub use octree::{Octree, OctreeLookup};
pub use renderer::render;
pub use trace::{raycast, Hit, Tracer};

/// Re-export Vec3 and common math types from glint_math
pub use glint_math::{Aabb, Interval, Ray, Vec3};
