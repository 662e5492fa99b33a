// Re-export glam for convenience
pub use glam::*;

// Glint math types
mod aabb;
mod interval;
mod ray;

pub use aabb::Aabb;
pub use interval::Interval;
pub use ray::Ray;

/// Tolerance used for degenerate-geometry checks throughout the renderer.
pub const EPS: f32 = 1e-5;
