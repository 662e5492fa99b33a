//! Glint Core - scene model for the ray tracer.
//!
//! This crate provides:
//!
//! - **Geometry**: [`Triangle`], [`Mesh`] built from flat vertex/index buffers
//! - **Scene graph**: [`Scene`] owning meshes and point [`Light`]s
//!
//! The scene is immutable once populated; the renderer shares it read-only
//! across worker threads for the duration of a render pass.

pub mod mesh;
pub mod scene;
pub mod triangle;

// Re-export commonly used types
pub use mesh::{Mesh, MeshError};
pub use scene::{Light, Scene};
pub use triangle::Triangle;
