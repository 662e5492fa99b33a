//! Mesh geometry built from flat vertex and index buffers.
//!
//! The flat-buffer constructor mirrors the shape scene data arrives in from
//! foreign callers (position triples and index triples), so loaders and
//! bindings can hand geometry over without an intermediate representation.

use glint_math::{Aabb, Vec3};
use thiserror::Error;

use crate::triangle::Triangle;

/// Errors raised while validating mesh construction inputs.
#[derive(Debug, Error, PartialEq)]
pub enum MeshError {
    #[error("vertex buffer length {0} is not a multiple of 3")]
    RaggedVertexBuffer(usize),

    #[error("index buffer length {0} is not a multiple of 3")]
    RaggedIndexBuffer(usize),

    #[error("triangle index {index} out of range (vertex count {vertex_count})")]
    IndexOutOfRange { index: u32, vertex_count: usize },

    #[error("scattering coefficient {0} outside [0, 1]")]
    InvalidScattering(f32),

    #[error("refractive index {0} must be positive")]
    InvalidIor(f32),
}

/// A triangulated mesh with shared material scalars.
///
/// All triangles of a mesh share one scattering coefficient and one
/// refractive index. Per-triangle face normals are derived from vertex
/// winding at construction.
#[derive(Clone, Debug)]
pub struct Mesh {
    /// Vertex positions (one Vec3 per vertex)
    positions: Vec<Vec3>,

    /// Triangle index triples into `positions`
    indices: Vec<[u32; 3]>,

    /// Per-triangle face normals, parallel to `indices`
    normals: Vec<Vec3>,

    /// Diffuse scattering coefficient shared by every triangle, in [0, 1]
    scattering: f32,

    /// Refractive index shared by every triangle, > 0
    ior: f32,
}

impl Mesh {
    /// Build a mesh from flat buffers: vertex position triples and triangle
    /// index triples.
    ///
    /// Validates buffer shapes, index ranges, and material scalars. Face
    /// normals are computed from winding; degenerate triangles get a zero
    /// normal and are silently unhittable.
    pub fn from_buffers(
        vertices: &[f32],
        indices: &[u32],
        scattering: f32,
        ior: f32,
    ) -> Result<Self, MeshError> {
        if vertices.len() % 3 != 0 {
            return Err(MeshError::RaggedVertexBuffer(vertices.len()));
        }
        if indices.len() % 3 != 0 {
            return Err(MeshError::RaggedIndexBuffer(indices.len()));
        }
        if !(0.0..=1.0).contains(&scattering) {
            return Err(MeshError::InvalidScattering(scattering));
        }
        if ior <= 0.0 {
            return Err(MeshError::InvalidIor(ior));
        }

        let positions: Vec<Vec3> = vertices
            .chunks_exact(3)
            .map(|v| Vec3::new(v[0], v[1], v[2]))
            .collect();

        let mut triples = Vec::with_capacity(indices.len() / 3);
        let mut normals = Vec::with_capacity(indices.len() / 3);
        for tri in indices.chunks_exact(3) {
            for &index in tri {
                if index as usize >= positions.len() {
                    return Err(MeshError::IndexOutOfRange {
                        index,
                        vertex_count: positions.len(),
                    });
                }
            }
            let [i0, i1, i2] = [tri[0], tri[1], tri[2]];
            let v0 = positions[i0 as usize];
            let v1 = positions[i1 as usize];
            let v2 = positions[i2 as usize];
            let normal = (v1 - v0).cross(v2 - v0).normalize_or_zero();
            if normal == Vec3::ZERO {
                log::warn!("degenerate triangle [{i0}, {i1}, {i2}] has no surface normal");
            }
            triples.push([i0, i1, i2]);
            normals.push(normal);
        }

        log::debug!(
            "mesh: {} vertices, {} triangles, scattering {scattering}, ior {ior}",
            positions.len(),
            triples.len()
        );

        Ok(Self {
            positions,
            indices: triples,
            normals,
            scattering,
            ior,
        })
    }

    /// Materialize triangle `i` with its normal and the mesh's material.
    ///
    /// Panics when `i` is out of range; indices were validated at
    /// construction, so that is a programming error.
    pub fn triangle(&self, i: usize) -> Triangle {
        let [i0, i1, i2] = self.indices[i];
        Triangle::with_normal(
            self.positions[i0 as usize],
            self.positions[i1 as usize],
            self.positions[i2 as usize],
            self.normals[i],
            self.scattering,
            self.ior,
        )
    }

    /// Iterator over all materialized triangles.
    pub fn triangles(&self) -> impl Iterator<Item = Triangle> + '_ {
        (0..self.triangle_count()).map(|i| self.triangle(i))
    }

    /// Number of triangles in the mesh.
    pub fn triangle_count(&self) -> usize {
        self.indices.len()
    }

    /// Number of vertices in the mesh.
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    /// Axis-aligned bounding box of all vertex positions.
    pub fn bounds(&self) -> Aabb {
        if self.positions.is_empty() {
            return Aabb::EMPTY;
        }

        let mut min = Vec3::splat(f32::INFINITY);
        let mut max = Vec3::splat(f32::NEG_INFINITY);
        for pos in &self.positions {
            min = min.min(*pos);
            max = max.max(*pos);
        }
        Aabb::from_points(min, max)
    }

    /// Shared scattering coefficient.
    pub fn scattering(&self) -> f32 {
        self.scattering
    }

    /// Shared refractive index.
    pub fn ior(&self) -> f32 {
        self.ior
    }
}
