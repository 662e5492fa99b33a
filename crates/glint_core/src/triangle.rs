//! Triangle primitive carrying its material scalars.

use glint_math::{Aabb, Vec3};

/// A triangle with a precomputed face normal and material scalars.
///
/// Immutable after construction. The scattering coefficient is the fraction
/// of incident light treated as diffusely re-emitted (1.0 = fully opaque
/// diffuse, 0.0 = fully specular/transmissive); the remainder is split
/// between reflection and refraction at render time.
#[derive(Debug, Clone, Copy)]
pub struct Triangle {
    pub v0: Vec3,
    pub v1: Vec3,
    pub v2: Vec3,
    /// Unit face normal, derived from clockwise vertex winding.
    pub normal: Vec3,
    /// Diffuse scattering coefficient in [0, 1].
    pub scattering: f32,
    /// Refractive index of the surface (> 0).
    pub ior: f32,
}

impl Triangle {
    /// Create a triangle, deriving the normal from CW winding order.
    ///
    /// Degenerate triangles (collinear vertices) get a zero normal; the
    /// intersection test rejects them as parallel, so they are silently
    /// unhittable rather than an error.
    pub fn new(v0: Vec3, v1: Vec3, v2: Vec3, scattering: f32, ior: f32) -> Self {
        let normal = (v1 - v0).cross(v2 - v0).normalize_or_zero();
        Self {
            v0,
            v1,
            v2,
            normal,
            scattering,
            ior,
        }
    }

    /// Create a triangle with a pre-computed normal.
    pub fn with_normal(
        v0: Vec3,
        v1: Vec3,
        v2: Vec3,
        normal: Vec3,
        scattering: f32,
        ior: f32,
    ) -> Self {
        Self {
            v0,
            v1,
            v2,
            normal: normal.normalize_or_zero(),
            scattering,
            ior,
        }
    }

    /// Axis-aligned bounding box of the three vertices.
    ///
    /// Padded along degenerate axes so axis-flat triangles still have volume
    /// for octree corner descent.
    pub fn bounds(&self) -> Aabb {
        let min = self.v0.min(self.v1).min(self.v2);
        let max = self.v0.max(self.v1).max(self.v2);
        Aabb::from_points(min, max)
    }
}
