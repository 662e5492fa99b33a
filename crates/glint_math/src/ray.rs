//! Ray type for light transport.
//!
//! A ray carries its origin, direction, and the refractive index of the
//! medium it is currently travelling through, so refraction at the next
//! surface knows both sides of the boundary.

use glam::Vec3;

/// A ray with origin, direction, and current medium refractive index.
#[derive(Debug, Clone, Copy)]
pub struct Ray {
    /// Origin point of the ray
    origin: Vec3,
    /// Direction vector (normalized by convention, not enforced)
    direction: Vec3,
    /// Refractive index of the medium the ray travels through
    ior: f32,
}

impl Ray {
    /// Create a new ray in a medium with the given refractive index.
    #[inline]
    pub fn new(origin: Vec3, direction: Vec3, ior: f32) -> Self {
        Self {
            origin,
            direction,
            ior,
        }
    }

    /// Create a ray travelling through vacuum/air (ior = 1.0).
    #[inline]
    pub fn new_in_air(origin: Vec3, direction: Vec3) -> Self {
        Self::new(origin, direction, 1.0)
    }

    /// Get the ray's origin point.
    #[inline]
    pub fn origin(&self) -> Vec3 {
        self.origin
    }

    /// Get the ray's direction vector.
    #[inline]
    pub fn direction(&self) -> Vec3 {
        self.direction
    }

    /// Get the refractive index of the ray's current medium.
    #[inline]
    pub fn ior(&self) -> f32 {
        self.ior
    }

    /// Compute a point along the ray at parameter t.
    /// P(t) = origin + t * direction
    #[inline]
    pub fn at(&self, t: f32) -> Vec3 {
        self.origin + t * self.direction
    }
}

impl Default for Ray {
    fn default() -> Self {
        Self {
            origin: Vec3::ZERO,
            direction: Vec3::Z,
            ior: 1.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ray_at() {
        let ray = Ray::new_in_air(Vec3::ZERO, Vec3::new(1.0, 0.0, 0.0));

        assert_eq!(ray.at(0.0), Vec3::ZERO);
        assert_eq!(ray.at(1.0), Vec3::new(1.0, 0.0, 0.0));
        assert_eq!(ray.at(2.5), Vec3::new(2.5, 0.0, 0.0));
    }

    #[test]
    fn test_ray_accessors() {
        let origin = Vec3::new(1.0, 2.0, 3.0);
        let direction = Vec3::new(0.0, 1.0, 0.0);
        let ray = Ray::new(origin, direction, 1.5);

        assert_eq!(ray.origin(), origin);
        assert_eq!(ray.direction(), direction);
        assert_eq!(ray.ior(), 1.5);
    }

    #[test]
    fn test_default_medium_is_air() {
        assert_eq!(Ray::default().ior(), 1.0);
        assert_eq!(Ray::new_in_air(Vec3::ZERO, Vec3::Z).ior(), 1.0);
    }
}
