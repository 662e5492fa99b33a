//! Camera: primary-ray generation and the exposure post-pass.

use glam::Mat3;
use glint_math::{Ray, Vec3};

use crate::canvas::Canvas;

/// How the finished canvas is normalized to [0, 1].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Exposure {
    /// Scale so the brightest cell maps to 1.0.
    AutoLinear,
    /// Scale by a fixed energy cap, clamping anything brighter.
    ManualLinear(f32),
}

/// A pinhole camera with a rectangular focal plane.
///
/// Rotation is pitch/yaw/roll in radians, applied clockwise about x, then y,
/// then z; the unrotated camera looks down +Z. Read-only during a render.
#[derive(Debug, Clone)]
pub struct Camera {
    position: Vec3,
    rotation: Vec3,
    focal_plane_distance: f32,
    focal_plane_width: f32,
    focal_plane_height: f32,
    exposure: Exposure,
    max_reflections: u32,
}

impl Camera {
    /// Create a camera with default settings.
    pub fn new() -> Self {
        Self {
            position: Vec3::new(0.0, 4.0, -10.0),
            rotation: Vec3::ZERO,
            focal_plane_distance: 1.0,
            focal_plane_width: 4.0,
            focal_plane_height: 4.0,
            exposure: Exposure::AutoLinear,
            max_reflections: 8,
        }
    }

    /// Set the camera position.
    pub fn with_position(mut self, position: Vec3) -> Self {
        self.position = position;
        self
    }

    /// Set pitch/yaw/roll rotation in radians (clockwise about x, y, z).
    pub fn with_rotation(mut self, rotation: Vec3) -> Self {
        self.rotation = rotation;
        self
    }

    /// Set the focal plane: distance from the pinhole, then width and height.
    pub fn with_focal_plane(mut self, distance: f32, width: f32, height: f32) -> Self {
        self.focal_plane_distance = distance;
        self.focal_plane_width = width;
        self.focal_plane_height = height;
        self
    }

    /// Set the exposure mode.
    pub fn with_exposure(mut self, exposure: Exposure) -> Self {
        self.exposure = exposure;
        self
    }

    /// Set the maximum reflection/refraction bounce count.
    pub fn with_max_reflections(mut self, max_reflections: u32) -> Self {
        self.max_reflections = max_reflections;
        self
    }

    pub fn position(&self) -> Vec3 {
        self.position
    }

    pub fn max_reflections(&self) -> u32 {
        self.max_reflections
    }

    /// The camera's rotation matrix (pitch, then yaw, then roll, clockwise).
    pub fn rotation_matrix(&self) -> Mat3 {
        Mat3::from_rotation_z(-self.rotation.z)
            * Mat3::from_rotation_y(-self.rotation.y)
            * Mat3::from_rotation_x(-self.rotation.x)
    }

    /// Generate the primary ray for pixel (row, col) of a width x height
    /// canvas: one sample through the center of the pixel's focal-plane cell.
    pub fn primary_ray(&self, row: usize, col: usize, width: usize, height: usize) -> Ray {
        let fold_col = width as f32 / 2.0;
        let fold_row = height as f32 / 2.0;
        let scaled_x = (col as f32 - fold_col) * self.focal_plane_width / width as f32;
        let scaled_y = (fold_row - row as f32) * self.focal_plane_height / height as f32;

        let dir = Vec3::new(scaled_x, scaled_y, self.focal_plane_distance).normalize();
        Ray::new_in_air(self.position, self.rotation_matrix() * dir)
    }

    /// Exposure post-pass: normalize every cell to [0, 1].
    ///
    /// Auto mode scans the canvas for its brightest cell; manual mode divides
    /// by the configured cap. Must run strictly after all workers have
    /// joined. An all-dark canvas is left untouched.
    pub fn expose(&self, canvas: &mut Canvas) {
        let max_exposure = match self.exposure {
            Exposure::AutoLinear => canvas.max_value(),
            Exposure::ManualLinear(cap) => cap,
        };
        if max_exposure <= 0.0 {
            return;
        }
        for cell in canvas.cells_mut() {
            *cell = (*cell / max_exposure).min(1.0);
        }
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::new()
    }
}
