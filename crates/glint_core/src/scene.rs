//! Scene graph: meshes plus point lights.
//!
//! A populated scene is treated as immutable, shared, read-only state for the
//! duration of a render pass; worker threads borrow it without locking.

use glint_math::{Aabb, Vec3};

use crate::mesh::Mesh;
use crate::triangle::Triangle;

/// A point light with inverse-square falloff.
#[derive(Debug, Clone, Copy)]
pub struct Light {
    /// World-space position
    pub position: Vec3,
    /// Radiant power of the light
    pub intensity: f32,
}

impl Light {
    pub fn new(position: Vec3, intensity: f32) -> Self {
        Self {
            position,
            intensity,
        }
    }
}

/// A renderable scene: a collection of meshes and a collection of lights.
#[derive(Debug, Clone, Default)]
pub struct Scene {
    meshes: Vec<Mesh>,
    lights: Vec<Light>,
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a mesh to the scene.
    pub fn add_mesh(&mut self, mesh: Mesh) {
        self.meshes.push(mesh);
    }

    /// Add a point light to the scene.
    pub fn add_light(&mut self, light: Light) {
        self.lights.push(light);
    }

    pub fn meshes(&self) -> &[Mesh] {
        &self.meshes
    }

    pub fn lights(&self) -> &[Light] {
        &self.lights
    }

    /// Flatten every mesh into one triangle soup.
    ///
    /// Each triangle carries its normal and its mesh's material scalars, so
    /// the octree and the intersection code never reach back into meshes.
    pub fn triangles(&self) -> Vec<Triangle> {
        self.meshes.iter().flat_map(|m| m.triangles()).collect()
    }

    /// Union bounding box of all meshes.
    pub fn bounds(&self) -> Aabb {
        self.meshes
            .iter()
            .map(|m| m.bounds())
            .fold(Aabb::EMPTY, |acc, b| Aabb::surrounding(&acc, &b))
    }

    /// Total triangle count across all meshes.
    pub fn triangle_count(&self) -> usize {
        self.meshes.iter().map(|m| m.triangle_count()).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tri_mesh(z: f32) -> Mesh {
        let vertices = [0.0, 0.0, z, 1.0, 0.0, z, 0.0, 1.0, z];
        Mesh::from_buffers(&vertices, &[0, 1, 2], 1.0, 1.5).unwrap()
    }

    #[test]
    fn test_scene_flattening() {
        let mut scene = Scene::new();
        scene.add_mesh(tri_mesh(0.0));
        scene.add_mesh(tri_mesh(2.0));
        assert_eq!(scene.meshes().len(), 2);

        let triangles = scene.triangles();
        assert_eq!(triangles.len(), 2);
        assert_eq!(scene.triangle_count(), 2);
        assert_eq!(triangles[0].v0.z, 0.0);
        assert_eq!(triangles[1].v0.z, 2.0);
    }

    #[test]
    fn test_scene_bounds_union() {
        let mut scene = Scene::new();
        scene.add_mesh(tri_mesh(0.0));
        scene.add_mesh(tri_mesh(5.0));

        let bounds = scene.bounds();
        assert!(bounds.z.min <= 0.0);
        assert!(bounds.z.max >= 5.0);
    }

    #[test]
    fn test_lights() {
        let mut scene = Scene::new();
        scene.add_light(Light::new(Vec3::new(0.0, 10.0, 0.0), 400.0));
        assert_eq!(scene.lights().len(), 1);
        assert_eq!(scene.lights()[0].intensity, 400.0);
    }
}
