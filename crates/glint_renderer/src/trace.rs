//! Ray-tracing engine: triangle intersection, octree-marched visibility
//! queries, and the recursive reflection/refraction radiance walk.
//!
//! All numerical degeneracies (parallel rays, collinear triangles,
//! near-singular barycentric systems) are silent non-hits; a miss truncates
//! that ray's contribution to zero and never aborts the render.

use std::f32::consts::PI;

use glint_core::{Light, Triangle};
use glint_math::{Ray, Vec3, EPS};

use crate::octree::{NodeId, Octree};

/// Offset applied along a shadow ray to clear the surface that spawned it.
const SHADOW_BIAS: f32 = 0.01;

/// A successful ray/triangle intersection.
///
/// Carries everything shading needs so the engine never reaches back into
/// the triangle soup: the hit point, surface normal, the triangle's material
/// scalars, and the parametric distance along the ray.
#[derive(Debug, Clone, Copy)]
pub struct Hit {
    pub point: Vec3,
    pub normal: Vec3,
    pub scattering: f32,
    pub ior: f32,
    pub t: f32,
}

/// Ray/triangle intersection test.
///
/// Solves the ray/plane parameter t = ((v0 - origin) . n) / (n . dir),
/// rejecting parallel rays (|n . dir| < EPS) and intersections behind the
/// origin (t < EPS). The interior test solves the 2-D Gram system of the
/// edge vectors for barycentric coordinates (a, b) and rejects a < 0, b < 0,
/// or a + b > 1.
pub fn raycast(origin: Vec3, dir: Vec3, tri: &Triangle) -> Option<Hit> {
    let denom = tri.normal.dot(dir);
    if denom.abs() < EPS {
        return None;
    }
    let t = (tri.v0 - origin).dot(tri.normal) / denom;
    if t < EPS {
        return None;
    }
    let point = origin + dir * t;

    let e1 = tri.v1 - tri.v0;
    let e2 = tri.v2 - tri.v0;
    let p = point - tri.v0;
    let d11 = e1.dot(e1);
    let d12 = e1.dot(e2);
    let d22 = e2.dot(e2);
    let det = d11 * d22 - d12 * d12;
    if det.abs() < EPS {
        // Collinear edges; unhittable
        return None;
    }
    let a = (d22 * p.dot(e1) - d12 * p.dot(e2)) / det;
    let b = (d11 * p.dot(e2) - d12 * p.dot(e1)) / det;
    if a < 0.0 || b < 0.0 || a + b > 1.0 {
        return None;
    }

    Some(Hit {
        point,
        normal: tri.normal,
        scattering: tri.scattering,
        ior: tri.ior,
        t,
    })
}

/// The light-transport engine for one render pass.
///
/// Borrows the flattened triangle soup, the lights, and the octree; all three
/// are read-only and shared across worker threads.
pub struct Tracer<'a> {
    triangles: &'a [Triangle],
    lights: &'a [Light],
    octree: &'a Octree,
    max_reflections: u32,
}

impl<'a> Tracer<'a> {
    pub fn new(
        triangles: &'a [Triangle],
        lights: &'a [Light],
        octree: &'a Octree,
        max_reflections: u32,
    ) -> Self {
        Self {
            triangles,
            lights,
            octree,
            max_reflections,
        }
    }

    /// Nearest-hit query via octree marching.
    ///
    /// Marches the query point leaf by leaf along the ray (entering at the
    /// root-cube boundary when the origin starts outside), testing every
    /// triangle collected on each step's descent path. The first step whose
    /// candidate set yields any hit returns that step's closest hit; later
    /// leaves are not consulted. This is a locality-for-speed tradeoff, not
    /// a global nearest-intersection guarantee.
    pub fn intersect(&self, origin: Vec3, dir: Vec3) -> Option<Hit> {
        let mut point = origin;
        if !self.octree.contains(point) {
            let entry = self.octree.entry_distance(0, origin, dir);
            if entry < 0.0 {
                return None;
            }
            point = origin + dir * entry;
        }

        let mut previous: Option<NodeId> = None;
        while let Some(lookup) = self.octree.get_new_triangles(point, previous) {
            let mut best: Option<Hit> = None;
            for &node in &lookup.path {
                for &ti in self.octree.node_triangles(node) {
                    if let Some(hit) = raycast(origin, dir, &self.triangles[ti]) {
                        if best.as_ref().map_or(true, |b| hit.t < b.t) {
                            best = Some(hit);
                        }
                    }
                }
            }
            if best.is_some() {
                return best;
            }
            point += dir * self.octree.leaf_diameter(lookup.leaf);
            previous = Some(lookup.leaf);
        }
        None
    }

    /// Any-hit query for shadow rays.
    ///
    /// Offsets the origin slightly along the ray to avoid re-hitting the
    /// surface that spawned it, then marches exactly like [`Self::intersect`]
    /// but accepts the first hit within `max_dist` (the distance to the
    /// light). Returns false when the ray exits the root bound unobstructed.
    pub fn any_intersect(&self, origin: Vec3, dir: Vec3, max_dist: f32) -> bool {
        let origin = origin + dir * SHADOW_BIAS;

        let mut point = origin;
        if !self.octree.contains(point) {
            let entry = self.octree.entry_distance(0, origin, dir);
            if entry < 0.0 {
                return false;
            }
            point = origin + dir * entry;
        }

        let mut previous: Option<NodeId> = None;
        while let Some(lookup) = self.octree.get_new_triangles(point, previous) {
            for &node in &lookup.path {
                for &ti in self.octree.node_triangles(node) {
                    if let Some(hit) = raycast(origin, dir, &self.triangles[ti]) {
                        if hit.t <= max_dist {
                            return true;
                        }
                    }
                }
            }
            point += dir * self.octree.leaf_diameter(lookup.leaf);
            previous = Some(lookup.leaf);
        }
        false
    }

    /// Direct illumination at a hit point: inverse-square falloff summed over
    /// every light that passes a binary shadow test. No cosine term and no
    /// partial occlusion by translucent surfaces.
    pub fn local_illuminate(&self, hit: &Hit) -> f32 {
        let mut total = 0.0;
        for light in self.lights {
            let to_light = light.position - hit.point;
            let dist = to_light.length();
            if dist < EPS {
                continue;
            }
            let dir = to_light / dist;
            if !self.any_intersect(hit.point, dir, dist) {
                total += light.intensity / (4.0 * PI * dist * dist);
            }
        }
        total
    }

    /// Exact Fresnel reflectance at a dielectric boundary.
    ///
    /// Returns the fraction of incident energy reflected; 1.0 under total
    /// internal reflection. The indices swap when the ray exits the surface
    /// (cosi > 0).
    pub fn fresnel(ray: &Ray, hit: &Hit) -> f32 {
        let cosi = ray.direction().dot(hit.normal);
        let mut etai = 1.0;
        let mut etat = hit.ior;
        if cosi > 0.0 {
            std::mem::swap(&mut etai, &mut etat);
        }
        let sint = etai / etat * (1.0 - cosi * cosi).max(0.0).sqrt();
        if sint >= 1.0 {
            // Total internal reflection
            return 1.0;
        }
        let cost = (1.0 - sint * sint).max(0.0).sqrt();
        let cosi = cosi.abs();
        let rs = ((etat * cosi) - (etai * cost)) / ((etat * cosi) + (etai * cost));
        let rp = ((etai * cosi) - (etat * cost)) / ((etai * cosi) + (etat * cost));
        (rs * rs + rp * rp) / 2.0
    }

    /// Mirror reflection about the hit normal; the new ray keeps travelling
    /// in the incident ray's medium.
    pub fn reflect(ray: &Ray, hit: &Hit) -> Ray {
        let dir = ray.direction() - 2.0 * ray.direction().dot(hit.normal) * hit.normal;
        Ray::new(hit.point, dir, ray.ior())
    }

    /// Snell's-law refraction into the hit surface's medium.
    ///
    /// If the computed direction lands on the incident side (dot <= 0, a
    /// numerical degeneracy near grazing incidence), it is negated to keep
    /// propagation physically forward.
    pub fn refract(ray: &Ray, hit: &Hit) -> Ray {
        let c = hit.normal.dot(ray.direction());
        let r = ray.ior() / hit.ior;
        let k = (1.0 - r * r * (1.0 - c * c)).max(0.0);
        let mut dir = r * ray.direction() + (r * c - k.sqrt()) * hit.normal;
        if dir.dot(ray.direction()) <= 0.0 {
            dir = -dir;
        }
        Ray::new(hit.point, dir, hit.ior)
    }

    /// Recursive radiance accumulation for one ray.
    ///
    /// Terminates on bounce exhaustion, a negligible carried multiplier, or a
    /// miss. A hit contributes its direct illumination scaled by scattering;
    /// fully diffuse surfaces (scattering ~ 1) stop there, everything else
    /// splits the remaining energy by Fresnel reflectance into reflection and
    /// refraction branches whose returns are summed in.
    pub fn render_ray(&self, ray: &Ray, multiplier: f32, bounces: u32) -> f32 {
        if bounces >= self.max_reflections || multiplier < EPS {
            return 0.0;
        }
        let Some(hit) = self.intersect(ray.origin(), ray.direction()) else {
            return 0.0;
        };

        let mut energy = self.local_illuminate(&hit) * hit.scattering;
        if hit.scattering + EPS >= 1.0 {
            return energy;
        }

        let fresnel_intensity = 1.0 - hit.scattering;
        let reflection_intensity = Self::fresnel(ray, &hit);

        let reflection = Self::reflect(ray, &hit);
        energy += self.render_ray(
            &reflection,
            multiplier * fresnel_intensity * reflection_intensity,
            bounces + 1,
        );

        if reflection_intensity + EPS < 1.0 {
            let refraction = Self::refract(ray, &hit);
            energy += self.render_ray(
                &refraction,
                multiplier * fresnel_intensity * (1.0 - reflection_intensity),
                bounces + 1,
            );
        }

        energy
    }
}
