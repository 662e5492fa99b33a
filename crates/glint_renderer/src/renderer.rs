//! Render entry point: octree build, worker pool, exposure.
//!
//! Scheduling model: every block is pre-enqueued into one mutex-guarded
//! queue, then a fixed pool of scoped worker threads drains it. A worker pops
//! a block, traces its pixels into a block-local buffer with no shared
//! mutable state, and pushes the finished buffer onto a mutex-guarded result
//! list. The scope join is the barrier; the buffers are spliced into the
//! canvas (disjoint ranges) and exposure runs strictly after it.

use std::collections::VecDeque;
use std::sync::Mutex;
use std::thread;
use std::time::Instant;

use glint_core::Scene;

use crate::block::{generate_blocks, render_block, Block, DEFAULT_BLOCK_SIZE};
use crate::camera::Camera;
use crate::canvas::Canvas;
use crate::octree::Octree;
use crate::trace::Tracer;

/// Number of worker threads: available parallelism minus one, at least one.
fn worker_count() -> usize {
    thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(2)
        .saturating_sub(1)
        .max(1)
}

/// Render the scene into the canvas and expose it.
///
/// Builds the octree, traces every pixel across the worker pool, joins all
/// workers, then runs the camera's exposure pass. The canvas is the only
/// thing mutated; scene and camera are shared read-only with the workers.
pub fn render(scene: &Scene, camera: &Camera, canvas: &mut Canvas) {
    let build_start = Instant::now();
    let triangles = scene.triangles();
    let octree = Octree::build(&triangles, &scene.bounds());
    log::debug!(
        "octree over {} triangles built in {:?}",
        triangles.len(),
        build_start.elapsed()
    );

    let tracer = Tracer::new(
        &triangles,
        scene.lights(),
        &octree,
        camera.max_reflections(),
    );

    let width = canvas.width();
    let height = canvas.height();
    let blocks = generate_blocks(canvas.pixel_count(), DEFAULT_BLOCK_SIZE);
    let workers = worker_count();
    log::info!(
        "rendering {width}x{height} ({} blocks) on {workers} workers",
        blocks.len()
    );

    let trace_start = Instant::now();
    let queue: Mutex<VecDeque<Block>> = Mutex::new(blocks.into());
    let results: Mutex<Vec<(Block, Vec<f32>)>> = Mutex::new(Vec::new());

    thread::scope(|s| {
        for _ in 0..workers {
            s.spawn(|| loop {
                let block = queue.lock().unwrap().pop_front();
                let Some(block) = block else { break };
                let radiances = render_block(&block, camera, &tracer, width, height);
                results.lock().unwrap().push((block, radiances));
            });
        }
    });

    for (block, radiances) in results.into_inner().unwrap() {
        canvas.write_range(block.start, &radiances);
    }

    camera.expose(canvas);
    log::info!("render finished in {:?}", trace_start.elapsed());
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::camera::Exposure;
    use glint_core::{Light, Mesh};
    use glint_math::Vec3;
    use std::f32::consts::{FRAC_PI_2, PI};

    /// A large fully-diffuse triangle in the XZ plane at y = 0.
    fn floor_scene(light: Light) -> Scene {
        let vertices = [
            -8.0, 0.0, -8.0, //
            8.0, 0.0, -8.0, //
            0.0, 0.0, 8.0,
        ];
        let mesh = Mesh::from_buffers(&vertices, &[0, 1, 2], 1.0, 1.5).unwrap();

        let mut scene = Scene::new();
        scene.add_mesh(mesh);
        scene.add_light(light);
        scene
    }

    /// Camera hovering above the origin, looking straight down.
    fn overhead_camera() -> Camera {
        Camera::new()
            .with_position(Vec3::new(0.0, 10.0, 0.0))
            .with_rotation(Vec3::new(-FRAC_PI_2, 0.0, 0.0))
            .with_focal_plane(1.0, 0.2, 0.2)
    }

    #[test]
    fn test_end_to_end_single_triangle() {
        // Light at distance 2 above the floor; expected radiance at a lit
        // pixel is intensity / (4 pi d^2) = 1.0 before exposure.
        let d = 2.0;
        let intensity = 4.0 * PI * d * d;
        let scene = floor_scene(Light::new(Vec3::new(0.0, d, 0.0), intensity));

        // Manual cap of 2.0 halves the expected value instead of
        // auto-normalizing it away.
        let camera = overhead_camera().with_exposure(Exposure::ManualLinear(2.0));
        let mut canvas = Canvas::new(9, 9);
        render(&scene, &camera, &mut canvas);

        // Center pixel maps onto the triangle. It sits half a pixel off the
        // optical axis, so allow a small inverse-square deviation.
        let center = canvas.get(4, 4);
        assert!(
            (center - 0.5).abs() < 1e-2,
            "center pixel radiance {center}, expected ~0.5"
        );
    }

    #[test]
    fn test_rays_missing_geometry_stay_dark() {
        let scene = floor_scene(Light::new(Vec3::new(0.0, 2.0, 0.0), 100.0));
        // Wide focal plane: corner rays shoot past the triangle
        let camera = Camera::new()
            .with_position(Vec3::new(0.0, 10.0, 0.0))
            .with_rotation(Vec3::new(-FRAC_PI_2, 0.0, 0.0))
            .with_focal_plane(1.0, 4.0, 4.0)
            .with_exposure(Exposure::ManualLinear(1.0));
        let mut canvas = Canvas::new(9, 9);
        render(&scene, &camera, &mut canvas);

        assert!(canvas.get(4, 4) > 0.0, "center pixel should see the floor");
        assert_eq!(canvas.get(0, 0), 0.0, "corner ray should miss everything");
        assert_eq!(canvas.get(8, 8), 0.0);
    }

    #[test]
    fn test_render_is_deterministic_across_runs() {
        let scene = floor_scene(Light::new(Vec3::new(0.5, 3.0, 0.5), 80.0));
        let camera = overhead_camera();

        let mut first = Canvas::new(16, 16);
        render(&scene, &camera, &mut first);
        let mut second = Canvas::new(16, 16);
        render(&scene, &camera, &mut second);

        assert_eq!(first.cells(), second.cells());
    }

    #[test]
    fn test_every_pixel_written_once() {
        // Seed the canvas with a sentinel; the render must overwrite every
        // cell (hit or miss), proving full block coverage.
        let scene = floor_scene(Light::new(Vec3::new(0.0, 2.0, 0.0), 100.0));
        let camera = overhead_camera().with_exposure(Exposure::ManualLinear(1.0));

        let mut canvas = Canvas::new(33, 17);
        for cell in canvas.cells_mut() {
            *cell = f32::NAN;
        }
        render(&scene, &camera, &mut canvas);

        assert!(canvas.cells().iter().all(|c| !c.is_nan()));
    }
}
