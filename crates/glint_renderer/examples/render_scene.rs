//! Simple ray tracer example.
//!
//! Renders a glass pyramid over a diffuse floor and saves a grayscale PNG.

use anyhow::Result;
use glint_core::{Light, Mesh, Scene};
use glint_renderer::{render, Camera, Canvas, Exposure, Vec3};

fn main() -> Result<()> {
    env_logger::init();

    println!("Glint Ray Tracer - Simple Example");
    println!("=================================");

    let start = std::time::Instant::now();
    let scene = build_scene()?;
    println!(
        "Scene built in {:?} ({} triangles)",
        start.elapsed(),
        scene.triangle_count()
    );

    let camera = Camera::new()
        .with_position(Vec3::new(0.0, 3.0, -8.0))
        .with_rotation(Vec3::new(-0.25, 0.0, 0.0))
        .with_focal_plane(1.0, 1.6, 0.9)
        .with_exposure(Exposure::AutoLinear)
        .with_max_reflections(8);

    let width = 800;
    let height = 450;
    let mut canvas = Canvas::new(width, height);

    println!("Rendering {width}x{height}...");
    let start = std::time::Instant::now();
    render(&scene, &camera, &mut canvas);
    println!("Rendered in {:?}", start.elapsed());

    let filename = "output.png";
    save_png(&canvas, filename)?;
    println!("Saved to {filename}");

    Ok(())
}

fn build_scene() -> Result<Scene> {
    let mut scene = Scene::new();

    // Diffuse floor
    let floor_vertices = [
        -20.0, 0.0, -20.0, //
        20.0, 0.0, -20.0, //
        20.0, 0.0, 20.0, //
        -20.0, 0.0, 20.0,
    ];
    let floor_indices = [0, 1, 2, 0, 2, 3];
    scene.add_mesh(Mesh::from_buffers(&floor_vertices, &floor_indices, 1.0, 1.0)?);

    // Glassy pyramid, mostly transmissive
    let apex_y = 2.5;
    let pyramid_vertices = [
        -1.5, 0.0, -1.5, //
        1.5, 0.0, -1.5, //
        1.5, 0.0, 1.5, //
        -1.5, 0.0, 1.5, //
        0.0, apex_y, 0.0,
    ];
    let pyramid_indices = [
        0, 1, 4, //
        1, 2, 4, //
        2, 3, 4, //
        3, 0, 4, //
        0, 2, 1, //
        0, 3, 2,
    ];
    scene.add_mesh(Mesh::from_buffers(
        &pyramid_vertices,
        &pyramid_indices,
        0.1,
        1.5,
    )?);

    scene.add_light(Light::new(Vec3::new(4.0, 8.0, -4.0), 2000.0));
    scene.add_light(Light::new(Vec3::new(-6.0, 5.0, 2.0), 800.0));

    Ok(scene)
}

fn save_png(canvas: &Canvas, filename: &str) -> Result<()> {
    let mut img = image::GrayImage::new(canvas.width() as u32, canvas.height() as u32);
    for (x, y, pixel) in img.enumerate_pixels_mut() {
        let value = canvas.get(y as usize, x as usize);
        *pixel = image::Luma([(value * 255.0) as u8]);
    }
    img.save(filename)?;
    Ok(())
}
