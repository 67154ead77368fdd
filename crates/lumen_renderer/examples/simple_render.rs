//! Simple path tracer example.
//!
//! Renders a small scene progressively and saves the result as PNG.
//!
//! Usage: simple_render [settings.json] [environment.hdr]

use std::time::Instant;

use anyhow::Result;
use lumen_core::{shapes, Material, Model, Scene, Sphere, Texture};
use lumen_renderer::{Camera, Image, RenderSettings, Renderer, Vec3};

const WIDTH: u32 = 480;
const HEIGHT: u32 = 270;
const FRAMES: u32 = 64;

fn main() -> Result<()> {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();

    let mut args = std::env::args().skip(1);
    let settings = match args.next() {
        Some(path) => RenderSettings::load(&path)?,
        None => RenderSettings::default(),
    };
    log::info!("Settings: {:?}", settings);

    let start = Instant::now();
    let mut scene = build_scene();
    if let Some(path) = args.next() {
        scene.add_environment(Texture::load_or_empty(&path));
    }
    log::info!(
        "Scene built in {:?} ({} triangles)",
        start.elapsed(),
        scene.triangle_count()
    );

    let mut camera = Camera::new(45.0, 0.1, 100.0);
    camera.on_resize(WIDTH, HEIGHT);
    camera.look_at(Vec3::new(0.0, 1.5, 6.0), Vec3::new(0.0, 0.5, 0.0));

    let mut renderer = Renderer::new(settings);
    let mut image = Image::new(WIDTH, HEIGHT);
    let mut accumulation = Image::new(WIDTH, HEIGHT);

    log::info!("Rendering {}x{} for {} frames...", WIDTH, HEIGHT, FRAMES);
    let start = Instant::now();
    for _ in 0..FRAMES {
        renderer.render(&scene, &camera, &mut image, &mut accumulation);
    }
    log::info!("Rendered in {:?}", start.elapsed());

    image.save_png("output.png")?;
    Ok(())
}

fn build_scene() -> Scene {
    let mut scene = Scene::new();
    scene.background = Vec3::new(0.6, 0.7, 0.9);

    let ground = Material::new("ground", Vec3::new(0.5, 0.5, 0.5));
    let floor = shapes::quad(
        "floor",
        Vec3::new(-10.0, 0.0, 10.0),
        Vec3::new(20.0, 0.0, 0.0),
        Vec3::new(0.0, 0.0, -20.0),
        ground,
    );

    let clay = Material::new("clay", Vec3::new(0.8, 0.3, 0.2)).with_roughness(0.9);
    let ball = shapes::icosphere("ball", 1.0, 3, clay);

    let gold = Material::new("gold", Vec3::new(1.0, 0.78, 0.34))
        .with_specular(Vec3::ONE, 0.8)
        .with_roughness(0.15)
        .with_metallic(1.0);
    let cube = shapes::cube("cube", Vec3::new(2.2, 0.6, -0.5), 1.2, gold);

    scene.add_model(Model::new("floor", vec![floor]));
    scene.add_model(Model::new("props", vec![ball_at_rest(ball), cube]));

    let lamp = Material::emissive("lamp", Vec3::new(1.0, 0.9, 0.7), 6.0);
    scene.add_sphere(Sphere::new(Vec3::new(-2.5, 2.5, 1.0), 0.5, lamp));

    scene
}

/// The icosphere is built around the origin; lift it onto the floor.
fn ball_at_rest(ball: lumen_core::Mesh) -> lumen_core::Mesh {
    let vertices = ball
        .vertices()
        .iter()
        .map(|v| {
            let mut v = *v;
            v.position.y += 1.0;
            v
        })
        .collect();
    let material = ball.material().clone();
    lumen_core::Mesh::new(ball.name(), vertices, ball.indices().to_vec(), material)
}
