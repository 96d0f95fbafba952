#![allow(clippy::cast_precision_loss)]
//! Demo of a reflective floor under a ring of cubes.
//!
//! Renders headlessly: the camera orbits the scene and dips below the floor
//! for part of the orbit, where the reflection is skipped (logged at trace
//! level).
//! Pass a JSON file to override the reflector configuration:
//!
//! ```text
//! RUST_LOG=debug cargo run --example floor_reflection -- reflector.json
//! ```

use std::f32::consts::TAU;

use reflector::{
    floor_matrix, headless_renderer, init, install_floor_reflector, Camera, FrameDriver, Mat4,
    ReflectorConfig, ScreenSize, SimpleScene, SurfaceGeometry, SurfaceMesh, Vec3,
};

fn load_config() -> reflector::Result<ReflectorConfig> {
    match std::env::args().nth(1) {
        Some(path) => {
            let json = std::fs::read_to_string(&path)
                .map_err(|e| reflector::ReflectorError::InvalidConfig(format!("{path}: {e}")))?;
            ReflectorConfig::from_json_str(&json)
        }
        None => Ok(ReflectorConfig::default().with_surface_offset(0.01)),
    }
}

fn main() -> reflector::Result<()> {
    init();

    let screen = ScreenSize::new(640, 480, 1.0);
    let mut renderer = headless_renderer(screen.width, screen.height)?;
    renderer.set_clear_color(wgpu::Color {
        r: 0.02,
        g: 0.02,
        b: 0.04,
        a: 1.0,
    });

    let mut scene = SimpleScene::new();
    let ground = scene.add_node("ground", None, floor_matrix(0.0));
    let ground_mesh = SurfaceMesh::from_geometry(renderer.device(), &SurfaceGeometry::rectangle(12.0, 12.0));
    renderer.add_mesh(ground, ground_mesh, Vec3::splat(0.25));

    for i in 0..6 {
        let angle = i as f32 / 6.0 * TAU;
        let position = Vec3::new(3.0 * angle.cos(), 0.5, 3.0 * angle.sin());
        let cube = scene.add_node(format!("cube {i}"), None, Mat4::from_translation(position));
        let mesh = SurfaceMesh::cuboid(renderer.device(), Vec3::splat(0.5));
        let hue = i as f32 / 6.0;
        renderer.add_mesh(cube, mesh, Vec3::new(hue, 1.0 - hue, 0.5));
    }

    let mut driver = FrameDriver::new();
    let floor = install_floor_reflector(
        &mut driver,
        &mut renderer,
        &mut scene,
        "ground",
        SurfaceGeometry::rectangle(12.0, 12.0),
        load_config()?,
        screen,
    )?;

    let mut camera = Camera::looking_at(Vec3::new(0.0, 4.0, 8.0), Vec3::ZERO, screen.aspect_ratio());
    let frames = 120;
    for frame in 0..frames {
        let t = frame as f32 / frames as f32 * TAU;
        camera.position = Vec3::new(8.0 * t.cos(), 3.0 * t.sin() + 1.0, 8.0 * t.sin());
        driver.tick(&mut scene, &mut renderer, &camera)?;
    }

    let larger = ScreenSize::new(1280, 960, 2.0);
    renderer.resize_screen(larger.width, larger.height)?;
    driver.resize(&mut renderer, larger)?;
    camera.set_aspect_ratio(larger.aspect_ratio());
    driver.tick(&mut scene, &mut renderer, &camera)?;

    driver.dispose_pass(floor.pass, &mut renderer);
    log::info!("rendered {} frames", driver.frame_index());
    Ok(())
}
