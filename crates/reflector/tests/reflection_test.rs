//! End-to-end reflection tests against a spy renderer.
//!
//! No GPU is needed: the spy records what would have been drawn.

mod common;

use common::SpyRenderer;
use reflector::*;

const SCREEN: ScreenSize = ScreenSize {
    width: 640,
    height: 360,
    pixel_ratio: 1.0,
};

struct Stage {
    scene: SimpleScene,
    renderer: SpyRenderer,
    driver: FrameDriver<SimpleScene, SpyRenderer>,
    ground: NodeId,
    cube: NodeId,
    surface: NodeId,
    target: RenderTargetId,
}

/// A ground node at y = 0, a cube above it, and a floor reflector over the
/// ground.
fn stage(config: ReflectorConfig) -> Stage {
    let mut scene = SimpleScene::new();
    let ground = scene.add_node("ground", None, floor_matrix(0.0));
    let cube = scene.add_node("cube", None, Mat4::from_translation(Vec3::new(0.0, 1.0, 0.0)));
    let mut renderer = SpyRenderer::default();
    let reflector = floor_reflector(
        &mut renderer,
        &mut scene,
        "ground",
        SurfaceGeometry::rectangle(20.0, 20.0),
        config,
        SCREEN,
    )
    .unwrap();
    let surface = reflector.node();
    let target = reflector.buffer().target();
    let mut driver = FrameDriver::new();
    driver.add_pass(Box::new(reflector));
    Stage {
        scene,
        renderer,
        driver,
        ground,
        cube,
        surface,
        target,
    }
}

fn camera_at(position: Vec3) -> Camera {
    Camera::looking_at(position, Vec3::ZERO, SCREEN.aspect_ratio())
}

#[test]
fn test_front_camera_renders_mirrored_view() {
    let mut stage = stage(ReflectorConfig::default());
    let camera = camera_at(Vec3::new(0.0, 5.0, 10.0));

    stage
        .driver
        .tick(&mut stage.scene, &mut stage.renderer, &camera)
        .unwrap();

    assert_eq!(stage.renderer.draws.len(), 2);
    let reflection = &stage.renderer.draws[0];
    assert_eq!(reflection.target, Some(stage.target));
    assert!((reflection.camera.position - Vec3::new(0.0, -5.0, 10.0)).length() < 1e-4);
    assert_eq!(reflection.camera.far, camera.far);
    assert!(!reflection.xr_enabled);
    assert!(!reflection.shadow_auto_update);

    // The surface and the ground it covers are hidden; everything else shows.
    assert!(!reflection.visible.contains(&stage.surface));
    assert!(!reflection.visible.contains(&stage.ground));
    assert!(reflection.visible.contains(&stage.cube));

    let primary = &stage.renderer.draws[1];
    assert_eq!(primary.target, None);
    assert!(primary.xr_enabled);
    assert!(primary.shadow_auto_update);
    for node in [stage.surface, stage.ground, stage.cube] {
        assert!(primary.visible.contains(&node));
    }
}

#[test]
fn test_camera_behind_floor_skips_reflection() {
    let mut stage = stage(ReflectorConfig::default());
    let camera = camera_at(Vec3::new(0.0, -5.0, 10.0));

    stage
        .driver
        .tick(&mut stage.scene, &mut stage.renderer, &camera)
        .unwrap();

    assert!(stage.renderer.offscreen_draws().is_empty());
    assert_eq!(stage.renderer.draws.len(), 1);
}

#[test]
fn test_camera_crossing_the_floor() {
    let mut stage = stage(ReflectorConfig::default());
    let heights = [4.0, 1.0, -1.0, -4.0, 2.0];
    for height in heights {
        let camera = camera_at(Vec3::new(0.0, height, 10.0));
        stage
            .driver
            .tick(&mut stage.scene, &mut stage.renderer, &camera)
            .unwrap();
    }
    // One reflection per frame with the camera above the floor.
    assert_eq!(stage.renderer.offscreen_draws().len(), 3);
    assert_eq!(stage.driver.frame_index(), heights.len() as u64);
}

#[test]
fn test_surface_offset_lifts_reflection_plane() {
    let mut stage = stage(ReflectorConfig::default().with_surface_offset(0.5));
    let surface_world = stage.scene.world_matrix(stage.surface).unwrap();
    assert!((surface_world.w_axis.truncate() - Vec3::new(0.0, 0.5, 0.0)).length() < 1e-6);

    let camera = camera_at(Vec3::new(0.0, 5.0, 10.0));
    stage
        .driver
        .tick(&mut stage.scene, &mut stage.renderer, &camera)
        .unwrap();
    let reflection = &stage.renderer.draws[0];
    // Mirrored across y = 0.5.
    assert!((reflection.camera.position - Vec3::new(0.0, -4.0, 10.0)).length() < 1e-4);
}

#[test]
fn test_failed_reflection_leaves_scene_intact() {
    let mut stage = stage(ReflectorConfig::default());
    stage.renderer.fail_offscreen = true;
    let camera = camera_at(Vec3::new(0.0, 5.0, 10.0));

    stage
        .driver
        .tick(&mut stage.scene, &mut stage.renderer, &camera)
        .unwrap();

    assert_eq!(stage.renderer.draws.len(), 1);
    assert_eq!(stage.renderer.target, None);
    assert!(stage.renderer.xr_enabled);
    assert!(stage.renderer.shadow_auto_update);
    for node in [stage.surface, stage.ground, stage.cube] {
        assert_eq!(stage.scene.is_visible(node), Some(true));
    }
}

#[test]
fn test_manual_clear_and_viewport() {
    let mut stage = stage(ReflectorConfig::default());
    stage.renderer.auto_clear = false;
    let mut camera = camera_at(Vec3::new(0.0, 5.0, 10.0));
    camera.viewport = Some(Viewport::new(320, 180));

    stage
        .driver
        .tick(&mut stage.scene, &mut stage.renderer, &camera)
        .unwrap();

    // One clear for the reflection target, one for the screen.
    assert_eq!(stage.renderer.clears, 2);
    assert_eq!(stage.renderer.viewport, Some(Viewport::new(320, 180)));
}

#[test]
fn test_resize_round_trip() {
    let mut stage = stage(ReflectorConfig::default());
    assert_eq!(stage.renderer.sizes[&stage.target], (640, 360));

    stage
        .driver
        .resize(&mut stage.renderer, ScreenSize::new(1920, 1080, 3.0))
        .unwrap();
    // Pixel ratio is capped at 2.
    assert_eq!(stage.renderer.sizes[&stage.target], (3840, 2160));

    stage.driver.resize(&mut stage.renderer, SCREEN).unwrap();
    assert_eq!(stage.renderer.sizes[&stage.target], (640, 360));
}

#[test]
fn test_fixed_texture_size_ignores_screen() {
    let mut stage = stage(ReflectorConfig::default().with_texture_size(512, 512));
    assert_eq!(stage.renderer.sizes[&stage.target], (512, 512));
    stage
        .driver
        .resize(&mut stage.renderer, ScreenSize::new(1920, 1080, 1.0))
        .unwrap();
    assert_eq!(stage.renderer.sizes[&stage.target], (512, 512));
}

#[test]
fn test_missing_ground_is_an_error() {
    let mut scene = SimpleScene::new();
    let mut renderer = SpyRenderer::default();
    let result = floor_reflector(
        &mut renderer,
        &mut scene,
        "ground",
        SurfaceGeometry::rectangle(1.0, 1.0),
        ReflectorConfig::default(),
        SCREEN,
    );
    assert!(matches!(result, Err(ReflectorError::NodeNameNotFound(name)) if name == "ground"));
    assert!(scene.is_empty());
    assert!(renderer.sizes.is_empty());
}

#[test]
fn test_failed_allocation_leaves_scene_unchanged() {
    let mut scene = SimpleScene::new();
    scene.add_node("ground", None, floor_matrix(0.0));
    let mut renderer = SpyRenderer {
        fail_allocation: true,
        ..SpyRenderer::default()
    };
    let result = floor_reflector(
        &mut renderer,
        &mut scene,
        "ground",
        SurfaceGeometry::rectangle(1.0, 1.0),
        ReflectorConfig::default(),
        SCREEN,
    );
    assert!(matches!(result, Err(ReflectorError::TargetAllocation { .. })));
    assert_eq!(scene.len(), 1);
    assert_eq!(scene.find_by_name("ground reflector"), None);
    assert!(renderer.sizes.is_empty());

    // The scene is still usable once allocation succeeds.
    renderer.fail_allocation = false;
    let reflector = floor_reflector(
        &mut renderer,
        &mut scene,
        "ground",
        SurfaceGeometry::rectangle(1.0, 1.0),
        ReflectorConfig::default(),
        SCREEN,
    )
    .unwrap();
    assert_eq!(scene.find_by_name("ground reflector"), Some(reflector.node()));
    assert_eq!(scene.len(), 2);
}

#[test]
fn test_config_from_json() {
    let config = ReflectorConfig::from_json_str(r#"{ "opacity": 0.5, "blend_mode": "alpha" }"#).unwrap();
    assert_eq!(config.opacity, 0.5);
    assert_eq!(config.blend_mode, BlendMode::Alpha);
    assert_eq!(config.clip_bias, ReflectorConfig::default().clip_bias);

    let mut stage = stage(config);
    let camera = camera_at(Vec3::new(0.0, 5.0, 10.0));
    stage
        .driver
        .tick(&mut stage.scene, &mut stage.renderer, &camera)
        .unwrap();
    assert_eq!(stage.renderer.offscreen_draws().len(), 1);
}
