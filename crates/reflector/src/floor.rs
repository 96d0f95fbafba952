//! Floor reflectors placed over an existing ground node.

use reflector_core::{
    placed_over, FrameDriver, NodeId, PassId, PlanarReflector, ReflectorConfig, ReflectorError,
    Renderer, Result, SceneGraph, ScreenSize, SimpleScene, SurfaceGeometry,
};
use reflector_render::{GpuRenderer, MeshDrawer};

use crate::pass::GpuReflectorPass;

/// Ids of an installed floor reflector.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FloorReflector {
    /// The reflective surface node added to the scene.
    pub surface: NodeId,
    /// The pre-render pass driving it.
    pub pass: PassId,
}

/// Adds a reflective surface over the node named `ground_name`.
///
/// The surface copies the ground's world transform, lifted by
/// `config.surface_offset` along its normal, and the ground is hidden while
/// the reflection renders. If the reflection target cannot be allocated the
/// surface node is removed again and the scene is left as it was.
pub fn floor_reflector<R: Renderer + ?Sized>(
    renderer: &mut R,
    scene: &mut SimpleScene,
    ground_name: &str,
    geometry: SurfaceGeometry,
    config: ReflectorConfig,
    screen: ScreenSize,
) -> Result<PlanarReflector> {
    let ground = scene
        .find_by_name(ground_name)
        .ok_or_else(|| ReflectorError::NodeNameNotFound(ground_name.to_string()))?;
    let ground_world = scene
        .world_matrix(ground)
        .ok_or(ReflectorError::NodeNotFound(ground))?;

    let surface_world = placed_over(ground_world, config.surface_offset);
    let surface = scene.add_node(format!("{ground_name} reflector"), None, surface_world);

    let mut reflector = match PlanarReflector::new(renderer, surface, geometry, config, screen) {
        Ok(reflector) => reflector,
        Err(e) => {
            scene.remove_last(surface);
            return Err(e);
        }
    };
    reflector.hide_during_pass(ground);
    log::info!("floor reflector {surface:?} installed over '{ground_name}'");
    Ok(reflector)
}

/// Adds a floor reflector and registers it with the renderer and `driver`.
///
/// Nothing is left behind in the scene or the renderer on failure.
pub fn install_floor_reflector(
    driver: &mut FrameDriver<SimpleScene, GpuRenderer<MeshDrawer>>,
    renderer: &mut GpuRenderer<MeshDrawer>,
    scene: &mut SimpleScene,
    ground_name: &str,
    geometry: SurfaceGeometry,
    config: ReflectorConfig,
    screen: ScreenSize,
) -> Result<FloorReflector> {
    let reflector = floor_reflector(renderer, scene, ground_name, geometry, config, screen)?;
    let surface = reflector.node();
    let pass = match GpuReflectorPass::new(renderer, reflector) {
        Ok(pass) => pass.install(driver),
        Err(e) => {
            scene.remove_last(surface);
            return Err(e);
        }
    };
    Ok(FloorReflector { surface, pass })
}
