//! reflector-rs: planar reflections for wgpu scenes.
//!
//! A [`PlanarReflector`] re-renders the scene once per frame from a camera
//! mirrored across a flat surface, with the near plane bent onto the surface
//! so nothing behind it leaks into the reflection. The surface then samples
//! that image through a projective texture matrix.
//!
//! # Quick Start
//!
//! ```no_run
//! use reflector::*;
//!
//! fn main() -> Result<()> {
//!     init();
//!
//!     let mut scene = SimpleScene::new();
//!     scene.add_node("ground", None, floor_matrix(0.0));
//!
//!     let screen = ScreenSize::new(800, 600, 1.0);
//!     let mut renderer = headless_renderer(screen.width, screen.height)?;
//!     let mut driver = FrameDriver::new();
//!     install_floor_reflector(
//!         &mut driver,
//!         &mut renderer,
//!         &mut scene,
//!         "ground",
//!         SurfaceGeometry::rectangle(10.0, 10.0),
//!         ReflectorConfig::default().with_surface_offset(0.01),
//!         screen,
//!     )?;
//!
//!     let camera = Camera::looking_at(Vec3::new(0.0, 2.0, 6.0), Vec3::ZERO, screen.aspect_ratio());
//!     driver.tick(&mut scene, &mut renderer, &camera)?;
//!     Ok(())
//! }
//! ```

// Documentation lints - internal functions don't need exhaustive panic/error docs
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::module_name_repetitions)]

mod floor;
mod pass;

pub use floor::{floor_reflector, install_floor_reflector, FloorReflector};
pub use pass::GpuReflectorPass;

// Re-export core types
pub use reflector_core::{
    floor_matrix, placed_over, BlendMode, Camera, CameraView, FrameDriver, HiddenNodes,
    MirroredCamera, NodeId, PassId, PlanarReflector, Plane, PreRenderPass,
    ReflectionBuffer, ReflectionOutcome, ReflectorConfig, ReflectorError, ReflectorParams,
    RenderTargetId, Renderer, RendererStateGuard, Result, SceneGraph, SceneNode, ScreenSize,
    SimpleScene, SurfaceFrame, SurfaceGeometry, Viewport,
};
pub use reflector_core::{Mat4, Vec2, Vec3, Vec4};

// Re-export render types
pub use reflector_render::{
    GpuContext, GpuRenderer, MeshDrawer, ReflectionTarget, RenderError, SceneDrawer, SurfaceMesh,
};

use pollster::FutureExt;

/// Installs the `env_logger` backend for the `log` macros.
///
/// Safe to call more than once; later calls leave the first logger in place.
pub fn init() {
    let _ = env_logger::try_init();
    log::info!("reflector-rs initialized");
}

/// Creates a headless GPU context.
pub fn headless_context() -> Result<GpuContext> {
    Ok(GpuContext::new_headless().block_on()?)
}

/// Creates a wgpu renderer with a `width` x `height` offscreen screen target
/// and a [`MeshDrawer`].
pub fn headless_renderer(width: u32, height: u32) -> Result<GpuRenderer<MeshDrawer>> {
    let context = headless_context()?;
    let drawer = MeshDrawer::new(&context.device);
    GpuRenderer::new(context, width, height, drawer)
}
