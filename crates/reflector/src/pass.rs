//! The reflector as a pre-render pass of the wgpu renderer.

use reflector_core::{
    Camera, FrameDriver, PassId, PlanarReflector, PreRenderPass, ReflectionOutcome, Result,
    SceneGraph, ScreenSize,
};
use reflector_render::{GpuRenderer, MeshDrawer};

/// A [`PlanarReflector`] whose surface is drawn by a [`MeshDrawer`].
///
/// After each update the surface's material inputs are handed to the drawer,
/// so the primary render of the same frame samples the fresh reflection.
pub struct GpuReflectorPass {
    reflector: PlanarReflector,
}

impl GpuReflectorPass {
    /// Registers the reflector's surface with the renderer's drawer.
    /// On failure the reflector's target is released.
    pub fn new(renderer: &mut GpuRenderer<MeshDrawer>, reflector: PlanarReflector) -> Result<Self> {
        if let Err(e) = renderer.add_reflector_surface(
            reflector.node(),
            reflector.geometry(),
            reflector.buffer().target(),
        ) {
            reflector.dispose(renderer);
            return Err(e);
        }
        Ok(Self { reflector })
    }

    pub fn reflector(&self) -> &PlanarReflector {
        &self.reflector
    }

    pub fn reflector_mut(&mut self) -> &mut PlanarReflector {
        &mut self.reflector
    }

    /// Adds this pass to `driver`.
    pub fn install<S: SceneGraph>(
        self,
        driver: &mut FrameDriver<S, GpuRenderer<MeshDrawer>>,
    ) -> PassId {
        driver.add_pass(Box::new(self))
    }
}

impl<S: SceneGraph> PreRenderPass<S, GpuRenderer<MeshDrawer>> for GpuReflectorPass {
    fn name(&self) -> &str {
        "gpu planar reflector"
    }

    fn run(
        &mut self,
        renderer: &mut GpuRenderer<MeshDrawer>,
        scene: &mut S,
        camera: &Camera,
        frame: u64,
    ) {
        let outcome = self.reflector.update(renderer, scene, camera, frame);
        if outcome != ReflectionOutcome::Rendered {
            log::trace!("reflector on {:?}: {outcome:?}", self.reflector.node());
        }
        if self.reflector.buffer().has_contents() {
            renderer
                .drawer_mut()
                .set_reflector_params(self.reflector.node(), self.reflector.params());
        }
    }

    fn resize(&mut self, renderer: &mut GpuRenderer<MeshDrawer>, screen: ScreenSize) -> Result<()> {
        self.reflector.resize(renderer, screen)
    }

    fn dispose(self: Box<Self>, renderer: &mut GpuRenderer<MeshDrawer>) {
        let node = self.reflector.node();
        renderer.drawer_mut().remove(node);
        self.reflector.dispose(renderer);
    }
}
