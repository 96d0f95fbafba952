//! Per-frame driver: ordered pre-render passes followed by the primary render.

use crate::camera::Camera;
use crate::config::ScreenSize;
use crate::error::Result;
use crate::reflector::{PlanarReflector, ReflectionOutcome};
use crate::renderer::{CameraView, Renderer};
use crate::scene::SceneGraph;

/// Work that must run before the primary render of every frame.
pub trait PreRenderPass<S: SceneGraph, R: Renderer> {
    /// Short name for logs.
    fn name(&self) -> &str;

    /// Runs the pass for `frame`. Must not fail the frame.
    fn run(&mut self, renderer: &mut R, scene: &mut S, camera: &Camera, frame: u64);

    /// Reacts to a screen resize.
    fn resize(&mut self, _renderer: &mut R, _screen: ScreenSize) -> Result<()> {
        Ok(())
    }

    /// Releases GPU resources when the pass is removed.
    fn dispose(self: Box<Self>, _renderer: &mut R) {}
}

impl<S: SceneGraph, R: Renderer> PreRenderPass<S, R> for PlanarReflector {
    fn name(&self) -> &str {
        "planar reflector"
    }

    fn run(&mut self, renderer: &mut R, scene: &mut S, camera: &Camera, frame: u64) {
        let outcome = self.update(renderer, scene, camera, frame);
        if outcome != ReflectionOutcome::Rendered {
            log::trace!("reflector on {:?}: {outcome:?}", self.node());
        }
    }

    fn resize(&mut self, renderer: &mut R, screen: ScreenSize) -> Result<()> {
        PlanarReflector::resize(self, renderer, screen)
    }

    fn dispose(self: Box<Self>, renderer: &mut R) {
        PlanarReflector::dispose(*self, renderer);
    }
}

/// Handle to a registered pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PassId(u64);

/// Runs registered pre-render passes in registration order, then renders
/// the scene once to the screen.
pub struct FrameDriver<S: SceneGraph, R: Renderer> {
    passes: Vec<(PassId, Box<dyn PreRenderPass<S, R>>)>,
    next_pass: u64,
    frame: u64,
}

impl<S: SceneGraph, R: Renderer> Default for FrameDriver<S, R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: SceneGraph, R: Renderer> FrameDriver<S, R> {
    /// Creates a driver with no passes.
    pub fn new() -> Self {
        Self {
            passes: Vec::new(),
            next_pass: 0,
            frame: 0,
        }
    }

    /// Appends a pass; it runs after all previously added passes.
    pub fn add_pass(&mut self, pass: Box<dyn PreRenderPass<S, R>>) -> PassId {
        let id = PassId(self.next_pass);
        self.next_pass += 1;
        log::debug!("registered pre-render pass '{}' as {id:?}", pass.name());
        self.passes.push((id, pass));
        id
    }

    /// Removes a pass. It is not run again.
    pub fn remove_pass(&mut self, id: PassId) -> Option<Box<dyn PreRenderPass<S, R>>> {
        let index = self.passes.iter().position(|(pass_id, _)| *pass_id == id)?;
        Some(self.passes.remove(index).1)
    }

    /// Removes a pass and releases its resources.
    pub fn dispose_pass(&mut self, id: PassId, renderer: &mut R) -> bool {
        match self.remove_pass(id) {
            Some(pass) => {
                pass.dispose(renderer);
                true
            }
            None => false,
        }
    }

    /// Number of registered passes.
    pub fn pass_count(&self) -> usize {
        self.passes.len()
    }

    /// Names of the registered passes, in run order.
    pub fn pass_names(&self) -> Vec<&str> {
        self.passes.iter().map(|(_, pass)| pass.name()).collect()
    }

    /// Index of the next frame to be ticked.
    pub fn frame_index(&self) -> u64 {
        self.frame
    }

    /// Runs one frame: every pass in order, then the primary render to the
    /// screen. Only the primary render's error is returned.
    pub fn tick(&mut self, scene: &mut S, renderer: &mut R, camera: &Camera) -> Result<()> {
        let frame = self.frame;
        self.frame += 1;

        for (_, pass) in &mut self.passes {
            pass.run(renderer, scene, camera, frame);
        }

        renderer.set_render_target(None);
        if let Some(viewport) = camera.viewport {
            renderer.set_viewport(viewport);
        }
        if !renderer.auto_clear() {
            renderer.clear()?;
        }
        renderer.render(&*scene, &CameraView::from_camera(camera))
    }

    /// Propagates a screen resize to every pass, stopping at the first error.
    pub fn resize(&mut self, renderer: &mut R, screen: ScreenSize) -> Result<()> {
        for (_, pass) in &mut self.passes {
            pass.resize(renderer, screen)?;
        }
        Ok(())
    }
}
