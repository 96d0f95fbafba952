//! The renderer interface and scoped renderer state.

use std::ops::{Deref, DerefMut};

use glam::{Mat4, Vec3};

use crate::buffer::RenderTargetId;
use crate::camera::{Camera, Viewport};
use crate::error::Result;
use crate::scene::SceneGraph;

/// The matrices a renderer draws a scene with.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraView {
    /// World-to-view matrix.
    pub view: Mat4,
    /// View-to-clip matrix.
    pub projection: Mat4,
    /// Eye position in world space.
    pub position: Vec3,
    /// Far plane distance.
    pub far: f32,
}

impl CameraView {
    /// Captures the current matrices of a camera.
    pub fn from_camera(camera: &Camera) -> Self {
        Self {
            view: camera.view_matrix(),
            projection: camera.projection_matrix(),
            position: camera.position,
            far: camera.far,
        }
    }

    /// Returns `projection * view`.
    pub fn view_projection(&self) -> Mat4 {
        self.projection * self.view
    }
}

/// A renderer that can draw a scene into the screen or an offscreen target.
///
/// `None` as a render target means the default (screen) output.
pub trait Renderer {
    /// Draws `scene` as seen through `camera` into the active target.
    fn render(&mut self, scene: &dyn SceneGraph, camera: &CameraView) -> Result<()>;

    /// Clears the active target.
    fn clear(&mut self) -> Result<()>;

    /// Returns whether `render` clears the target by itself.
    fn auto_clear(&self) -> bool {
        true
    }

    /// Returns the active render target.
    fn render_target(&self) -> Option<RenderTargetId>;

    /// Sets the active render target.
    fn set_render_target(&mut self, target: Option<RenderTargetId>);

    /// Returns whether stereo/XR rendering is enabled.
    fn xr_enabled(&self) -> bool;

    /// Enables or disables stereo/XR rendering.
    fn set_xr_enabled(&mut self, enabled: bool);

    /// Returns whether shadow maps are refreshed on every render.
    fn shadow_auto_update(&self) -> bool;

    /// Sets whether shadow maps are refreshed on every render.
    fn set_shadow_auto_update(&mut self, enabled: bool);

    /// Sets the viewport used for subsequent renders.
    fn set_viewport(&mut self, viewport: Viewport);

    /// Allocates an offscreen color target.
    fn create_render_target(&mut self, width: u32, height: u32) -> Result<RenderTargetId>;

    /// Reallocates an offscreen target at a new size.
    fn resize_render_target(&mut self, target: RenderTargetId, width: u32, height: u32)
        -> Result<()>;

    /// Releases an offscreen target.
    fn dispose_render_target(&mut self, target: RenderTargetId);
}

/// Redirects a renderer into an offscreen target for as long as it is alive.
///
/// XR rendering and shadow auto-update are forced off. The previous target
/// and flags are restored on drop, including during unwinding.
pub struct RendererStateGuard<'a, R: Renderer + ?Sized> {
    renderer: &'a mut R,
    target: Option<RenderTargetId>,
    xr_enabled: bool,
    shadow_auto_update: bool,
}

impl<'a, R: Renderer + ?Sized> RendererStateGuard<'a, R> {
    /// Saves the renderer state and switches to `target`.
    pub fn offscreen(renderer: &'a mut R, target: RenderTargetId) -> Self {
        let saved_target = renderer.render_target();
        let xr_enabled = renderer.xr_enabled();
        let shadow_auto_update = renderer.shadow_auto_update();

        renderer.set_xr_enabled(false);
        renderer.set_shadow_auto_update(false);
        renderer.set_render_target(Some(target));

        Self {
            renderer,
            target: saved_target,
            xr_enabled,
            shadow_auto_update,
        }
    }
}

impl<R: Renderer + ?Sized> Deref for RendererStateGuard<'_, R> {
    type Target = R;

    fn deref(&self) -> &R {
        self.renderer
    }
}

impl<R: Renderer + ?Sized> DerefMut for RendererStateGuard<'_, R> {
    fn deref_mut(&mut self) -> &mut R {
        self.renderer
    }
}

impl<R: Renderer + ?Sized> Drop for RendererStateGuard<'_, R> {
    fn drop(&mut self) {
        self.renderer.set_xr_enabled(self.xr_enabled);
        self.renderer.set_shadow_auto_update(self.shadow_auto_update);
        self.renderer.set_render_target(self.target);
    }
}
