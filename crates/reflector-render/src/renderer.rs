//! [`Renderer`] implementation on wgpu.

use std::collections::HashMap;

use reflector_core::{
    CameraView, ReflectorError, RenderTargetId, Renderer, Result, SceneGraph, Viewport,
};

use crate::context::GpuContext;
use crate::error::capture_errors;
use crate::target::ReflectionTarget;

/// Records the draw calls for a scene into an open render pass.
pub trait SceneDrawer {
    /// Draws the visible nodes of `scene` as seen through `camera`.
    fn draw(
        &mut self,
        queue: &wgpu::Queue,
        render_pass: &mut wgpu::RenderPass<'_>,
        scene: &dyn SceneGraph,
        camera: &CameraView,
    );

    /// Called after an offscreen target was reallocated, so bindings of the
    /// old texture can be replaced.
    fn target_reallocated(
        &mut self,
        _device: &wgpu::Device,
        _id: RenderTargetId,
        _target: &ReflectionTarget,
    ) {
    }
}

/// A wgpu renderer drawing into an offscreen "screen" target or into
/// reflection targets.
pub struct GpuRenderer<D: SceneDrawer> {
    device: wgpu::Device,
    queue: wgpu::Queue,
    screen: ReflectionTarget,
    targets: HashMap<RenderTargetId, ReflectionTarget>,
    next_target: u32,
    active: Option<RenderTargetId>,
    xr_enabled: bool,
    shadow_auto_update: bool,
    auto_clear: bool,
    clear_color: wgpu::Color,
    viewport: Option<Viewport>,
    drawer: D,
}

impl<D: SceneDrawer> GpuRenderer<D> {
    /// Creates a renderer with a `width` x `height` screen target.
    pub fn new(context: GpuContext, width: u32, height: u32, drawer: D) -> Result<Self> {
        let screen = ReflectionTarget::new(&context.device, width, height)?;
        Ok(Self {
            device: context.device,
            queue: context.queue,
            screen,
            targets: HashMap::new(),
            next_target: 1,
            active: None,
            xr_enabled: false,
            shadow_auto_update: true,
            auto_clear: true,
            clear_color: wgpu::Color {
                r: 0.05,
                g: 0.05,
                b: 0.08,
                a: 1.0,
            },
            viewport: None,
            drawer,
        })
    }

    pub fn device(&self) -> &wgpu::Device {
        &self.device
    }

    pub fn queue(&self) -> &wgpu::Queue {
        &self.queue
    }

    pub fn drawer(&self) -> &D {
        &self.drawer
    }

    pub fn drawer_mut(&mut self) -> &mut D {
        &mut self.drawer
    }

    /// Returns the screen target.
    pub fn screen(&self) -> &ReflectionTarget {
        &self.screen
    }

    /// Returns an offscreen target.
    pub fn target(&self, id: RenderTargetId) -> Option<&ReflectionTarget> {
        self.targets.get(&id)
    }

    /// Number of live offscreen targets.
    pub fn target_count(&self) -> usize {
        self.targets.len()
    }

    /// Sets whether `render` clears the target first.
    pub fn set_auto_clear(&mut self, auto_clear: bool) {
        self.auto_clear = auto_clear;
    }

    pub fn set_clear_color(&mut self, color: wgpu::Color) {
        self.clear_color = color;
    }

    /// Reads the screen target back as RGBA8 pixels.
    pub fn read_screen(&self) -> Result<Vec<u8>> {
        Ok(self.screen.read_pixels(&self.device, &self.queue)?)
    }

    /// Reallocates the screen target.
    pub fn resize_screen(&mut self, width: u32, height: u32) -> Result<()> {
        if self.screen.size() == (width, height) {
            return Ok(());
        }
        let screen = ReflectionTarget::new(&self.device, width, height)?;
        self.screen.destroy();
        self.screen = screen;
        self.viewport = None;
        Ok(())
    }

    /// Returns `(device, drawer, target)` for binding a target into the drawer.
    pub(crate) fn split_for_binding(
        &mut self,
        id: RenderTargetId,
    ) -> Result<(&wgpu::Device, &mut D, &ReflectionTarget)> {
        let target = self
            .targets
            .get(&id)
            .ok_or(ReflectorError::TargetNotFound(id))?;
        Ok((&self.device, &mut self.drawer, target))
    }

    fn encode(
        &mut self,
        label: &str,
        clear: bool,
        draw: Option<(&dyn SceneGraph, &CameraView)>,
    ) -> Result<()> {
        let Self {
            device,
            queue,
            screen,
            targets,
            active,
            clear_color,
            viewport,
            drawer,
            ..
        } = self;

        let target = match *active {
            Some(id) => targets.get(&id).ok_or(ReflectorError::TargetNotFound(id))?,
            None => &*screen,
        };

        let (color_load, depth_load) = if clear {
            (wgpu::LoadOp::Clear(*clear_color), wgpu::LoadOp::Clear(1.0))
        } else {
            (wgpu::LoadOp::Load, wgpu::LoadOp::Load)
        };

        // Device errors from the pass come back as an Err rather than a panic.
        let device: &wgpu::Device = device;
        capture_errors(device, || {
            let mut encoder = device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some(label),
            });
            {
                let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                    label: Some(label),
                    color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                        view: target.color_view(),
                        resolve_target: None,
                        ops: wgpu::Operations {
                            load: color_load,
                            store: wgpu::StoreOp::Store,
                        },
                        depth_slice: None,
                    })],
                    depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                        view: target.depth_view(),
                        depth_ops: Some(wgpu::Operations {
                            load: depth_load,
                            store: wgpu::StoreOp::Store,
                        }),
                        stencil_ops: None,
                    }),
                    ..Default::default()
                });

                // Offscreen targets always cover their whole texture.
                if active.is_none() {
                    if let Some(viewport) = viewport.filter(|v| fits(*v, target.size())) {
                        render_pass.set_viewport(
                            viewport.x as f32,
                            viewport.y as f32,
                            viewport.width as f32,
                            viewport.height as f32,
                            0.0,
                            1.0,
                        );
                    }
                }

                if let Some((scene, camera)) = draw {
                    drawer.draw(queue, &mut render_pass, scene, camera);
                }
            }
            queue.submit(std::iter::once(encoder.finish()));
        })?;
        Ok(())
    }
}

/// Whether `viewport` is non-empty and lies inside a target of `size`.
fn fits(viewport: Viewport, size: (u32, u32)) -> bool {
    viewport.width > 0
        && viewport.height > 0
        && viewport.x.saturating_add(viewport.width) <= size.0
        && viewport.y.saturating_add(viewport.height) <= size.1
}

impl<D: SceneDrawer> Renderer for GpuRenderer<D> {
    fn render(&mut self, scene: &dyn SceneGraph, camera: &CameraView) -> Result<()> {
        let clear = self.auto_clear;
        self.encode("reflector render", clear, Some((scene, camera)))
    }

    fn clear(&mut self) -> Result<()> {
        self.encode("reflector clear", true, None)
    }

    fn auto_clear(&self) -> bool {
        self.auto_clear
    }

    fn render_target(&self) -> Option<RenderTargetId> {
        self.active
    }

    fn set_render_target(&mut self, target: Option<RenderTargetId>) {
        self.active = target;
    }

    fn xr_enabled(&self) -> bool {
        self.xr_enabled
    }

    fn set_xr_enabled(&mut self, enabled: bool) {
        self.xr_enabled = enabled;
    }

    fn shadow_auto_update(&self) -> bool {
        self.shadow_auto_update
    }

    fn set_shadow_auto_update(&mut self, enabled: bool) {
        self.shadow_auto_update = enabled;
    }

    fn set_viewport(&mut self, viewport: Viewport) {
        self.viewport = Some(viewport);
    }

    fn create_render_target(&mut self, width: u32, height: u32) -> Result<RenderTargetId> {
        let target = ReflectionTarget::new(&self.device, width, height)?;
        let id = RenderTargetId(self.next_target);
        self.next_target += 1;
        self.targets.insert(id, target);
        log::debug!("created render target {id:?} ({width}x{height})");
        Ok(id)
    }

    fn resize_render_target(&mut self, id: RenderTargetId, width: u32, height: u32) -> Result<()> {
        if !self.targets.contains_key(&id) {
            return Err(ReflectorError::TargetNotFound(id));
        }
        let target = ReflectionTarget::new(&self.device, width, height)?;
        self.drawer.target_reallocated(&self.device, id, &target);
        if let Some(old) = self.targets.insert(id, target) {
            old.destroy();
        }
        Ok(())
    }

    fn dispose_render_target(&mut self, id: RenderTargetId) {
        if let Some(target) = self.targets.remove(&id) {
            target.destroy();
            log::debug!("disposed render target {id:?}");
        }
        if self.active == Some(id) {
            self.active = None;
        }
    }
}
