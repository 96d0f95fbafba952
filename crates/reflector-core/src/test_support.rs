//! Renderer double used by unit tests.

use std::collections::BTreeMap;

use crate::buffer::RenderTargetId;
use crate::camera::Viewport;
use crate::error::{ReflectorError, Result};
use crate::renderer::{CameraView, Renderer};
use crate::scene::{NodeId, SceneGraph};

#[derive(Debug, Clone)]
pub struct RenderCall {
    pub target: Option<RenderTargetId>,
    pub visible: Vec<NodeId>,
    pub xr_enabled: bool,
    pub shadow_auto_update: bool,
    pub camera: CameraView,
}

#[derive(Debug)]
pub struct RecordingRenderer {
    pub renders: Vec<RenderCall>,
    pub clears: Vec<Option<RenderTargetId>>,
    pub created: Vec<RenderTargetId>,
    pub targets: BTreeMap<RenderTargetId, (u32, u32)>,
    pub target: Option<RenderTargetId>,
    pub xr_enabled: bool,
    pub shadow_auto_update: bool,
    pub auto_clear: bool,
    pub fail_renders: bool,
    pub fail_offscreen: bool,
    pub max_target_size: u32,
    pub viewport: Option<Viewport>,
    pub(crate) next_id: u32,
}

impl Default for RecordingRenderer {
    fn default() -> Self {
        Self {
            renders: Vec::new(),
            clears: Vec::new(),
            created: Vec::new(),
            targets: BTreeMap::new(),
            target: None,
            xr_enabled: false,
            shadow_auto_update: true,
            auto_clear: true,
            fail_renders: false,
            fail_offscreen: false,
            max_target_size: 8192,
            viewport: None,
            next_id: 1,
        }
    }
}

impl RecordingRenderer {
    pub fn size_of(&self, target: RenderTargetId) -> Option<(u32, u32)> {
        self.targets.get(&target).copied()
    }
}

impl Renderer for RecordingRenderer {
    fn render(&mut self, scene: &dyn SceneGraph, camera: &CameraView) -> Result<()> {
        if self.fail_renders || (self.fail_offscreen && self.target.is_some()) {
            return Err(ReflectorError::ContextLost);
        }
        let mut visible = Vec::new();
        scene.for_each_node(&mut |node| {
            if scene.is_visible(node) == Some(true) {
                visible.push(node);
            }
        });
        self.renders.push(RenderCall {
            target: self.target,
            visible,
            xr_enabled: self.xr_enabled,
            shadow_auto_update: self.shadow_auto_update,
            camera: *camera,
        });
        Ok(())
    }

    fn clear(&mut self) -> Result<()> {
        self.clears.push(self.target);
        Ok(())
    }

    fn auto_clear(&self) -> bool {
        self.auto_clear
    }

    fn render_target(&self) -> Option<RenderTargetId> {
        self.target
    }

    fn set_render_target(&mut self, target: Option<RenderTargetId>) {
        self.target = target;
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
        if width > self.max_target_size || height > self.max_target_size {
            return Err(ReflectorError::TargetAllocation {
                width,
                height,
                reason: format!("exceeds {}", self.max_target_size),
            });
        }
        let id = RenderTargetId(self.next_id);
        self.next_id += 1;
        self.targets.insert(id, (width, height));
        self.created.push(id);
        Ok(id)
    }

    fn resize_render_target(&mut self, target: RenderTargetId, width: u32, height: u32) -> Result<()> {
        let size = self
            .targets
            .get_mut(&target)
            .ok_or(ReflectorError::TargetNotFound(target))?;
        *size = (width, height);
        Ok(())
    }

    fn dispose_render_target(&mut self, target: RenderTargetId) {
        self.targets.remove(&target);
    }
}
