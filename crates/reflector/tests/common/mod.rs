//! Spy renderer shared by the integration tests.

#![allow(dead_code)]

use std::collections::HashMap;

use reflector::{
    CameraView, NodeId, ReflectorError, RenderTargetId, Renderer, Result, SceneGraph, Viewport,
};

/// One recorded `render` call.
#[derive(Debug, Clone)]
pub struct Draw {
    pub target: Option<RenderTargetId>,
    pub visible: Vec<NodeId>,
    pub camera: CameraView,
    pub xr_enabled: bool,
    pub shadow_auto_update: bool,
}

/// Records every call instead of drawing.
#[derive(Debug)]
pub struct SpyRenderer {
    pub draws: Vec<Draw>,
    pub clears: usize,
    pub sizes: HashMap<RenderTargetId, (u32, u32)>,
    pub target: Option<RenderTargetId>,
    pub xr_enabled: bool,
    pub shadow_auto_update: bool,
    pub auto_clear: bool,
    pub fail_offscreen: bool,
    pub fail_allocation: bool,
    pub viewport: Option<Viewport>,
    pub next: u32,
}

impl Default for SpyRenderer {
    fn default() -> Self {
        Self {
            draws: Vec::new(),
            clears: 0,
            sizes: HashMap::new(),
            target: None,
            xr_enabled: true,
            shadow_auto_update: true,
            auto_clear: true,
            fail_offscreen: false,
            fail_allocation: false,
            viewport: None,
            next: 0,
        }
    }
}

impl SpyRenderer {
    /// Draws into offscreen targets.
    pub fn offscreen_draws(&self) -> Vec<&Draw> {
        self.draws.iter().filter(|d| d.target.is_some()).collect()
    }
}

impl Renderer for SpyRenderer {
    fn render(&mut self, scene: &dyn SceneGraph, camera: &CameraView) -> Result<()> {
        if self.fail_offscreen && self.target.is_some() {
            return Err(ReflectorError::RenderFailed("spy failure".into()));
        }
        let mut visible = Vec::new();
        scene.for_each_node(&mut |node| {
            if scene.is_visible(node) == Some(true) {
                visible.push(node);
            }
        });
        self.draws.push(Draw {
            target: self.target,
            visible,
            camera: *camera,
            xr_enabled: self.xr_enabled,
            shadow_auto_update: self.shadow_auto_update,
        });
        Ok(())
    }

    fn clear(&mut self) -> Result<()> {
        self.clears += 1;
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
        if self.fail_allocation {
            return Err(ReflectorError::TargetAllocation {
                width,
                height,
                reason: "spy allocation failure".into(),
            });
        }
        self.next += 1;
        let id = RenderTargetId(self.next);
        self.sizes.insert(id, (width, height));
        Ok(id)
    }

    fn resize_render_target(&mut self, target: RenderTargetId, width: u32, height: u32) -> Result<()> {
        match self.sizes.get_mut(&target) {
            Some(size) => {
                *size = (width, height);
                Ok(())
            }
            None => Err(ReflectorError::TargetNotFound(target)),
        }
    }

    fn dispose_render_target(&mut self, target: RenderTargetId) {
        self.sizes.remove(&target);
    }
}
