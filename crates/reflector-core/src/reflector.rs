//! Planar reflector: a reflective surface that re-renders the scene from its
//! mirrored viewpoint once per frame.

use glam::{Mat4, Vec3};

use crate::buffer::ReflectionBuffer;
use crate::camera::Camera;
use crate::config::{BlendMode, ReflectorConfig, ScreenSize};
use crate::error::{ReflectorError, Result};
use crate::geometry::SurfaceGeometry;
use crate::mirror::MirroredCamera;
use crate::renderer::{CameraView, Renderer, RendererStateGuard};
use crate::scene::{HiddenNodes, NodeId, SceneGraph};
use crate::surface::SurfaceFrame;

/// Result of one reflector update.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReflectionOutcome {
    /// The reflection was rendered this frame.
    Rendered,
    /// The camera was on or behind the surface plane; nothing was rendered.
    SkippedBehindPlane,
    /// The surface has no area; nothing was rendered.
    Degenerate,
    /// Rendering failed; the buffer keeps its previous contents.
    Failed,
}

/// Values the surface material needs to draw the reflection.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReflectorParams {
    /// Surface-local position to projective texture coordinate.
    pub texture_matrix: Mat4,
    /// Surface local-to-world matrix.
    pub model: Mat4,
    /// Tint color.
    pub color: Vec3,
    /// Output alpha.
    pub opacity: f32,
    /// Blend function.
    pub blend_mode: BlendMode,
}

/// Per-instance working state, rewritten on every update.
#[derive(Debug, Clone, Copy)]
struct Scratch {
    surface: SurfaceFrame,
    view_dot_normal: f32,
}

impl Default for Scratch {
    fn default() -> Self {
        Self {
            surface: SurfaceFrame::from_world_matrix(Mat4::IDENTITY),
            view_dot_normal: 0.0,
        }
    }
}

/// A planar reflective surface.
///
/// Owns its reflection buffer (allocated through the renderer) and, on each
/// [`update`](Self::update), renders the scene from the mirrored camera into
/// it. Call before the primary render, once per frame.
#[derive(Debug)]
pub struct PlanarReflector {
    node: NodeId,
    geometry: SurfaceGeometry,
    config: ReflectorConfig,
    buffer: ReflectionBuffer,
    hidden_during_pass: Vec<NodeId>,
    texture_matrix: Mat4,
    mirrored: Option<MirroredCamera>,
    last_outcome: Option<ReflectionOutcome>,
    scratch: Scratch,
}

impl PlanarReflector {
    /// Creates a reflector for the surface drawn by `node`.
    ///
    /// Allocates the reflection buffer sized for `screen` (or the fixed size
    /// in `config`). Allocation failure is returned and no reflector exists.
    pub fn new<R: Renderer + ?Sized>(
        renderer: &mut R,
        node: NodeId,
        geometry: SurfaceGeometry,
        config: ReflectorConfig,
        screen: ScreenSize,
    ) -> Result<Self> {
        config.validate()?;
        let (width, height) = config.buffer_size(screen);
        let target = renderer.create_render_target(width, height)?;

        if geometry.is_degenerate() {
            log::debug!("reflector on {node:?} has a zero-area surface; it will stay empty");
        }
        log::debug!("reflector on {node:?} allocated {width}x{height} target {target:?}");

        Ok(Self {
            node,
            geometry,
            config,
            buffer: ReflectionBuffer::new(target, width, height),
            hidden_during_pass: Vec::new(),
            texture_matrix: Mat4::IDENTITY,
            mirrored: None,
            last_outcome: None,
            scratch: Scratch::default(),
        })
    }

    /// Returns the surface node.
    pub fn node(&self) -> NodeId {
        self.node
    }

    /// Returns the surface shape.
    pub fn geometry(&self) -> &SurfaceGeometry {
        &self.geometry
    }

    /// Returns the configuration.
    pub fn config(&self) -> &ReflectorConfig {
        &self.config
    }

    /// Returns the reflection buffer.
    pub fn buffer(&self) -> &ReflectionBuffer {
        &self.buffer
    }

    /// Returns the texture projection matrix from the last mirrored update.
    pub fn texture_matrix(&self) -> Mat4 {
        self.texture_matrix
    }

    /// Returns the mirrored camera from the last mirrored update.
    pub fn mirrored_camera(&self) -> Option<&MirroredCamera> {
        self.mirrored.as_ref()
    }

    /// Returns what the last update did.
    pub fn last_outcome(&self) -> Option<ReflectionOutcome> {
        self.last_outcome
    }

    /// Returns `(surface - camera) · normal` from the last update.
    pub fn last_view_dot_normal(&self) -> f32 {
        self.scratch.view_dot_normal
    }

    /// Sets the tint color.
    pub fn set_color(&mut self, color: Vec3) {
        self.config.color = color;
    }

    /// Sets the opacity.
    pub fn set_opacity(&mut self, opacity: f32) {
        self.config.opacity = opacity.clamp(0.0, 1.0);
    }

    /// Sets the blend mode.
    pub fn set_blend_mode(&mut self, blend_mode: BlendMode) {
        self.config.blend_mode = blend_mode;
    }

    /// Hides `node` during the reflection pass, e.g. the mesh this surface covers.
    pub fn hide_during_pass(&mut self, node: NodeId) {
        if node != self.node && !self.hidden_during_pass.contains(&node) {
            self.hidden_during_pass.push(node);
        }
    }

    /// Hides the node named `name` during the reflection pass.
    pub fn hide_named_during_pass<S: SceneGraph + ?Sized>(
        &mut self,
        scene: &S,
        name: &str,
    ) -> Result<NodeId> {
        let node = scene
            .find_by_name(name)
            .ok_or_else(|| ReflectorError::NodeNameNotFound(name.to_string()))?;
        self.hide_during_pass(node);
        Ok(node)
    }

    /// Nodes hidden during the reflection pass besides the surface itself.
    pub fn hidden_during_pass(&self) -> &[NodeId] {
        &self.hidden_during_pass
    }

    /// Material inputs for the main pass.
    pub fn params(&self) -> ReflectorParams {
        ReflectorParams {
            texture_matrix: self.texture_matrix,
            model: self.scratch.surface.world,
            color: self.config.color,
            opacity: self.config.opacity,
            blend_mode: self.config.blend_mode,
        }
    }

    /// Computes the mirrored camera and texture matrix for a surface at
    /// `surface_world`.
    ///
    /// Returns `None` (leaving the previous matrices in place) when the
    /// camera is not in front of the surface.
    pub fn prepare(&mut self, surface_world: Mat4, camera: &Camera) -> Option<&MirroredCamera> {
        let surface = SurfaceFrame::from_world_matrix(surface_world);
        self.scratch.surface = surface;
        self.scratch.view_dot_normal = (surface.position - camera.position).dot(surface.normal);

        let mirrored = MirroredCamera::new(camera, &surface, self.config.clip_bias)?;
        self.texture_matrix = mirrored.texture_matrix(surface_world);
        self.mirrored = Some(mirrored);
        self.mirrored.as_ref()
    }

    /// Renders this frame's reflection. Never fails: errors are logged and
    /// reported as [`ReflectionOutcome::Failed`].
    pub fn update<S: SceneGraph, R: Renderer + ?Sized>(
        &mut self,
        renderer: &mut R,
        scene: &mut S,
        camera: &Camera,
        frame: u64,
    ) -> ReflectionOutcome {
        let outcome = self.update_inner(renderer, scene, camera, frame);
        self.last_outcome = Some(outcome);
        outcome
    }

    fn update_inner<S: SceneGraph, R: Renderer + ?Sized>(
        &mut self,
        renderer: &mut R,
        scene: &mut S,
        camera: &Camera,
        frame: u64,
    ) -> ReflectionOutcome {
        if self.geometry.is_degenerate() {
            return ReflectionOutcome::Degenerate;
        }
        let Some(world) = scene.world_matrix(self.node) else {
            log::warn!("reflector surface {:?} is not in the scene", self.node);
            return ReflectionOutcome::Failed;
        };
        let Some(view) = self.prepare(world, camera).map(MirroredCamera::camera_view) else {
            return ReflectionOutcome::SkippedBehindPlane;
        };

        let result = self.render_pass(renderer, scene, &view);

        if let Some(viewport) = camera.viewport {
            renderer.set_viewport(viewport);
        }

        match result {
            Ok(()) => {
                self.buffer.mark_rendered(frame);
                ReflectionOutcome::Rendered
            }
            Err(e) => {
                log::warn!(
                    "reflection pass for {:?} failed, keeping previous contents: {e}",
                    self.node
                );
                ReflectionOutcome::Failed
            }
        }
    }

    fn render_pass<S: SceneGraph, R: Renderer + ?Sized>(
        &self,
        renderer: &mut R,
        scene: &mut S,
        view: &CameraView,
    ) -> Result<()> {
        let hidden = HiddenNodes::new(
            scene,
            std::iter::once(self.node).chain(self.hidden_during_pass.iter().copied()),
        );
        let mut renderer = RendererStateGuard::offscreen(renderer, self.buffer.target());

        if !renderer.auto_clear() {
            renderer.clear()?;
        }
        renderer.render(&*hidden, view)
    }

    /// Resizes the buffer for a new screen size. Fixed-size buffers keep
    /// their size.
    pub fn resize<R: Renderer + ?Sized>(&mut self, renderer: &mut R, screen: ScreenSize) -> Result<()> {
        let (width, height) = self.config.buffer_size(screen);
        self.resize_buffer(renderer, width, height)
    }

    /// Resizes the buffer to an explicit size.
    pub fn resize_buffer<R: Renderer + ?Sized>(
        &mut self,
        renderer: &mut R,
        width: u32,
        height: u32,
    ) -> Result<()> {
        if self.buffer.size() == (width, height) {
            return Ok(());
        }
        renderer.resize_render_target(self.buffer.target(), width, height)?;
        self.buffer.set_size(width, height);
        log::debug!("reflector on {:?} resized to {width}x{height}", self.node);
        Ok(())
    }

    /// Releases the reflection buffer.
    pub fn dispose<R: Renderer + ?Sized>(self, renderer: &mut R) {
        renderer.dispose_render_target(self.buffer.target());
        log::debug!("reflector on {:?} disposed", self.node);
    }
}
