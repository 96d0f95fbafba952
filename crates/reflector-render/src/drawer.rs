//! A scene drawer for flat-colored meshes and reflective surfaces.

use std::collections::HashMap;

use glam::{Vec3, Vec4};
use reflector_core::{
    CameraView, NodeId, ReflectorParams, RenderTargetId, Result, SceneGraph, SurfaceGeometry,
};

use crate::material::{ReflectorMaterial, ReflectorPipeline, UnlitMaterial, UnlitPipeline};
use crate::mesh::SurfaceMesh;
use crate::renderer::{GpuRenderer, SceneDrawer};
use crate::target::ReflectionTarget;
use crate::uniforms::MeshUniforms;

struct UnlitItem {
    mesh: SurfaceMesh,
    material: UnlitMaterial,
    color: Vec4,
}

struct ReflectorItem {
    mesh: SurfaceMesh,
    material: ReflectorMaterial,
    target: RenderTargetId,
    params: Option<ReflectorParams>,
}

/// Draws meshes attached to scene nodes.
///
/// Opaque meshes are drawn first, reflective surfaces after them so their
/// alpha blends over what is behind.
pub struct MeshDrawer {
    unlit_pipeline: UnlitPipeline,
    reflector_pipeline: ReflectorPipeline,
    unlit: HashMap<NodeId, UnlitItem>,
    reflectors: HashMap<NodeId, ReflectorItem>,
}

impl MeshDrawer {
    pub fn new(device: &wgpu::Device) -> Self {
        Self {
            unlit_pipeline: UnlitPipeline::new(device),
            reflector_pipeline: ReflectorPipeline::new(device),
            unlit: HashMap::new(),
            reflectors: HashMap::new(),
        }
    }

    /// Attaches a flat-colored mesh to `node`.
    pub fn add_mesh(&mut self, device: &wgpu::Device, node: NodeId, mesh: SurfaceMesh, color: Vec3) {
        let material = UnlitMaterial::new(device, &self.unlit_pipeline);
        self.unlit.insert(
            node,
            UnlitItem {
                mesh,
                material,
                color: color.extend(1.0),
            },
        );
    }

    /// Sets the material inputs of a reflective surface for the next draw.
    pub fn set_reflector_params(&mut self, node: NodeId, params: ReflectorParams) -> bool {
        match self.reflectors.get_mut(&node) {
            Some(item) => {
                item.params = Some(params);
                true
            }
            None => false,
        }
    }

    /// Detaches whatever is drawn for `node`.
    pub fn remove(&mut self, node: NodeId) {
        self.unlit.remove(&node);
        self.reflectors.remove(&node);
    }

    /// Whether a reflective surface is attached to `node`.
    pub fn has_reflector(&self, node: NodeId) -> bool {
        self.reflectors.contains_key(&node)
    }

    fn add_reflector(
        &mut self,
        device: &wgpu::Device,
        node: NodeId,
        geometry: &SurfaceGeometry,
        id: RenderTargetId,
        target: &ReflectionTarget,
    ) {
        let material = ReflectorMaterial::new(device, &self.reflector_pipeline, target);
        self.reflectors.insert(
            node,
            ReflectorItem {
                mesh: SurfaceMesh::from_geometry(device, geometry),
                material,
                target: id,
                params: None,
            },
        );
    }
}

impl SceneDrawer for MeshDrawer {
    fn draw(
        &mut self,
        queue: &wgpu::Queue,
        render_pass: &mut wgpu::RenderPass<'_>,
        scene: &dyn SceneGraph,
        camera: &CameraView,
    ) {
        let mut visible = Vec::new();
        scene.for_each_node(&mut |node| {
            if scene.is_visible(node) == Some(true) {
                visible.push(node);
            }
        });

        let view_projection = camera.view_projection();

        for node in &visible {
            let (Some(item), Some(world)) = (self.unlit.get(node), scene.world_matrix(*node)) else {
                continue;
            };
            item.material
                .update(queue, &MeshUniforms::new(view_projection * world, item.color));
            item.material.draw(&self.unlit_pipeline, render_pass, &item.mesh);
        }

        for node in &visible {
            let Some(item) = self.reflectors.get(node) else {
                continue;
            };
            // Nothing to sample until the first reflection pass ran.
            let Some(params) = item.params else {
                continue;
            };
            item.material.update(queue, &params, view_projection);
            item.material.draw(&self.reflector_pipeline, render_pass, &item.mesh);
        }
    }

    fn target_reallocated(&mut self, device: &wgpu::Device, id: RenderTargetId, target: &ReflectionTarget) {
        for item in self.reflectors.values_mut().filter(|item| item.target == id) {
            item.material.rebind(device, &self.reflector_pipeline, target);
        }
    }
}

impl GpuRenderer<MeshDrawer> {
    /// Attaches a flat-colored mesh to `node`.
    pub fn add_mesh(&mut self, node: NodeId, mesh: SurfaceMesh, color: Vec3) {
        let device = self.device().clone();
        self.drawer_mut().add_mesh(&device, node, mesh, color);
    }

    /// Draws `node` as a reflective surface sampling the offscreen `target`.
    pub fn add_reflector_surface(
        &mut self,
        node: NodeId,
        geometry: &SurfaceGeometry,
        target: RenderTargetId,
    ) -> Result<()> {
        let (device, drawer, reflection) = self.split_for_binding(target)?;
        drawer.add_reflector(device, node, geometry, target, reflection);
        Ok(())
    }
}
