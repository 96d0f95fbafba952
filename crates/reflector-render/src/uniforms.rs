//! GPU uniform layouts.

use glam::{Mat4, Vec4};
use reflector_core::{BlendMode, ReflectorParams};

/// GPU representation of the reflective surface material.
#[repr(C)]
#[derive(Debug, Clone, Copy, bytemuck::Pod, bytemuck::Zeroable)]
#[allow(clippy::pub_underscore_fields)]
pub struct ReflectorUniforms {
    pub view_projection: [[f32; 4]; 4],
    pub model: [[f32; 4]; 4],
    pub texture_matrix: [[f32; 4]; 4],
    pub color: [f32; 4],
    pub opacity: f32,
    pub blend_mode: u32,
    pub _padding: [f32; 2],
}

impl Default for ReflectorUniforms {
    fn default() -> Self {
        Self {
            view_projection: Mat4::IDENTITY.to_cols_array_2d(),
            model: Mat4::IDENTITY.to_cols_array_2d(),
            texture_matrix: Mat4::IDENTITY.to_cols_array_2d(),
            color: [119.0 / 255.0, 119.0 / 255.0, 119.0 / 255.0, 1.0],
            opacity: 0.3,
            blend_mode: BlendMode::Overlay.to_index(),
            _padding: [0.0; 2],
        }
    }
}

impl ReflectorUniforms {
    /// Packs material parameters for a surface drawn with `view_projection`.
    pub fn new(params: &ReflectorParams, view_projection: Mat4) -> Self {
        Self {
            view_projection: view_projection.to_cols_array_2d(),
            model: params.model.to_cols_array_2d(),
            texture_matrix: params.texture_matrix.to_cols_array_2d(),
            color: params.color.extend(1.0).to_array(),
            opacity: params.opacity,
            blend_mode: params.blend_mode.to_index(),
            _padding: [0.0; 2],
        }
    }
}

/// GPU representation of a flat-colored mesh draw.
#[repr(C)]
#[derive(Debug, Clone, Copy, bytemuck::Pod, bytemuck::Zeroable)]
pub struct MeshUniforms {
    pub model_view_projection: [[f32; 4]; 4],
    pub color: [f32; 4],
}

impl MeshUniforms {
    pub fn new(model_view_projection: Mat4, color: Vec4) -> Self {
        Self {
            model_view_projection: model_view_projection.to_cols_array_2d(),
            color: color.to_array(),
        }
    }
}
