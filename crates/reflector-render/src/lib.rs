//! wgpu backend for reflector-rs.
//!
//! This crate provides:
//! - Reflection targets (sampled color plus depth)
//! - The reflective surface material and its projective-sampling shader
//! - [`GpuRenderer`], a [`reflector_core::Renderer`] on wgpu

// Pixel rectangles are passed to wgpu as f32
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::module_name_repetitions)]

pub mod context;
pub mod drawer;
pub mod error;
pub mod material;
pub mod mesh;
pub mod renderer;
pub mod target;
pub mod uniforms;

pub use context::GpuContext;
pub use drawer::MeshDrawer;
pub use error::{capture_errors, RenderError, RenderResult};
pub use material::{ReflectorMaterial, ReflectorPipeline, UnlitMaterial, UnlitPipeline};
pub use mesh::{cuboid_vertices, SurfaceMesh};
pub use renderer::{GpuRenderer, SceneDrawer};
pub use target::{check_size, ReflectionTarget, COLOR_FORMAT, DEPTH_FORMAT};
pub use uniforms::{MeshUniforms, ReflectorUniforms};
