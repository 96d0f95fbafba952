//! Core abstractions for reflector-rs.
//!
//! This crate holds everything about planar reflections that does not touch
//! the GPU:
//! - [`MirroredCamera`] and the oblique near-plane projection it renders with
//! - [`PlanarReflector`], the per-frame reflection pass
//! - [`Renderer`] and [`SceneGraph`], the seams a host renderer plugs into
//! - [`FrameDriver`], which runs pre-render passes before the primary render

// Documentation lints - internal functions don't need exhaustive panic/error docs
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::missing_errors_doc)]
// Builder patterns return Self which doesn't need must_use
#![allow(clippy::must_use_candidate)]
// Types like ReflectorConfig live in the reflector module on purpose
#![allow(clippy::module_name_repetitions)]
// Pixel sizes go through f32 for the pixel-ratio scale
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]

pub mod buffer;
pub mod camera;
pub mod config;
pub mod error;
pub mod fragment;
pub mod frame;
pub mod geometry;
pub mod mirror;
pub mod oblique;
pub mod plane;
pub mod reflector;
pub mod renderer;
pub mod scene;
pub mod surface;

#[cfg(test)]
mod test_support;

pub use buffer::{ReflectionBuffer, RenderTargetId};
pub use camera::{Camera, Viewport};
pub use config::{BlendMode, ReflectorConfig, ScreenSize};
pub use error::{ReflectorError, Result};
pub use frame::{FrameDriver, PassId, PreRenderPass};
pub use geometry::SurfaceGeometry;
pub use mirror::MirroredCamera;
pub use oblique::{oblique_projection, texture_bias_matrix, texture_projection_matrix, view_space_plane};
pub use plane::{reflection_matrix, Plane};
pub use reflector::{PlanarReflector, ReflectionOutcome, ReflectorParams};
pub use renderer::{CameraView, Renderer, RendererStateGuard};
pub use scene::{HiddenNodes, NodeId, SceneGraph, SceneNode, SimpleScene};
pub use surface::{floor_matrix, placed_over, SurfaceFrame, LOCAL_NORMAL};

// Re-export glam types for convenience
pub use glam::{Mat4, Vec2, Vec3, Vec4};
