//! Error types for reflector-rs.

use thiserror::Error;

use crate::buffer::RenderTargetId;
use crate::scene::NodeId;

/// The main error type for reflector-rs operations.
#[derive(Error, Debug)]
pub enum ReflectorError {
    /// The renderer could not allocate an offscreen target.
    #[error("failed to allocate {width}x{height} reflection target: {reason}")]
    TargetAllocation {
        width: u32,
        height: u32,
        reason: String,
    },

    /// A render target id is unknown to the renderer.
    #[error("render target {0:?} not found")]
    TargetNotFound(RenderTargetId),

    /// A render call failed.
    #[error("render failed: {0}")]
    RenderFailed(String),

    /// The rendering context was lost.
    #[error("rendering context lost")]
    ContextLost,

    /// A scene node was not found.
    #[error("scene node {0:?} not found")]
    NodeNotFound(NodeId),

    /// A scene node with the given name was not found.
    #[error("scene node '{0}' not found")]
    NodeNameNotFound(String),

    /// Configuration values are out of range.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// JSON parse error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// A specialized Result type for reflector-rs operations.
pub type Result<T> = std::result::Result<T, ReflectorError>;
