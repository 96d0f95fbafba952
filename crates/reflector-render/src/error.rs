//! Rendering error types.

use pollster::FutureExt as _;
use reflector_core::ReflectorError;
use thiserror::Error;

/// Errors that can occur during rendering operations.
#[derive(Error, Debug)]
pub enum RenderError {
    /// Failed to create wgpu adapter.
    #[error("failed to create graphics adapter")]
    AdapterCreationFailed,

    /// Failed to create wgpu device.
    #[error("failed to create graphics device: {0}")]
    DeviceCreationFailed(#[from] wgpu::RequestDeviceError),

    /// A GPU command was rejected by validation.
    #[error("GPU validation failed: {0}")]
    Validation(String),

    /// The device reported an internal error.
    #[error("GPU internal error: {0}")]
    Internal(String),

    /// Out of memory.
    #[error("out of memory")]
    OutOfMemory,

    /// Reading a texture back to the CPU failed.
    #[error("readback failed: {0}")]
    ReadbackFailed(String),

    /// Timeout waiting for GPU.
    #[error("timeout waiting for GPU")]
    Timeout,
}

/// A specialized Result type for rendering operations.
pub type RenderResult<T> = std::result::Result<T, RenderError>;

impl From<wgpu::Error> for RenderError {
    fn from(error: wgpu::Error) -> Self {
        match error {
            wgpu::Error::OutOfMemory { .. } => Self::OutOfMemory,
            wgpu::Error::Validation { description, .. } => Self::Validation(description),
            wgpu::Error::Internal { description, .. } => Self::Internal(description),
        }
    }
}

impl From<RenderError> for ReflectorError {
    fn from(error: RenderError) -> Self {
        match error {
            RenderError::AdapterCreationFailed
            | RenderError::DeviceCreationFailed(_)
            | RenderError::Internal(_)
            | RenderError::Timeout => ReflectorError::ContextLost,
            other => ReflectorError::RenderFailed(other.to_string()),
        }
    }
}

/// Runs `f` inside validation, out-of-memory and internal error scopes.
///
/// Errors raised by the device while `f` runs are returned instead of
/// reaching the uncaptured-error handler, which panics by default.
pub fn capture_errors<T>(device: &wgpu::Device, f: impl FnOnce() -> T) -> RenderResult<T> {
    device.push_error_scope(wgpu::ErrorFilter::Internal);
    device.push_error_scope(wgpu::ErrorFilter::OutOfMemory);
    device.push_error_scope(wgpu::ErrorFilter::Validation);

    let value = f();

    // Scopes pop innermost first.
    let validation = device.pop_error_scope().block_on();
    let out_of_memory = device.pop_error_scope().block_on();
    let internal = device.pop_error_scope().block_on();

    match validation.or(out_of_memory).or(internal) {
        Some(error) => Err(error.into()),
        None => Ok(value),
    }
}
