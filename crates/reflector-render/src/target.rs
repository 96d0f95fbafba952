//! Offscreen color and depth textures the reflection pass renders into.

use reflector_core::{ReflectorError, Result};

use crate::error::{capture_errors, RenderError, RenderResult};

/// Color format of reflection and screen targets.
pub const COLOR_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rgba8UnormSrgb;

/// Depth format of reflection and screen targets.
pub const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;

/// Checks that a `width` x `height` target can be allocated on a device
/// whose 2D texture limit is `max_dimension`.
pub fn check_size(width: u32, height: u32, max_dimension: u32) -> Result<()> {
    let reason = if width == 0 || height == 0 {
        "zero-sized target".to_string()
    } else if width > max_dimension || height > max_dimension {
        format!("exceeds device limit of {max_dimension}")
    } else {
        return Ok(());
    };
    Err(ReflectorError::TargetAllocation {
        width,
        height,
        reason,
    })
}

/// A color texture that can be sampled, with a matching depth buffer.
pub struct ReflectionTarget {
    color_texture: wgpu::Texture,
    color_view: wgpu::TextureView,
    depth_texture: wgpu::Texture,
    depth_view: wgpu::TextureView,
    width: u32,
    height: u32,
}

impl ReflectionTarget {
    /// Allocates a target. Sizes outside the device limits are rejected, and
    /// a device error during allocation is reported as
    /// [`ReflectorError::TargetAllocation`].
    pub fn new(device: &wgpu::Device, width: u32, height: u32) -> Result<Self> {
        check_size(width, height, device.limits().max_texture_dimension_2d)?;
        capture_errors(device, || Self::allocate(device, width, height)).map_err(|e| {
            ReflectorError::TargetAllocation {
                width,
                height,
                reason: e.to_string(),
            }
        })
    }

    fn allocate(device: &wgpu::Device, width: u32, height: u32) -> Self {
        let size = wgpu::Extent3d {
            width,
            height,
            depth_or_array_layers: 1,
        };

        let color_texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("reflection color"),
            size,
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: COLOR_FORMAT,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT
                | wgpu::TextureUsages::TEXTURE_BINDING
                | wgpu::TextureUsages::COPY_SRC,
            view_formats: &[],
        });
        let color_view = color_texture.create_view(&wgpu::TextureViewDescriptor::default());

        let depth_texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("reflection depth"),
            size,
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: DEPTH_FORMAT,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            view_formats: &[],
        });
        let depth_view = depth_texture.create_view(&wgpu::TextureViewDescriptor::default());

        Self {
            color_texture,
            color_view,
            depth_texture,
            depth_view,
            width,
            height,
        }
    }

    /// Copies the color texture back to the CPU as tightly packed RGBA8 rows.
    pub fn read_pixels(&self, device: &wgpu::Device, queue: &wgpu::Queue) -> RenderResult<Vec<u8>> {
        let bytes_per_row = padded_bytes_per_row(self.width);
        let buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("reflection readback"),
            size: u64::from(bytes_per_row) * u64::from(self.height),
            usage: wgpu::BufferUsages::COPY_DST | wgpu::BufferUsages::MAP_READ,
            mapped_at_creation: false,
        });

        let mut encoder = device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("reflection readback encoder"),
        });
        encoder.copy_texture_to_buffer(
            wgpu::TexelCopyTextureInfo {
                texture: &self.color_texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            wgpu::TexelCopyBufferInfo {
                buffer: &buffer,
                layout: wgpu::TexelCopyBufferLayout {
                    offset: 0,
                    bytes_per_row: Some(bytes_per_row),
                    rows_per_image: Some(self.height),
                },
            },
            wgpu::Extent3d {
                width: self.width,
                height: self.height,
                depth_or_array_layers: 1,
            },
        );
        queue.submit(std::iter::once(encoder.finish()));

        let slice = buffer.slice(..);
        let (tx, rx) = std::sync::mpsc::channel();
        slice.map_async(wgpu::MapMode::Read, move |result| {
            let _ = tx.send(result);
        });
        device
            .poll(wgpu::PollType::wait_indefinitely())
            .map_err(|_| RenderError::Timeout)?;
        rx.recv()
            .map_err(|e| RenderError::ReadbackFailed(e.to_string()))?
            .map_err(|e| RenderError::ReadbackFailed(e.to_string()))?;

        let data = slice.get_mapped_range();
        let row_bytes = self.width as usize * 4;
        let mut pixels = Vec::with_capacity(row_bytes * self.height as usize);
        for row in data.chunks(bytes_per_row as usize) {
            pixels.extend_from_slice(&row[..row_bytes]);
        }
        drop(data);
        buffer.unmap();
        Ok(pixels)
    }

    /// Returns the view sampled by the surface material.
    pub fn color_view(&self) -> &wgpu::TextureView {
        &self.color_view
    }

    /// Returns the depth view.
    pub fn depth_view(&self) -> &wgpu::TextureView {
        &self.depth_view
    }

    /// Returns `(width, height)`.
    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Releases the GPU textures now rather than when the last view drops.
    pub fn destroy(&self) {
        self.color_texture.destroy();
        self.depth_texture.destroy();
    }
}

/// Row pitch of a `width`-texel RGBA8 copy, rounded up to wgpu's copy alignment.
fn padded_bytes_per_row(width: u32) -> u32 {
    let unpadded = width * 4;
    let align = wgpu::COPY_BYTES_PER_ROW_ALIGNMENT;
    unpadded.div_ceil(align) * align
}
