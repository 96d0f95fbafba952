//! Reflector configuration.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::error::{ReflectorError, Result};

/// How the sampled reflection is combined with the tint color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BlendMode {
    /// Per-channel overlay of the tint onto the reflection.
    #[default]
    Overlay,
    /// Reflection modulated by the tint, blended with straight alpha.
    Alpha,
}

impl BlendMode {
    /// Index passed to the shader.
    #[must_use]
    pub fn to_index(self) -> u32 {
        match self {
            BlendMode::Overlay => 0,
            BlendMode::Alpha => 1,
        }
    }

    /// Returns display name.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            BlendMode::Overlay => "Overlay",
            BlendMode::Alpha => "Alpha",
        }
    }
}

/// Size of the output surface in logical pixels plus the device pixel ratio.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScreenSize {
    /// Width in logical pixels.
    pub width: u32,
    /// Height in logical pixels.
    pub height: u32,
    /// Device pixel ratio.
    pub pixel_ratio: f32,
}

impl ScreenSize {
    /// Creates a screen size.
    #[must_use]
    pub fn new(width: u32, height: u32, pixel_ratio: f32) -> Self {
        Self {
            width,
            height,
            pixel_ratio,
        }
    }

    /// Aspect ratio (width / height).
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn aspect_ratio(&self) -> f32 {
        self.width as f32 / self.height.max(1) as f32
    }
}

/// Configuration for a planar reflector.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ReflectorConfig {
    /// Tint blended with the reflection.
    pub color: Vec3,
    /// Fixed buffer width; `None` follows the screen.
    pub texture_width: Option<u32>,
    /// Fixed buffer height; `None` follows the screen.
    pub texture_height: Option<u32>,
    /// Distance the clip plane is pushed behind the surface. Must be
    /// positive.
    pub clip_bias: f32,
    /// Opacity of the reflection overlay (0.0 - 1.0).
    pub opacity: f32,
    /// Blend function used by the surface material.
    pub blend_mode: BlendMode,
    /// Upper bound applied to the device pixel ratio when sizing the buffer.
    pub max_pixel_ratio: f32,
    /// Lift along the surface normal when placing the reflector over a node.
    pub surface_offset: f32,
}

impl Default for ReflectorConfig {
    fn default() -> Self {
        Self {
            color: Vec3::splat(119.0 / 255.0), // 0x777777
            texture_width: None,
            texture_height: None,
            clip_bias: 0.003,
            opacity: 0.3,
            blend_mode: BlendMode::Overlay,
            max_pixel_ratio: 2.0,
            surface_offset: 0.0,
        }
    }
}

impl ReflectorConfig {
    /// Parses a configuration from JSON. Missing fields take their defaults.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Serializes the configuration to pretty JSON.
    pub fn to_json_string(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Checks that all values are in range.
    pub fn validate(&self) -> Result<()> {
        if !(self.clip_bias > 0.0 && self.clip_bias.is_finite()) {
            return Err(ReflectorError::InvalidConfig(format!(
                "clip_bias must be a finite positive number, got {}",
                self.clip_bias
            )));
        }
        if !(0.0..=1.0).contains(&self.opacity) {
            return Err(ReflectorError::InvalidConfig(format!(
                "opacity must be in [0, 1], got {}",
                self.opacity
            )));
        }
        if self.texture_width == Some(0) || self.texture_height == Some(0) {
            return Err(ReflectorError::InvalidConfig(
                "texture size must be non-zero".into(),
            ));
        }
        if !(self.max_pixel_ratio > 0.0 && self.max_pixel_ratio.is_finite()) {
            return Err(ReflectorError::InvalidConfig(format!(
                "max_pixel_ratio must be positive, got {}",
                self.max_pixel_ratio
            )));
        }
        Ok(())
    }

    /// Sets the tint color.
    #[must_use]
    pub fn with_color(mut self, color: Vec3) -> Self {
        self.color = color;
        self
    }

    /// Sets a fixed buffer resolution.
    #[must_use]
    pub fn with_texture_size(mut self, width: u32, height: u32) -> Self {
        self.texture_width = Some(width);
        self.texture_height = Some(height);
        self
    }

    /// Sets the clip bias.
    #[must_use]
    pub fn with_clip_bias(mut self, clip_bias: f32) -> Self {
        self.clip_bias = clip_bias;
        self
    }

    /// Sets the opacity.
    #[must_use]
    pub fn with_opacity(mut self, opacity: f32) -> Self {
        self.opacity = opacity;
        self
    }

    /// Sets the blend mode.
    #[must_use]
    pub fn with_blend_mode(mut self, blend_mode: BlendMode) -> Self {
        self.blend_mode = blend_mode;
        self
    }

    /// Sets the placement offset along the surface normal.
    #[must_use]
    pub fn with_surface_offset(mut self, offset: f32) -> Self {
        self.surface_offset = offset;
        self
    }

    /// Resolves the reflection buffer size for the given screen.
    ///
    /// Fixed sizes win; otherwise the screen size is scaled by the pixel
    /// ratio, clamped to `max_pixel_ratio`. Never returns a zero dimension.
    #[must_use]
    #[allow(
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        clippy::cast_precision_loss
    )]
    pub fn buffer_size(&self, screen: ScreenSize) -> (u32, u32) {
        let ratio = screen.pixel_ratio.min(self.max_pixel_ratio).max(f32::MIN_POSITIVE);
        let scaled = |logical: u32| ((logical as f32 * ratio).round() as u32).max(1);
        (
            self.texture_width.unwrap_or_else(|| scaled(screen.width)),
            self.texture_height.unwrap_or_else(|| scaled(screen.height)),
        )
    }
}
