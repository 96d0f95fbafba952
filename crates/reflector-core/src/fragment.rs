//! CPU reference of the reflective surface's fragment stage.
//!
//! Mirrors `reflector.wgsl` in reflector-render; used for tests and for
//! software previews.

use glam::{Mat4, Vec2, Vec3, Vec4};

use crate::config::BlendMode;

/// Overlay blend of one channel.
pub fn blend_overlay_channel(base: f32, blend: f32) -> f32 {
    if base < 0.5 {
        2.0 * base * blend
    } else {
        1.0 - 2.0 * (1.0 - base) * (1.0 - blend)
    }
}

/// Per-channel overlay blend.
pub fn blend_overlay(base: Vec3, blend: Vec3) -> Vec3 {
    Vec3::new(
        blend_overlay_channel(base.x, blend.x),
        blend_overlay_channel(base.y, blend.y),
        blend_overlay_channel(base.z, blend.z),
    )
}

/// Projective texture lookup coordinate of a surface-local position.
///
/// Returns `None` when the point projects behind the reflection camera.
pub fn projective_uv(texture_matrix: Mat4, local_position: Vec3) -> Option<Vec2> {
    let t = texture_matrix * local_position.extend(1.0);
    (t.w > 0.0).then(|| Vec2::new(t.x, t.y) / t.w)
}

/// Combines a sampled reflection color with the tint.
pub fn shade(sample: Vec3, tint: Vec3, opacity: f32, mode: BlendMode) -> Vec4 {
    let rgb = match mode {
        BlendMode::Overlay => blend_overlay(sample, tint),
        BlendMode::Alpha => sample * tint,
    };
    rgb.extend(opacity)
}

/// Evaluates one fragment: projective lookup through `sample`, then blend.
///
/// Points behind the reflection camera shade as an empty (black) sample.
pub fn shade_fragment(
    texture_matrix: Mat4,
    local_position: Vec3,
    sample: impl Fn(Vec2) -> Vec3,
    tint: Vec3,
    opacity: f32,
    mode: BlendMode,
) -> Vec4 {
    let color = projective_uv(texture_matrix, local_position).map_or(Vec3::ZERO, sample);
    shade(color, tint, opacity, mode)
}
