//! Oblique near-plane clipping and projective texture matrices.
//!
//! Projections follow wgpu's clip-space convention: visible depth satisfies
//! `0 <= z <= w`, so the near plane is `z = 0`.

use glam::{Mat4, Vec4};

use crate::plane::Plane;

/// Expresses a world-space plane in the space of `view`.
pub fn view_space_plane(plane: &Plane, view: Mat4) -> Vec4 {
    plane.transformed(view).to_vec4()
}

/// Skews `projection` so its near plane coincides with `clip_plane`.
///
/// `clip_plane` is in view space and oriented so the visible half-space is
/// positive; the eye must lie on its negative side. The third row is
/// replaced by a scaled copy of the plane, with the scale chosen so the far
/// plane still passes through the frustum corner opposite the clip plane.
/// The x, y and w rows are untouched.
pub fn oblique_projection(projection: Mat4, clip_plane: Vec4) -> Mat4 {
    let corner = Vec4::new(clip_plane.x.signum(), clip_plane.y.signum(), 1.0, 1.0);
    let q = projection.inverse() * corner;

    let denominator = clip_plane.dot(q);
    if denominator.abs() <= f32::EPSILON || !denominator.is_finite() {
        return projection;
    }
    let scale = projection.row(3).dot(q) / denominator;

    let mut rows = projection.transpose();
    rows.z_axis = clip_plane * scale;
    rows.transpose()
}

/// Maps clip-space xy in `[-1, 1]` to texture coordinates in `[0, 1]`.
///
/// v grows downward, matching wgpu texture space.
pub fn texture_bias_matrix() -> Mat4 {
    Mat4::from_cols(
        Vec4::new(0.5, 0.0, 0.0, 0.0),
        Vec4::new(0.0, -0.5, 0.0, 0.0),
        Vec4::new(0.0, 0.0, 1.0, 0.0),
        Vec4::new(0.5, 0.5, 0.0, 1.0),
    )
}

/// Builds the matrix taking surface-local positions to projective texture
/// coordinates of a render made with `projection * view`.
///
/// Divide the result's xy by its w to get the sampling coordinate.
pub fn texture_projection_matrix(projection: Mat4, view: Mat4, surface_world: Mat4) -> Mat4 {
    texture_bias_matrix() * projection * view * surface_world
}
