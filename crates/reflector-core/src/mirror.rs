//! The virtual camera seen through a planar mirror.

use glam::{Mat4, Vec3, Vec4};

use crate::camera::Camera;
use crate::oblique::{oblique_projection, texture_projection_matrix, view_space_plane};
use crate::renderer::CameraView;
use crate::surface::SurfaceFrame;

/// A camera mirrored across a reflective surface, with its projection
/// clipped to the surface plane.
#[derive(Debug, Clone, PartialEq)]
pub struct MirroredCamera {
    /// Mirrored eye position.
    pub position: Vec3,
    /// Mirrored look target.
    pub target: Vec3,
    /// Mirrored up direction.
    pub up: Vec3,
    /// World-to-view matrix.
    pub view: Mat4,
    /// Projection with the near plane on the reflection plane.
    pub projection: Mat4,
    /// Projection before oblique clipping.
    pub base_projection: Mat4,
    /// View-space clip plane used for the oblique projection.
    pub clip_plane: Vec4,
    /// Far distance copied from the real camera.
    pub far: f32,
}

impl MirroredCamera {
    /// Mirrors `camera` across `surface`.
    ///
    /// The oblique near plane sits `clip_bias` behind the surface, so points
    /// less than `clip_bias` below it are still drawn into the reflection.
    /// Pass `0.0` to clip exactly at the surface.
    ///
    /// Returns `None` when the camera is not strictly in front of the surface
    /// (`(surface - camera) · normal >= 0`); nothing should be rendered then.
    pub fn new(camera: &Camera, surface: &SurfaceFrame, clip_bias: f32) -> Option<Self> {
        let normal = surface.normal;
        let view = surface.position - camera.position;
        if view.dot(normal) >= 0.0 {
            return None;
        }

        let position = surface.position - reflect(view, normal);
        let target = surface.position - reflect(surface.position - camera.target, normal);
        let up = reflect(camera.up, normal);

        let view_matrix = Mat4::look_at_rh(position, target, up);
        let base_projection = camera.projection_matrix();

        // Pushed behind the surface by the bias so contact geometry survives.
        let plane = surface.plane().offset(-clip_bias);
        let clip_plane = view_space_plane(&plane, view_matrix);
        let projection = oblique_projection(base_projection, clip_plane);

        Some(Self {
            position,
            target,
            up,
            view: view_matrix,
            projection,
            base_projection,
            clip_plane,
            far: camera.far,
        })
    }

    /// Returns `projection * view`.
    pub fn view_projection(&self) -> Mat4 {
        self.projection * self.view
    }

    /// Returns the matrices to render the reflection pass with.
    pub fn camera_view(&self) -> CameraView {
        CameraView {
            view: self.view,
            projection: self.projection,
            position: self.position,
            far: self.far,
        }
    }

    /// Texture projection matrix for a surface drawn with `surface_world`.
    pub fn texture_matrix(&self, surface_world: Mat4) -> Mat4 {
        texture_projection_matrix(self.projection, self.view, surface_world)
    }
}

/// Reflects `v` across the plane with unit normal `n`.
fn reflect(v: Vec3, n: Vec3) -> Vec3 {
    v - 2.0 * v.dot(n) * n
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plane::Plane;
    use crate::surface::floor_matrix;
    use glam::{EulerRot, Quat};
    use proptest::prelude::*;

    fn floor() -> SurfaceFrame {
        SurfaceFrame::from_world_matrix(floor_matrix(0.0))
    }

    #[test]
    fn test_mirrors_camera_across_floor() {
        let camera = Camera::looking_at(Vec3::new(0.0, 5.0, 10.0), Vec3::new(0.0, 1.0, 2.0), 1.0);
        let mirrored = MirroredCamera::new(&camera, &floor(), 0.003).unwrap();

        assert!((mirrored.position - Vec3::new(0.0, -5.0, 10.0)).length() < 1e-5);
        assert!((mirrored.target - Vec3::new(0.0, -1.0, 2.0)).length() < 1e-5);
        assert!((mirrored.up - Vec3::NEG_Y).length() < 1e-6);
        assert_eq!(mirrored.far, camera.far);
    }

    #[test]
    fn test_camera_behind_floor_is_rejected() {
        let camera = Camera::looking_at(Vec3::new(0.0, -5.0, 10.0), Vec3::ZERO, 1.0);
        assert!(MirroredCamera::new(&camera, &floor(), 0.003).is_none());
    }

    #[test]
    fn test_camera_in_plane_is_rejected() {
        let camera = Camera::looking_at(Vec3::new(3.0, 0.0, 0.0), Vec3::new(0.0, 0.0, 1.0), 1.0);
        assert!(MirroredCamera::new(&camera, &floor(), 0.003).is_none());
    }

    #[test]
    fn test_oblique_clip_around_plane() {
        let camera = Camera::looking_at(Vec3::new(0.0, 5.0, 10.0), Vec3::ZERO, 1.0);
        let mirrored = MirroredCamera::new(&camera, &floor(), 0.0).unwrap();
        let view_projection = mirrored.view_projection();
        let epsilon = 0.01;

        let behind = view_projection * Vec4::new(0.0, -epsilon, 0.0, 1.0);
        assert!(behind.z < 0.0, "point behind the mirror must be clipped");

        let front = view_projection * Vec4::new(0.0, epsilon, 0.0, 1.0);
        assert!(front.z >= 0.0 && front.z <= front.w);
    }

    #[test]
    fn test_clip_bias_keeps_contact_geometry() {
        let camera = Camera::looking_at(Vec3::new(0.0, 5.0, 10.0), Vec3::ZERO, 1.0);
        let mirrored = MirroredCamera::new(&camera, &floor(), 0.05).unwrap();
        let view_projection = mirrored.view_projection();

        let touching = view_projection * Vec4::new(0.0, -0.01, 0.0, 1.0);
        assert!(touching.z >= 0.0);
        let deeper = view_projection * Vec4::new(0.0, -0.1, 0.0, 1.0);
        assert!(deeper.z < 0.0);
    }

    #[test]
    fn test_default_bias_clips_below_the_bias() {
        let camera = Camera::looking_at(Vec3::new(0.0, 5.0, 10.0), Vec3::ZERO, 1.0);
        let mirrored = MirroredCamera::new(&camera, &floor(), 0.003).unwrap();
        let view_projection = mirrored.view_projection();

        let within_bias = view_projection * Vec4::new(0.0, -0.001, 0.0, 1.0);
        assert!(within_bias.z >= 0.0);
        let past_bias = view_projection * Vec4::new(0.0, -0.02, 0.0, 1.0);
        assert!(past_bias.z < 0.0);
    }

    #[test]
    fn test_texture_matrix_is_mirror_of_screen() {
        let camera = Camera::looking_at(Vec3::new(0.0, 5.0, 10.0), Vec3::ZERO, 1.5);
        let surface = floor();
        let mirrored = MirroredCamera::new(&camera, &surface, 0.003).unwrap();
        let texture_matrix = mirrored.texture_matrix(surface.world);

        // World point on the floor, and its local coordinate.
        let world_point = Vec3::new(0.5, 0.0, 1.0);
        let local = surface.world.inverse().transform_point3(world_point);
        let t = texture_matrix * local.extend(1.0);
        assert!(t.w > 0.0);
        let uv = t.truncate().truncate() / t.w;

        let clip = camera.view_projection_matrix() * world_point.extend(1.0);
        let ndc = clip.truncate().truncate() / clip.w;
        // Same row on screen, horizontally flipped.
        assert!((uv.x - (0.5 - 0.5 * ndc.x)).abs() < 1e-4);
        assert!((uv.y - (0.5 - 0.5 * ndc.y)).abs() < 1e-4);
    }

    fn front_camera() -> impl Strategy<Value = Vec3> {
        (-20.0f32..20.0, 0.1f32..20.0, -20.0f32..20.0).prop_map(|(x, y, z)| Vec3::new(x, y, z))
    }

    /// A surface under a rotated, non-uniformly scaled parent, itself rotated
    /// within the parent.
    fn surface_pose() -> impl Strategy<Value = Mat4> {
        let angle = -std::f32::consts::PI..std::f32::consts::PI;
        (
            (angle.clone(), angle.clone(), angle.clone()),
            (-10.0f32..10.0, -10.0f32..10.0, -10.0f32..10.0),
            (0.5f32..3.0, 0.5f32..3.0, 0.5f32..3.0),
            (angle.clone(), angle),
        )
            .prop_map(|((ax, ay, az), (tx, ty, tz), (sx, sy, sz), (cx, cy))| {
                let parent = Mat4::from_scale_rotation_translation(
                    Vec3::new(sx, sy, sz),
                    Quat::from_euler(EulerRot::XYZ, ax, ay, az),
                    Vec3::new(tx, ty, tz),
                );
                parent * Mat4::from_rotation_x(cx) * Mat4::from_rotation_y(cy)
            })
    }

    proptest! {
        #[test]
        fn prop_mirror_and_clip_hold_for_any_surface_pose(
            world in surface_pose(),
            distance in 0.5f32..15.0,
            sideways in -10.0f32..10.0,
            a in -3.0f32..3.0,
            b in -3.0f32..3.0,
        ) {
            let surface = SurfaceFrame::from_world_matrix(world);
            let normal = surface.normal;
            let (tangent, bitangent) = normal.any_orthonormal_pair();

            let eye = surface.position + normal * distance + tangent * sideways;
            let mut camera = Camera::looking_at(eye, surface.position, 1.0);
            camera.up = bitangent;
            let mirrored = MirroredCamera::new(&camera, &surface, 0.0).unwrap();

            let plane = surface.plane();
            let expected = plane.reflect_point(eye);
            prop_assert!((mirrored.position - expected).length() < 1e-3 * (1.0 + eye.length()));
            prop_assert!((plane.signed_distance(mirrored.position) + distance).abs() < 1e-3 * (1.0 + eye.length()));

            let view_projection = mirrored.view_projection();
            let on_plane = surface.position + tangent * a + bitangent * b;
            let front = view_projection * (on_plane + normal * 0.05).extend(1.0);
            let behind = view_projection * (on_plane - normal * 0.05).extend(1.0);
            prop_assert!(front.z > 0.0, "front point clipped: {front:?}");
            prop_assert!(behind.z < 0.0, "point behind the mirror kept: {behind:?}");
        }

        #[test]
        fn prop_mirrored_position_is_geometric_mirror(
            eye in front_camera(),
            tx in -5.0f32..5.0,
            tz in -5.0f32..5.0,
        ) {
            let surface = floor();
            let target = Vec3::new(tx, 0.0, tz);
            prop_assume!((target - eye).length() > 1e-2);
            let camera = Camera::looking_at(eye, target, 1.0);
            let mirrored = MirroredCamera::new(&camera, &surface, 0.003).unwrap();

            let plane = Plane::from_normal_and_point(Vec3::Y, Vec3::ZERO);
            let expected = plane.reflect_point(eye);
            prop_assert!((mirrored.position - expected).length() < 1e-4 * (1.0 + eye.length()));
            prop_assert!(plane.signed_distance(mirrored.position) < 0.0);
            prop_assert!(plane.signed_distance(eye) > 0.0);
        }

        #[test]
        fn prop_cameras_behind_never_mirror(
            x in -20.0f32..20.0,
            y in -20.0f32..=0.0,
            z in -20.0f32..20.0,
        ) {
            let camera = Camera::looking_at(Vec3::new(x, y, z), Vec3::new(0.0, 0.0, 1.0), 1.0);
            prop_assert!(MirroredCamera::new(&camera, &floor(), 0.003).is_none());
        }

        #[test]
        fn prop_visible_floor_points_map_into_unit_square(
            eye in front_camera(),
            tx in -5.0f32..5.0,
            tz in -5.0f32..5.0,
            dx in -3.0f32..3.0,
            dz in -3.0f32..3.0,
        ) {
            let surface = floor();
            let target = Vec3::new(tx, 0.0, tz);
            let point = target + Vec3::new(dx, 0.0, dz);
            prop_assume!((target - eye).length() > 0.5);
            let camera = Camera::looking_at(eye, target, 1.0);
            let clip = camera.view_projection_matrix() * point.extend(1.0);
            prop_assume!(clip.w > 0.0);
            let ndc = clip.truncate().truncate() / clip.w;
            prop_assume!(ndc.x.abs() <= 1.0 && ndc.y.abs() <= 1.0);

            let mirrored = MirroredCamera::new(&camera, &surface, 0.003).unwrap();
            let local = surface.world.inverse().transform_point3(point);
            let t = mirrored.texture_matrix(surface.world) * local.extend(1.0);
            prop_assert!(t.w > 0.0);
            let uv = t.truncate().truncate() / t.w;
            prop_assert!((-1e-3..=1.0 + 1e-3).contains(&uv.x));
            prop_assert!((-1e-3..=1.0 + 1e-3).contains(&uv.y));
        }
    }
}
