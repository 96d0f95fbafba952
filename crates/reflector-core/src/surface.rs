//! World-space pose of a reflective surface.

use glam::{Mat4, Vec3};

use crate::plane::Plane;

/// Normal of a reflective surface in its local frame.
///
/// Surface shapes lie in local XY; a floor is a surface rotated -90° about X.
pub const LOCAL_NORMAL: Vec3 = Vec3::Z;

/// A reflective surface's world matrix with its derived position and normal.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SurfaceFrame {
    /// Local-to-world matrix.
    pub world: Mat4,
    /// World position of the local origin.
    pub position: Vec3,
    /// Unit world-space normal.
    pub normal: Vec3,
}

impl SurfaceFrame {
    /// Derives position and normal from a world matrix.
    ///
    /// The normal is perpendicular to the transformed local XY plane, on the
    /// side of the transformed local normal axis, so it stays correct under
    /// shear from non-uniformly scaled parents. A matrix that collapses the
    /// XY plane falls back to the local normal axis.
    pub fn from_world_matrix(world: Mat4) -> Self {
        let normal_axis = world.transform_vector3(LOCAL_NORMAL);
        let normal = match world
            .x_axis
            .truncate()
            .cross(world.y_axis.truncate())
            .try_normalize()
        {
            // Mirroring matrices flip the cross product.
            Some(n) if n.dot(normal_axis) < 0.0 => -n,
            Some(n) => n,
            None => normal_axis.try_normalize().unwrap_or(LOCAL_NORMAL),
        };
        Self {
            world,
            position: world.w_axis.truncate(),
            normal,
        }
    }

    /// Returns the reflection plane.
    pub fn plane(&self) -> Plane {
        Plane::from_normal_and_point(self.normal, self.position)
    }
}

/// Places a reflector over a node: same world transform, lifted by `offset`
/// along the node's surface normal.
pub fn placed_over(node_world: Mat4, offset: f32) -> Mat4 {
    let frame = SurfaceFrame::from_world_matrix(node_world);
    Mat4::from_translation(frame.normal * offset) * node_world
}

/// World matrix for a horizontal floor surface at `height`, facing +Y.
pub fn floor_matrix(height: f32) -> Mat4 {
    Mat4::from_translation(Vec3::new(0.0, height, 0.0))
        * Mat4::from_rotation_x(-std::f32::consts::FRAC_PI_2)
}
