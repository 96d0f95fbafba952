//! Planes and planar reflection.

use glam::{Mat4, Vec3, Vec4};

/// An oriented plane `normal · x + constant = 0`.
///
/// The normal is kept unit length. Points with positive signed distance lie
/// on the front side (the side the normal points to).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Plane {
    normal: Vec3,
    constant: f32,
}

impl Plane {
    /// Creates a plane from a normal and constant, normalizing both.
    pub fn new(normal: Vec3, constant: f32) -> Self {
        let length = normal.length();
        Self {
            normal: normal / length,
            constant: constant / length,
        }
    }

    /// Creates a plane through `point` with the given normal.
    pub fn from_normal_and_point(normal: Vec3, point: Vec3) -> Self {
        let normal = normal.normalize();
        Self {
            normal,
            constant: -point.dot(normal),
        }
    }

    /// Returns the unit normal.
    pub fn normal(&self) -> Vec3 {
        self.normal
    }

    /// Returns the plane constant.
    pub fn constant(&self) -> f32 {
        self.constant
    }

    /// Returns the plane as `(nx, ny, nz, constant)`.
    pub fn to_vec4(&self) -> Vec4 {
        self.normal.extend(self.constant)
    }

    /// Returns the signed distance from a point to the plane.
    pub fn signed_distance(&self, point: Vec3) -> f32 {
        self.normal.dot(point) + self.constant
    }

    /// Projects a point onto the plane.
    pub fn project(&self, point: Vec3) -> Vec3 {
        point - self.signed_distance(point) * self.normal
    }

    /// Mirrors a point across the plane.
    pub fn reflect_point(&self, point: Vec3) -> Vec3 {
        point - 2.0 * self.signed_distance(point) * self.normal
    }

    /// Mirrors a direction across the plane (no translation).
    pub fn reflect_vector(&self, vector: Vec3) -> Vec3 {
        vector - 2.0 * vector.dot(self.normal) * self.normal
    }

    /// Returns this plane moved by `distance` along its normal.
    #[must_use]
    pub fn offset(&self, distance: f32) -> Self {
        Self {
            normal: self.normal,
            constant: self.constant - distance,
        }
    }

    /// Transforms the plane by an affine matrix.
    ///
    /// Planes transform with the inverse transpose of the point transform.
    #[must_use]
    pub fn transformed(&self, matrix: Mat4) -> Self {
        let v = matrix.inverse().transpose() * self.to_vec4();
        Self::new(v.truncate(), v.w)
    }

    /// Returns the matrix reflecting points across this plane.
    pub fn reflection_matrix(&self) -> Mat4 {
        let n = self.normal;
        let d = self.constant;

        // | 1-2nx²   -2nxny   -2nxnz   -2nxd |
        // | -2nxny   1-2ny²   -2nynz   -2nyd |
        // | -2nxnz   -2nynz   1-2nz²   -2nzd |
        // |    0        0        0       1   |
        Mat4::from_cols(
            Vec4::new(1.0 - 2.0 * n.x * n.x, -2.0 * n.x * n.y, -2.0 * n.x * n.z, 0.0),
            Vec4::new(-2.0 * n.x * n.y, 1.0 - 2.0 * n.y * n.y, -2.0 * n.y * n.z, 0.0),
            Vec4::new(-2.0 * n.x * n.z, -2.0 * n.y * n.z, 1.0 - 2.0 * n.z * n.z, 0.0),
            Vec4::new(-2.0 * n.x * d, -2.0 * n.y * d, -2.0 * n.z * d, 1.0),
        )
    }
}

/// Computes a reflection matrix for the plane through `plane_point` with `plane_normal`.
pub fn reflection_matrix(plane_point: Vec3, plane_normal: Vec3) -> Mat4 {
    Plane::from_normal_and_point(plane_normal, plane_point).reflection_matrix()
}
