//! Math utilities and types
//!
//! Provides fundamental math types for scene hierarchies and animation.

pub use nalgebra::{
    Vector2, Vector3, Vector4,
    Matrix3, Matrix4,
    Quaternion,
    Unit,
};

/// 2D vector type
pub type Vec2 = Vector2<f32>;

/// 3D vector type
pub type Vec3 = Vector3<f32>;

/// 4D vector type
pub type Vec4 = Vector4<f32>;

/// 3x3 matrix type
pub type Mat3 = Matrix3<f32>;

/// 4x4 matrix type
pub type Mat4 = Matrix4<f32>;

/// 3D point type
pub type Point3 = nalgebra::Point3<f32>;

/// Quaternion type for rotations
pub type Quat = Unit<Quaternion<f32>>;

/// Local position, rotation and scale of a node relative to its parent
///
/// Used both as the immutable template transform of a template node and as the
/// local part of a live scene transform.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LocalTransform {
    /// Position relative to the parent
    pub position: Vec3,

    /// Rotation quaternion
    pub rotation: Quat,

    /// Scale factors
    pub scale: Vec3,
}

impl Default for LocalTransform {
    fn default() -> Self {
        Self {
            position: Vec3::zeros(),
            rotation: Quat::identity(),
            scale: Vec3::new(1.0, 1.0, 1.0),
        }
    }
}

impl LocalTransform {
    /// Create a new identity transform
    pub fn identity() -> Self {
        Self::default()
    }

    /// Create a transform with only position
    pub fn from_position(position: Vec3) -> Self {
        Self {
            position,
            ..Default::default()
        }
    }

    /// Create a transform from position, rotation and scale
    pub fn new(position: Vec3, rotation: Quat, scale: Vec3) -> Self {
        Self { position, rotation, scale }
    }

    /// Builder pattern: Set rotation from Euler angles (radians, XYZ order)
    pub fn with_rotation_euler(mut self, x: f32, y: f32, z: f32) -> Self {
        self.rotation = Quat::from_euler_angles(x, y, z);
        self
    }

    /// Builder pattern: Set scale (non-uniform)
    pub fn with_scale(mut self, scale: Vec3) -> Self {
        self.scale = scale;
        self
    }

    /// Convert to a transformation matrix (TRS order)
    pub fn to_matrix(&self) -> Mat4 {
        Mat4::new_translation(&self.position)
            * self.rotation.to_homogeneous()
            * Mat4::new_nonuniform_scaling(&self.scale)
    }

    /// Decompose a transformation matrix into translation, rotation and scale
    ///
    /// Shear is discarded. A zero scale axis yields an identity rotation for
    /// that axis instead of dividing by zero.
    pub fn from_matrix(matrix: &Mat4) -> Self {
        let position = Vec3::new(matrix.m14, matrix.m24, matrix.m34);

        let scale_x = Vec3::new(matrix.m11, matrix.m21, matrix.m31).magnitude();
        let scale_y = Vec3::new(matrix.m12, matrix.m22, matrix.m32).magnitude();
        let scale_z = Vec3::new(matrix.m13, matrix.m23, matrix.m33).magnitude();
        let scale = Vec3::new(scale_x, scale_y, scale_z);

        let safe = |s: f32| if s.abs() > f32::EPSILON { s } else { 1.0 };
        let (sx, sy, sz) = (safe(scale_x), safe(scale_y), safe(scale_z));
        let rotation_matrix = Mat3::new(
            matrix.m11 / sx, matrix.m12 / sy, matrix.m13 / sz,
            matrix.m21 / sx, matrix.m22 / sy, matrix.m23 / sz,
            matrix.m31 / sx, matrix.m32 / sy, matrix.m33 / sz,
        );
        let rotation = Quat::from_matrix(&rotation_matrix);

        Self { position, rotation, scale }
    }

    /// Combine this transform (as parent) with a child transform
    pub fn combine(&self, child: &LocalTransform) -> LocalTransform {
        LocalTransform {
            position: self.position + self.rotation * self.scale.component_mul(&child.position),
            rotation: self.rotation * child.rotation,
            scale: self.scale.component_mul(&child.scale),
        }
    }

    /// Get the inverse transform
    pub fn inverse(&self) -> LocalTransform {
        let inv_scale = Vec3::new(1.0 / self.scale.x, 1.0 / self.scale.y, 1.0 / self.scale.z);
        let inv_rotation = self.rotation.inverse();
        let inv_position = inv_rotation * (-self.position).component_mul(&inv_scale);

        LocalTransform {
            position: inv_position,
            rotation: inv_rotation,
            scale: inv_scale,
        }
    }
}

/// Math constants
pub mod constants {
    /// Pi constant
    pub const PI: f32 = std::f32::consts::PI;

    /// Degrees to radians conversion factor
    pub const DEG_TO_RAD: f32 = PI / 180.0;
}

/// Math utility functions
pub mod utils {
    use super::{constants, Quat, Vec3};

    /// Convert degrees to radians
    pub fn deg_to_rad(degrees: f32) -> f32 {
        degrees * constants::DEG_TO_RAD
    }

    /// Linear interpolation
    pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
        a + (b - a) * t
    }

    /// Component-wise linear interpolation between two vectors
    pub fn lerp_vec3(a: &Vec3, b: &Vec3, t: f32) -> Vec3 {
        a + (b - a) * t
    }

    /// Spherical interpolation along the shortest arc
    ///
    /// Falls back to normalized linear interpolation when the two rotations
    /// are exactly opposite and the slerp axis is ambiguous.
    pub fn slerp(a: &Quat, b: &Quat, t: f32) -> Quat {
        a.try_slerp(b, t, 1.0e-6).unwrap_or_else(|| a.nlerp(b, t))
    }
}

/// Extension trait for Mat4 with additional convenience methods
pub trait Mat4Ext {
    /// Create a perspective projection matrix
    fn perspective(fov_y: f32, aspect: f32, near: f32, far: f32) -> Mat4;
}

impl Mat4Ext for Mat4 {
    fn perspective(fov_y: f32, aspect: f32, near: f32, far: f32) -> Mat4 {
        // Vulkan-style projection: depth mapped to [0,1], no Y flip
        let tan_half_fovy = (fov_y * 0.5).tan();

        let mut result = Mat4::zeros();
        result[(0, 0)] = 1.0 / (aspect * tan_half_fovy);
        result[(1, 1)] = 1.0 / tan_half_fovy;
        result[(2, 2)] = far / (far - near);
        result[(2, 3)] = -(near * far) / (far - near);
        result[(3, 2)] = 1.0;

        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_matrix_roundtrip_consistency() {
        let original = LocalTransform::new(
            Vec3::new(1.0, 2.0, 3.0),
            Quat::from_axis_angle(&Unit::new_normalize(Vec3::new(1.0, 1.0, 1.0)), 0.5),
            Vec3::new(2.0, 1.5, 0.8),
        );

        let reconstructed = LocalTransform::from_matrix(&original.to_matrix());

        assert_relative_eq!(reconstructed.position, original.position, epsilon = 1e-5);
        assert_relative_eq!(reconstructed.scale, original.scale, epsilon = 1e-5);
        let dot = original.rotation.coords.dot(&reconstructed.rotation.coords);
        assert!(dot.abs() > 0.999, "Quaternion rotation mismatch: dot product = {}", dot);
    }

    #[test]
    fn test_combine_matches_matrix_product() {
        let parent = LocalTransform::new(
            Vec3::new(1.0, 0.0, 0.0),
            Quat::from_axis_angle(&Vec3::y_axis(), constants::PI / 2.0),
            Vec3::new(1.0, 1.0, 1.0),
        );
        let child = LocalTransform::from_position(Vec3::new(0.0, 0.0, 1.0));

        let combined = parent.combine(&child);
        // (0,0,1) rotated 90 degrees around Y lands on (1,0,0), plus parent offset
        assert_relative_eq!(combined.position, Vec3::new(2.0, 0.0, 0.0), epsilon = 1e-5);
        assert_relative_eq!(
            combined.to_matrix(),
            parent.to_matrix() * child.to_matrix(),
            epsilon = 1e-5
        );
    }

    #[test]
    fn test_inverse_yields_identity() {
        let t = LocalTransform::new(
            Vec3::new(2.0, 3.0, 1.0),
            Quat::from_axis_angle(&Vec3::y_axis(), 0.785),
            Vec3::new(2.0, 2.0, 2.0),
        );
        let should_be_identity = t.combine(&t.inverse());

        assert_relative_eq!(should_be_identity.position, Vec3::zeros(), epsilon = 1e-5);
        assert_relative_eq!(should_be_identity.scale, Vec3::new(1.0, 1.0, 1.0), epsilon = 1e-5);
    }

    #[test]
    fn test_slerp_halfway() {
        let a = Quat::identity();
        let b = Quat::from_axis_angle(&Vec3::z_axis(), constants::PI / 2.0);
        let half = utils::slerp(&a, &b, 0.5);
        assert_relative_eq!(half.angle(), constants::PI / 4.0, epsilon = 1e-5);
    }
}
