//! Linear algebra conventions.
//!
//! Matrices are column-major `glam::Mat4` applied to column vectors, so a
//! clip position is `proj * view * model * p`. Coordinates are right-handed
//! and clip depth runs 0..1 as wgpu expects. Angles are radians unless the
//! function name ends in `_deg`.

use glam::{Mat4, Quat, Vec3, Vec4};

/// Smallest determinant magnitude treated as invertible.
pub const DETERMINANT_EPSILON: f32 = 1e-12;

/// Inverse of the transpose of `model`, used to carry normals.
///
/// Returns the identity for singular or non-finite input so a degenerate
/// model matrix never feeds NaN into a shader.
pub fn inverse_transpose(model: Mat4) -> Mat4 {
    let det = model.determinant();
    if !det.is_finite() || det.abs() < DETERMINANT_EPSILON {
        return Mat4::IDENTITY;
    }
    let result = model.transpose().inverse();
    if result.is_finite() {
        result
    } else {
        Mat4::IDENTITY
    }
}

/// Homogeneous point (w = 1).
pub fn point(v: Vec3) -> Vec4 {
    v.extend(1.0)
}

/// Homogeneous direction (w = 0).
pub fn direction(v: Vec3) -> Vec4 {
    v.extend(0.0)
}

/// Rotation about Z followed by Y in local space, angles in degrees.
///
/// Matches post-multiplying `rotate_z` then `rotate_y` onto a matrix.
pub fn euler_zy_deg(z_deg: f32, y_deg: f32) -> Quat {
    Quat::from_rotation_z(z_deg.to_radians()) * Quat::from_rotation_y(y_deg.to_radians())
}

/// Reflect across the YZ plane.
pub fn mirror_x(v: Vec3) -> Vec3 {
    Vec3::new(-v.x, v.y, v.z)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx_eq(a: Mat4, b: Mat4) -> bool {
        a.abs_diff_eq(b, 1e-5)
    }

    #[test]
    fn inverse_transpose_of_identity_is_identity() {
        assert_eq!(inverse_transpose(Mat4::IDENTITY), Mat4::IDENTITY);
    }

    #[test]
    fn inverse_transpose_of_rotation_is_rotation() {
        let rot = Mat4::from_quat(euler_zy_deg(-15.0, -10.0));
        assert!(approx_eq(inverse_transpose(rot), rot));
    }

    #[test]
    fn inverse_transpose_of_scale_inverts_scale() {
        let scale = Mat4::from_scale(Vec3::new(2.0, 4.0, 0.5));
        let expected = Mat4::from_scale(Vec3::new(0.5, 0.25, 2.0));
        assert!(approx_eq(inverse_transpose(scale), expected));
    }

    #[test]
    fn inverse_transpose_handles_mirror() {
        let mirror = Mat4::from_scale(Vec3::new(-1.0, 1.0, 1.0));
        assert!(approx_eq(inverse_transpose(mirror), mirror));
    }

    #[test]
    fn singular_matrix_falls_back_to_identity() {
        let flat = Mat4::from_scale(Vec3::new(1.0, 0.0, 1.0));
        assert_eq!(inverse_transpose(flat), Mat4::IDENTITY);
        assert_eq!(inverse_transpose(Mat4::ZERO), Mat4::IDENTITY);
    }

    #[test]
    fn non_finite_matrix_falls_back_to_identity() {
        let mut cols = Mat4::IDENTITY.to_cols_array();
        cols[0] = f32::NAN;
        assert_eq!(inverse_transpose(Mat4::from_cols_array(&cols)), Mat4::IDENTITY);
    }

    #[test]
    fn euler_order_is_z_then_y() {
        let q = euler_zy_deg(90.0, 90.0);
        // Y rotation acts first on the vector: +X -> -Z, then Z rotation keeps -Z.
        let v = q * Vec3::X;
        assert!(v.abs_diff_eq(Vec3::NEG_Z, 1e-5), "{v:?}");
    }

    #[test]
    fn homogeneous_helpers_set_w() {
        assert_eq!(point(Vec3::ONE).w, 1.0);
        assert_eq!(direction(Vec3::ONE).w, 0.0);
        assert_eq!(mirror_x(Vec3::new(1.0, 2.0, 3.0)), Vec3::new(-1.0, 2.0, 3.0));
    }
}
