//! Rest pose of the face parts.
//!
//! Left-side parts are placed explicitly; right-side parts are their mirror
//! image across the YZ plane.

use glam::{Mat4, Vec3};

use ember_renderer::math::{euler_zy_deg, mirror_x};

pub const BODY_RADIUS: f32 = 1.0;
pub const BROW_RADIUS: f32 = BODY_RADIUS * 0.25;
pub const LASH_RADIUS: f32 = BODY_RADIUS * 0.32;
pub const EYEBALL_RADIUS: f32 = BODY_RADIUS * 0.133;
pub const NOSE_RADIUS: f32 = BODY_RADIUS * 0.09;
pub const MOUTH_RADIUS: f32 = BODY_RADIUS * 0.2;

pub const LEFT_BROW_POS: Vec3 = Vec3::new(-0.6, -0.7, 2.9);
pub const LEFT_EYE_POS: Vec3 = Vec3::new(-0.55, -0.4, 0.9);
pub const LEFT_EYEBALL_POS: Vec3 = Vec3::new(-0.45, -0.363, 0.9);
pub const NOSE_POS: Vec3 = Vec3::new(0.0, -0.58, 0.86);
pub const MOUTH_POS: Vec3 = Vec3::new(0.0, -0.82, 0.6);
const MOUTH_SCALE: Vec3 = Vec3::new(1.8, 0.4, 0.6);

const EYE_Z_ROT_DEG: f32 = -15.0;
const EYE_Y_ROT_DEG: f32 = -10.0;
/// Extra roll applied to the lashes after they are placed on the eye.
const LASH_ROLL_DEG: f32 = -3.2;
/// Lash offset in eye space: sits on the upper rim, slightly behind.
const LASH_OFFSET: Vec3 = Vec3::new(BROW_RADIUS - LASH_RADIUS + 0.03, 0.0, -0.01);

const MIRROR: Vec3 = Vec3::new(-1.0, 1.0, 1.0);

pub fn right_brow_pos() -> Vec3 {
    mirror_x(LEFT_BROW_POS)
}

pub fn left_eye() -> Mat4 {
    Mat4::from_rotation_translation(euler_zy_deg(EYE_Z_ROT_DEG, EYE_Y_ROT_DEG), LEFT_EYE_POS)
}

pub fn right_eye() -> Mat4 {
    Mat4::from_scale_rotation_translation(
        MIRROR,
        euler_zy_deg(-EYE_Z_ROT_DEG, -EYE_Y_ROT_DEG),
        mirror_x(LEFT_EYE_POS),
    )
}

pub fn left_lash() -> Mat4 {
    Mat4::from_rotation_z(LASH_ROLL_DEG.to_radians()) * left_eye() * Mat4::from_translation(LASH_OFFSET)
}

pub fn right_lash() -> Mat4 {
    Mat4::from_rotation_z((-LASH_ROLL_DEG).to_radians())
        * right_eye()
        * Mat4::from_translation(LASH_OFFSET)
}

pub fn left_eyeball() -> Mat4 {
    Mat4::from_translation(LEFT_EYEBALL_POS)
}

pub fn right_eyeball() -> Mat4 {
    Mat4::from_translation(mirror_x(LEFT_EYEBALL_POS))
}

pub fn nose() -> Mat4 {
    Mat4::from_translation(NOSE_POS)
}

pub fn mouth() -> Mat4 {
    Mat4::from_scale_rotation_translation(MOUTH_SCALE, glam::Quat::IDENTITY, MOUTH_POS)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_mat_eq(a: Mat4, b: Mat4) {
        assert!(a.abs_diff_eq(b, 1e-5), "matrices differ:\n{a}\n{b}");
    }

    #[test]
    fn eyes_sit_at_their_positions() {
        assert!(left_eye().w_axis.truncate().abs_diff_eq(LEFT_EYE_POS, 1e-6));
        assert!(right_eye()
            .w_axis
            .truncate()
            .abs_diff_eq(Vec3::new(0.55, -0.4, 0.9), 1e-6));
    }

    #[test]
    fn right_eye_mirrors_left_eye() {
        assert_mat_eq(right_eye(), Mat4::from_scale(MIRROR) * left_eye());
    }

    #[test]
    fn right_lash_mirrors_left_lash() {
        assert_mat_eq(right_lash(), Mat4::from_scale(MIRROR) * left_lash());
    }

    #[test]
    fn right_eye_flips_handedness() {
        assert!(left_eye().determinant() > 0.0);
        assert!(right_eye().determinant() < 0.0);
    }

    #[test]
    fn lash_origin_is_offset_on_the_eye_then_rolled() {
        let on_eye = left_eye().transform_point3(LASH_OFFSET);
        let rolled = Mat4::from_rotation_z(LASH_ROLL_DEG.to_radians()).transform_point3(on_eye);
        assert!(left_lash().transform_point3(Vec3::ZERO).abs_diff_eq(rolled, 1e-6));
    }

    #[test]
    fn eyeballs_are_mirrored_translations() {
        let left = left_eyeball().transform_point3(Vec3::ZERO);
        let right = right_eyeball().transform_point3(Vec3::ZERO);
        assert_eq!(left, LEFT_EYEBALL_POS);
        assert_eq!(right, Vec3::new(0.45, -0.363, 0.9));
    }

    #[test]
    fn brow_radius_ratios() {
        assert!((BROW_RADIUS - 0.25).abs() < 1e-6);
        assert!((LASH_RADIUS - 0.32).abs() < 1e-6);
        assert!((EYEBALL_RADIUS - 0.133).abs() < 1e-6);
        assert_eq!(right_brow_pos(), Vec3::new(0.6, -0.7, 2.9));
    }

    #[test]
    fn mouth_is_squashed_on_the_chin() {
        let m = mouth();
        assert!(m.w_axis.truncate().abs_diff_eq(MOUTH_POS, 1e-6));
        assert!((m.x_axis.x - MOUTH_SCALE.x).abs() < 1e-6);
        assert!((m.y_axis.y - MOUTH_SCALE.y).abs() < 1e-6);
    }
}
