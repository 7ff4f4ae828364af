//! Scene validation: tessellation level, flame shell, noise parameters.

use crate::schema::EmberConfig;

use super::helpers::{validate_finite3, validate_range, validate_range_f64};

/// Deepest supported icosphere level (20 * 4^8 = 1,310,720 triangles).
pub const MAX_SUBDIVISIONS: u32 = 8;

pub(crate) fn validate_scene(errors: &mut Vec<String>, config: &EmberConfig) {
    let scene = &config.scene;
    validate_range(
        errors,
        "scene.subdivisions",
        scene.subdivisions,
        0,
        MAX_SUBDIVISIONS,
    );
    validate_range_f64(
        errors,
        "scene.outer_flame_scale",
        scene.outer_flame_scale,
        0.5,
        2.0,
    );

    let flame = &scene.flame;
    validate_finite3(errors, "scene.flame.irid_a", flame.irid_a);
    validate_finite3(errors, "scene.flame.irid_b", flame.irid_b);
    validate_finite3(errors, "scene.flame.irid_c", flame.irid_c);
    validate_finite3(errors, "scene.flame.irid_d", flame.irid_d);
    validate_range_f64(errors, "scene.flame.perlin_freq", flame.perlin_freq, 0.0, 64.0);
    validate_range_f64(errors, "scene.flame.fbm_amp", flame.fbm_amp, 0.0, 4.0);
    validate_range_f64(errors, "scene.flame.fbm_freq", flame.fbm_freq, 0.0, 64.0);
}
