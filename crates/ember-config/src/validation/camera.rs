//! Camera validation: projection parameters and a non-degenerate view.

use crate::schema::EmberConfig;

use super::helpers::{validate_finite3, validate_range_f64};

pub(crate) fn validate_camera(errors: &mut Vec<String>, config: &EmberConfig) {
    let camera = &config.camera;
    validate_finite3(errors, "camera.eye", camera.eye);
    validate_finite3(errors, "camera.target", camera.target);
    validate_range_f64(
        errors,
        "camera.fov_y_degrees",
        camera.fov_y_degrees,
        10.0,
        120.0,
    );

    if !(camera.near > 0.0) {
        errors.push(format!("camera.near = {} must be positive", camera.near));
    }
    if !(camera.far > camera.near) {
        errors.push(format!(
            "camera.far = {} must be greater than camera.near = {}",
            camera.far, camera.near
        ));
    }
    if camera.eye == camera.target {
        errors.push("camera.eye must differ from camera.target".to_string());
    }
}
