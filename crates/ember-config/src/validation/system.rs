//! Validation for the window and logging sections.

use crate::schema::EmberConfig;

use super::helpers::validate_range;

pub(crate) fn validate_window(errors: &mut Vec<String>, config: &EmberConfig) {
    validate_range(errors, "window.width", config.window.width, 64, 16384);
    validate_range(errors, "window.height", config.window.height, 64, 16384);
}

pub(crate) fn validate_logging(errors: &mut Vec<String>, config: &EmberConfig) {
    validate_range(
        errors,
        "logging.fps_interval_secs",
        config.logging.fps_interval_secs,
        0,
        3600,
    );
}
