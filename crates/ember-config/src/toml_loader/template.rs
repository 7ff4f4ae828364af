//! Default TOML config template with inline documentation comments.

/// Generate the default TOML config content with comments.
pub(crate) fn default_config_toml() -> String {
    r##"# Ember Configuration
# Schema version 1
# Only override what you want to change -- missing fields use defaults.
# The file is watched: saved changes apply to the running window.

[scene]
subdivisions = 5             # 0-8, icosphere tessellation level
geom_color = [183, 140, 17]  # base ember color, [r, g, b] or "#rrggbb"
# outer_flame = false
# outer_flame_scale = 1.06   # 0.5-2.0
# nose = true
# mouth = true

[scene.palette]
# eye = [255, 255, 255]
# lash = [204, 51, 51]
# eyeball = [204, 51, 51]
# nose = [120, 40, 20]
# mouth = [60, 10, 10]

[scene.flame]
# irid_a = [0.5, 0.5, 0.5]
# irid_b = [0.5, 0.5, 0.5]
# irid_c = [1.0, 1.0, 1.0]
# irid_d = [0.0, 0.33, 0.67]
# perlin_freq = 2.0          # 0.0-64.0
# fbm_amp = 0.5              # 0.0-4.0
# fbm_freq = 3.0             # 0.0-64.0

[camera]
# eye = [0.0, 0.0, 5.0]
# target = [0.0, 0.0, 0.0]
# fov_y_degrees = 45.0       # 10-120
# near = 0.1
# far = 1000.0

[window]
# title = "Ember"
# width = 1280
# height = 800

[render]
# clear_color = [51, 51, 51]
# vsync = true
# wireframe = false

[logging]
# level = "INFO"             # TRACE, DEBUG, INFO, WARNING, ERROR
# fps_interval_secs = 5      # 0 disables FPS logging
"##
    .to_string()
}
