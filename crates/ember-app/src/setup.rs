//! Renderer and camera construction from config.

use glam::Vec3;

use ember_config::schema::{CameraConfig, EmberConfig, RenderConfig};
use ember_renderer::{Camera, Renderer, Viewport};

fn to_vec3(v: [f64; 3]) -> Vec3 {
    Vec3::new(v[0] as f32, v[1] as f32, v[2] as f32)
}

pub fn build_renderer(config: &EmberConfig, viewport: Viewport) -> Renderer {
    let mut renderer = Renderer::new(viewport);
    apply_render_config(&mut renderer, &config.render);
    renderer
}

pub fn apply_render_config(renderer: &mut Renderer, render: &RenderConfig) {
    let [r, g, b, a] = render.clear_color.to_rgba_f32();
    renderer.set_clear_color(r, g, b, a);
}

pub fn build_camera(camera: &CameraConfig, viewport: Viewport) -> Camera {
    Camera::new(
        to_vec3(camera.eye),
        to_vec3(camera.target),
        camera.fov_y_degrees as f32,
        viewport.aspect_ratio(),
        camera.near as f32,
        camera.far as f32,
    )
}

/// Move `camera` to the configured placement, keeping its aspect ratio.
pub fn apply_camera_config(camera: &mut Camera, config: &CameraConfig) {
    camera.look_at(to_vec3(config.eye), to_vec3(config.target));
    camera.set_fov_y_deg(config.fov_y_degrees as f32);
    camera.set_clip_planes(config.near as f32, config.far as f32);
    camera.update_projection_matrix();
    camera.update();
}

#[cfg(test)]
mod tests {
    use super::*;
    use ember_common::Color;

    #[test]
    fn renderer_takes_clear_color_from_config() {
        let mut config = EmberConfig::default();
        config.render.clear_color = Color::from_rgb(51, 51, 51);
        let renderer = build_renderer(&config, Viewport::new(800, 600));
        let [r, g, b, a] = renderer.clear_color();
        assert!((r - 0.2).abs() < 1e-6);
        assert_eq!(r, g);
        assert_eq!(g, b);
        assert_eq!(a, 1.0);
    }

    #[test]
    fn camera_uses_viewport_aspect() {
        let camera = build_camera(&CameraConfig::default(), Viewport::new(800, 400));
        assert!((camera.aspect() - 2.0).abs() < 1e-6);
        assert_eq!(camera.eye(), Vec3::new(0.0, 0.0, 5.0));
    }

    #[test]
    fn reapplied_camera_keeps_aspect() {
        let mut camera = build_camera(&CameraConfig::default(), Viewport::new(800, 400));
        let moved = CameraConfig {
            eye: [0.0, 1.0, 8.0],
            ..CameraConfig::default()
        };
        apply_camera_config(&mut camera, &moved);
        assert_eq!(camera.eye(), Vec3::new(0.0, 1.0, 8.0));
        assert!((camera.aspect() - 2.0).abs() < 1e-6);
    }
}
