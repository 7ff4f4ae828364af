//! Perspective look-at camera.

use glam::{Mat4, Vec3};

#[derive(Debug, Clone, PartialEq)]
pub struct Camera {
    eye: Vec3,
    target: Vec3,
    up: Vec3,
    /// Vertical field of view in radians.
    fov_y: f32,
    aspect: f32,
    near: f32,
    far: f32,
    view: Mat4,
    projection: Mat4,
}

impl Camera {
    pub fn new(eye: Vec3, target: Vec3, fov_y_deg: f32, aspect: f32, near: f32, far: f32) -> Self {
        let mut camera = Self {
            eye,
            target,
            up: Vec3::Y,
            fov_y: fov_y_deg.to_radians(),
            aspect,
            near,
            far,
            view: Mat4::IDENTITY,
            projection: Mat4::IDENTITY,
        };
        camera.update();
        camera.update_projection_matrix();
        camera
    }

    /// Takes effect at the next [`Camera::update_projection_matrix`].
    pub fn set_aspect_ratio(&mut self, aspect: f32) {
        if aspect.is_finite() && aspect > 0.0 {
            self.aspect = aspect;
        }
    }

    pub fn set_fov_y_deg(&mut self, fov_y_deg: f32) {
        self.fov_y = fov_y_deg.to_radians();
    }

    pub fn set_clip_planes(&mut self, near: f32, far: f32) {
        self.near = near;
        self.far = far;
    }

    pub fn update_projection_matrix(&mut self) {
        self.projection = Mat4::perspective_rh(self.fov_y, self.aspect, self.near, self.far);
    }

    /// Takes effect at the next [`Camera::update`].
    pub fn look_at(&mut self, eye: Vec3, target: Vec3) {
        self.eye = eye;
        self.target = target;
    }

    /// Recompute the view matrix from eye, target and up.
    pub fn update(&mut self) {
        self.view = Mat4::look_at_rh(self.eye, self.target, self.up);
    }

    pub fn eye(&self) -> Vec3 {
        self.eye
    }

    pub fn target(&self) -> Vec3 {
        self.target
    }

    pub fn aspect(&self) -> f32 {
        self.aspect
    }

    pub fn view(&self) -> Mat4 {
        self.view
    }

    pub fn projection(&self) -> Mat4 {
        self.projection
    }

    pub fn view_proj(&self) -> Mat4 {
        self.projection * self.view
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec4;

    fn camera() -> Camera {
        Camera::new(Vec3::new(0.0, 0.0, 5.0), Vec3::ZERO, 45.0, 1.6, 0.1, 1000.0)
    }

    #[test]
    fn target_projects_to_screen_center() {
        let clip = camera().view_proj() * Vec4::new(0.0, 0.0, 0.0, 1.0);
        let ndc = clip / clip.w;
        assert!(ndc.x.abs() < 1e-5 && ndc.y.abs() < 1e-5);
        assert!((0.0..=1.0).contains(&ndc.z));
    }

    #[test]
    fn point_behind_near_plane_is_outside_depth_range() {
        let clip = camera().view_proj() * Vec4::new(0.0, 0.0, 4.95, 1.0);
        assert!(clip.z / clip.w < 0.0);
    }

    #[test]
    fn aspect_change_needs_projection_update() {
        let mut cam = camera();
        let before = cam.projection();
        cam.set_aspect_ratio(1.0);
        assert_eq!(cam.projection(), before);
        cam.update_projection_matrix();
        assert_ne!(cam.projection(), before);
        assert_eq!(cam.aspect(), 1.0);
    }

    #[test]
    fn invalid_aspect_is_ignored() {
        let mut cam = camera();
        cam.set_aspect_ratio(0.0);
        cam.set_aspect_ratio(f32::NAN);
        assert_eq!(cam.aspect(), 1.6);
    }

    #[test]
    fn look_at_applies_on_update() {
        let mut cam = camera();
        cam.look_at(Vec3::new(5.0, 0.0, 0.0), Vec3::ZERO);
        cam.update();
        let view_pos = cam.view() * Vec4::new(0.0, 0.0, 0.0, 1.0);
        assert!((view_pos.z + 5.0).abs() < 1e-5);
        assert_eq!(cam.eye(), Vec3::new(5.0, 0.0, 0.0));
    }
}
