//! Perspective camera.

use glam::{Mat4, Vec3};

/// Right-handed perspective camera with a look-at target.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PerspectiveCamera {
    /// Vertical field of view in degrees.
    pub fov: f32,
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
    pub position: Vec3,
    pub target: Vec3,
}

impl PerspectiveCamera {
    pub fn new(fov: f32, aspect: f32, near: f32, far: f32) -> Self {
        Self {
            fov,
            aspect,
            near,
            far,
            position: Vec3::new(0.0, 0.0, 10.0),
            target: Vec3::ZERO,
        }
    }

    pub fn look_at(mut self, position: Vec3, target: Vec3) -> Self {
        self.position = position;
        self.target = target;
        self
    }

    pub fn view(&self) -> Mat4 {
        Mat4::look_at_rh(self.position, self.target, Vec3::Y)
    }

    /// Projection with a `[0, 1]` depth range.
    pub fn projection(&self) -> Mat4 {
        Mat4::perspective_rh(self.fov.to_radians(), self.aspect.max(1e-4), self.near, self.far)
    }

    pub fn view_projection(&self) -> Mat4 {
        self.projection() * self.view()
    }

    /// Height of the visible frustum slice at `distance` from the camera.
    pub fn visible_height_at(&self, distance: f32) -> f32 {
        2.0 * (self.fov.to_radians() * 0.5).tan() * distance
    }

    pub fn visible_width_at(&self, distance: f32) -> f32 {
        self.visible_height_at(distance) * self.aspect
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_target_projects_to_center() {
        let camera = PerspectiveCamera::new(45.0, 16.0 / 9.0, 0.1, 100.0)
            .look_at(Vec3::new(0.0, 1.0, 14.0), Vec3::new(0.0, -2.0, 0.0));
        let clip = camera.view_projection() * camera.target.extend(1.0);
        let ndc = clip.truncate() / clip.w;
        assert!(ndc.x.abs() < 1e-4);
        assert!(ndc.y.abs() < 1e-4);
        assert!(ndc.z > 0.0 && ndc.z < 1.0);
    }

    #[test]
    fn test_visible_height() {
        let camera = PerspectiveCamera::new(90.0, 1.0, 0.1, 100.0);
        assert!((camera.visible_height_at(10.0) - 20.0).abs() < 1e-3);
        assert!((camera.visible_width_at(10.0) - 20.0).abs() < 1e-3);
    }
}
