//! Perspective camera

use glam::{Mat4, Vec3};

use crate::figure::CameraDesc;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    pub fov_degrees: f32,
    pub near: f32,
    pub far: f32,
    pub aspect: f32,
    pub position: Vec3,
    pub target: Vec3,
}

impl Camera {
    pub fn from_desc(desc: &CameraDesc, aspect: f32) -> Self {
        Self {
            fov_degrees: desc.fov_degrees,
            near: desc.near,
            far: desc.far,
            aspect,
            position: desc.position,
            target: desc.target,
        }
    }

    pub fn set_aspect(&mut self, aspect: f32) {
        if aspect.is_finite() && aspect > 0.0 {
            self.aspect = aspect;
        }
    }

    pub fn view(&self) -> Mat4 {
        Mat4::look_at_rh(self.position, self.target, Vec3::Y)
    }

    pub fn projection(&self) -> Mat4 {
        Mat4::perspective_rh(self.fov_degrees.to_radians(), self.aspect, self.near, self.far)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn desc() -> CameraDesc {
        CameraDesc {
            fov_degrees: 75.0,
            near: 0.1,
            far: 1000.0,
            position: Vec3::new(0.0, 1.0, 5.0),
            target: Vec3::ZERO,
        }
    }

    #[test]
    fn target_projects_to_screen_centre() {
        let camera = Camera::from_desc(&desc(), 16.0 / 9.0);
        let clip = camera.projection() * camera.view() * Vec3::ZERO.extend(1.0);
        let ndc = clip / clip.w;
        assert!(ndc.x.abs() < 1e-5);
        assert!(ndc.y.abs() < 1e-5);
    }

    #[test]
    fn rejects_degenerate_aspect() {
        let mut camera = Camera::from_desc(&desc(), 1.5);
        camera.set_aspect(0.0);
        camera.set_aspect(f32::NAN);
        assert_eq!(camera.aspect, 1.5);
        camera.set_aspect(2.0);
        assert_eq!(camera.aspect, 2.0);
    }
}
