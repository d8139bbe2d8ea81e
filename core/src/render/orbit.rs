//! Orbit camera controls
//!
//! Keeps the camera on a sphere around the target. Auto-rotation turns the
//! camera slowly until the user rotates or zooms for the first time; after
//! that it stays off for the lifetime of the controls.

use glam::Vec3;
use std::f32::consts::PI;

use crate::figure::{CameraDesc, OrbitDesc};

/// Keeps the camera off the poles where the up vector degenerates.
const POLAR_EPSILON: f32 = 1e-3;

/// Motion below this is treated as settled when damping.
const SETTLE_EPSILON: f32 = 1e-6;

#[derive(Debug, Clone, PartialEq)]
pub struct OrbitControls {
    target: Vec3,
    radius: f32,
    /// Azimuth around +Y, zero on +Z
    theta: f32,
    /// Polar angle from +Y
    phi: f32,
    delta_theta: f32,
    delta_phi: f32,
    scale: f32,
    damping_factor: Option<f32>,
    auto_rotate_speed: Option<f32>,
    min_distance: f32,
    max_distance: f32,
    interacted: bool,
}

impl OrbitControls {
    pub fn new(camera: &CameraDesc, orbit: &OrbitDesc) -> Self {
        let offset = camera.position - camera.target;
        let radius = offset.length().max(f32::EPSILON);
        Self {
            target: camera.target,
            radius,
            theta: offset.x.atan2(offset.z),
            phi: (offset.y / radius).clamp(-1.0, 1.0).acos(),
            delta_theta: 0.0,
            delta_phi: 0.0,
            scale: 1.0,
            damping_factor: orbit.damping_factor.map(|d| d.clamp(0.0, 1.0)),
            auto_rotate_speed: orbit.auto_rotate_speed,
            min_distance: 0.0,
            max_distance: f32::INFINITY,
            interacted: false,
        }
    }

    pub fn with_distance_limits(mut self, min: f32, max: f32) -> Self {
        self.min_distance = min.max(0.0);
        self.max_distance = max.max(self.min_distance);
        self
    }

    /// Rotate by user input (radians): `dx` around the vertical axis, `dy` up/down.
    pub fn rotate(&mut self, dx: f32, dy: f32) {
        if dx.is_finite() && dy.is_finite() {
            self.delta_theta -= dx;
            self.delta_phi -= dy;
        }
        self.interacted = true;
    }

    /// Zoom by user input; factors above 1 move the camera closer.
    pub fn zoom(&mut self, factor: f32) {
        if factor.is_finite() && factor > 0.0 {
            self.scale /= factor;
        }
        self.interacted = true;
    }

    pub fn is_auto_rotating(&self) -> bool {
        self.auto_rotate_speed.is_some() && !self.interacted
    }

    /// Advance by `dt` seconds. Returns true when the camera moved.
    pub fn update(&mut self, dt: f32) -> bool {
        let before = self.position();

        if self.is_auto_rotating() {
            let speed = self.auto_rotate_speed.unwrap_or_default();
            // Speed 1.0 is one revolution per minute
            self.delta_theta -= 2.0 * PI / 60.0 * speed * dt;
        }

        match self.damping_factor {
            Some(damping) => {
                self.theta += self.delta_theta * damping;
                self.phi += self.delta_phi * damping;
                self.delta_theta *= 1.0 - damping;
                self.delta_phi *= 1.0 - damping;
                if self.delta_theta.abs() < SETTLE_EPSILON {
                    self.delta_theta = 0.0;
                }
                if self.delta_phi.abs() < SETTLE_EPSILON {
                    self.delta_phi = 0.0;
                }
            }
            None => {
                self.theta += self.delta_theta;
                self.phi += self.delta_phi;
                self.delta_theta = 0.0;
                self.delta_phi = 0.0;
            }
        }

        self.theta = self.theta.rem_euclid(2.0 * PI);
        self.phi = self.phi.clamp(POLAR_EPSILON, PI - POLAR_EPSILON);
        let min_distance = self.min_distance.max(f32::EPSILON);
        self.radius = (self.radius * self.scale).clamp(min_distance, self.max_distance);
        self.scale = 1.0;

        self.position().distance_squared(before) > SETTLE_EPSILON * SETTLE_EPSILON
    }

    pub fn position(&self) -> Vec3 {
        let sin_phi = self.phi.sin();
        self.target
            + Vec3::new(
                self.radius * sin_phi * self.theta.sin(),
                self.radius * self.phi.cos(),
                self.radius * sin_phi * self.theta.cos(),
            )
    }

    pub fn target(&self) -> Vec3 {
        self.target
    }

    pub fn distance(&self) -> f32 {
        self.radius
    }

    pub fn azimuth(&self) -> f32 {
        self.theta
    }

    pub fn polar(&self) -> f32 {
        self.phi
    }
}
