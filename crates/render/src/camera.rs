//! Orbit camera and its mouse controller
//!
//! The camera circles a target point at a given radius. `alpha` is the
//! longitudinal angle around the Y axis and `beta` the latitudinal angle
//! measured from +Y, so `beta = PI / 2` looks at the target from the horizon.
//!
//! The view is left-handed: seen from `alpha = -PI / 2` (eye on -Z), +X points
//! to the right of the screen and +Z into it.

use std::f32::consts::PI;

use glam::{Mat4, Vec3};
use winit::dpi::PhysicalPosition;
use winit::event::{ElementState, MouseButton, MouseScrollDelta, WindowEvent};

const BETA_EPSILON: f32 = 0.01;

/// Camera orbiting a target point
#[derive(Clone, Debug, PartialEq)]
pub struct ArcRotateCamera {
    /// Longitudinal rotation in radians
    pub alpha: f32,
    /// Latitudinal rotation in radians, kept inside (0, PI)
    pub beta: f32,
    /// Distance from the target
    pub radius: f32,
    /// Point the camera looks at
    pub target: Vec3,
    /// Render target aspect ratio
    pub aspect: f32,
    /// Field of view in radians
    pub fovy: f32,
    /// Near clipping plane distance
    pub znear: f32,
    /// Far clipping plane distance
    pub zfar: f32,
    /// Closest the camera may zoom towards the target
    pub lower_radius_limit: f32,
}

impl ArcRotateCamera {
    pub fn new(alpha: f32, beta: f32, radius: f32, target: Vec3) -> Self {
        Self {
            alpha,
            beta: beta.clamp(BETA_EPSILON, PI - BETA_EPSILON),
            radius,
            target,
            aspect: 16.0 / 9.0,
            fovy: 0.8,
            znear: 0.1,
            zfar: 1000.0,
            lower_radius_limit: 1.0,
        }
    }

    /// Aim the camera at a new target, keeping the orbit angles and radius
    pub fn set_target(&mut self, target: Vec3) {
        self.target = target;
    }

    /// Update aspect ratio when window is resized
    pub fn resize(&mut self, width: u32, height: u32) {
        if width > 0 && height > 0 {
            self.aspect = width as f32 / height as f32;
        }
    }

    /// World-space camera position derived from the orbit parameters
    pub fn eye(&self) -> Vec3 {
        let (sin_a, cos_a) = self.alpha.sin_cos();
        let (sin_b, cos_b) = self.beta.sin_cos();
        self.target + self.radius * Vec3::new(cos_a * sin_b, cos_b, sin_a * sin_b)
    }

    pub fn build_view_projection_matrix(&self) -> Mat4 {
        let view = Mat4::look_at_lh(self.eye(), self.target, Vec3::Y);
        let proj = Mat4::perspective_lh(self.fovy, self.aspect, self.znear, self.zfar);
        proj * view
    }

    pub fn orbit(&mut self, delta_alpha: f32, delta_beta: f32) {
        self.alpha += delta_alpha;
        self.beta = (self.beta + delta_beta).clamp(BETA_EPSILON, PI - BETA_EPSILON);
    }

    /// Move towards (positive) or away from (negative) the target
    pub fn zoom(&mut self, amount: f32) {
        self.radius = (self.radius - amount).max(self.lower_radius_limit);
    }
}

/// Mouse controller attached to the window: left drag orbits, wheel zooms
pub struct CameraController {
    /// Radians per pixel of drag
    sensitivity: f32,
    /// World units per wheel line
    zoom_speed: f32,
    mouse_pressed: bool,
    last_cursor: Option<PhysicalPosition<f64>>,
}

impl CameraController {
    pub fn new(sensitivity: f32, zoom_speed: f32) -> Self {
        Self {
            sensitivity,
            zoom_speed,
            mouse_pressed: false,
            last_cursor: None,
        }
    }

    /// Returns `true` when the event was consumed by the camera
    pub fn process_event(&mut self, camera: &mut ArcRotateCamera, event: &WindowEvent) -> bool {
        match event {
            WindowEvent::MouseInput {
                state,
                button: MouseButton::Left,
                ..
            } => {
                self.mouse_pressed = *state == ElementState::Pressed;
                true
            }
            WindowEvent::CursorMoved { position, .. } => {
                if self.mouse_pressed {
                    if let Some(last) = self.last_cursor {
                        let dx = (position.x - last.x) as f32;
                        let dy = (position.y - last.y) as f32;
                        camera.orbit(-dx * self.sensitivity, -dy * self.sensitivity);
                    }
                }
                self.last_cursor = Some(*position);
                true
            }
            WindowEvent::MouseWheel { delta, .. } => {
                let lines = match delta {
                    MouseScrollDelta::LineDelta(_, y) => *y,
                    MouseScrollDelta::PixelDelta(pos) => pos.y as f32 * 0.02,
                };
                camera.zoom(lines * self.zoom_speed);
                true
            }
            _ => false,
        }
    }
}

impl Default for CameraController {
    fn default() -> Self {
        Self::new(0.005, 0.5)
    }
}
