//! Perspective camera shared by both front-ends.

use crate::viewport::ViewportProfile;
use glam::{Mat4, Vec3};

/// Right-handed camera looking down -Z at the origin.
#[derive(Clone, Debug, PartialEq)]
pub struct Camera {
    pub eye: Vec3,
    pub target: Vec3,
    pub up: Vec3,
    pub aspect: f32,
    pub fovy_radians: f32,
    pub znear: f32,
    pub zfar: f32,
}

impl Camera {
    /// Camera placed and zoomed for the given layout.
    pub fn for_profile(profile: &ViewportProfile, aspect: f32) -> Self {
        Self {
            eye: Vec3::new(0.0, 0.0, profile.camera_z),
            target: Vec3::ZERO,
            up: Vec3::Y,
            aspect: sanitize_aspect(aspect),
            fovy_radians: profile.fovy_degrees.to_radians(),
            znear: 0.1,
            zfar: 200.0,
        }
    }

    pub fn set_aspect(&mut self, aspect: f32) {
        self.aspect = sanitize_aspect(aspect);
    }

    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh(self.fovy_radians, self.aspect, self.znear, self.zfar)
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.eye, self.target, self.up)
    }
}

#[inline]
fn sanitize_aspect(aspect: f32) -> f32 {
    if aspect.is_finite() && aspect > 0.0 {
        aspect
    } else {
        1.0
    }
}
