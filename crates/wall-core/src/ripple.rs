//! Speaker-cone ripple for the floating image planes.
//!
//! Each plane is a flat grid pushed along its local Z by a function of the
//! distance `r` from the plane centre in UV space: a cone, a travelling ring
//! near the centre, a slower ring past the rim and a hover-driven pulse.

use crate::constants::{
    PLANE_JITTER_Y, PLANE_Z, RIPPLE_BPM_NORM, RIPPLE_CENTER_AMP, RIPPLE_CENTER_FALLOFF,
    RIPPLE_EDGE_AMP, RIPPLE_EDGE_START, RIPPLE_FREQ_NORM,
};
use crate::mesh::MeshPointSet;
use crate::transform::Transform;
use crate::viewport::ViewportProfile;
use glam::{Vec2, Vec3};
use rand::Rng;
use std::f32::consts::{PI, TAU};

/// Hover presets of the three project types shown in Works.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ProjectKind {
    Product,
    Graphic,
    Sound,
}

impl ProjectKind {
    pub const ALL: [ProjectKind; 3] = [ProjectKind::Product, ProjectKind::Graphic, ProjectKind::Sound];

    /// (frequency, bpm) fed to the hover smoothing while this project is hovered.
    pub fn hover(self) -> (f32, f32) {
        match self {
            ProjectKind::Product => (900.0, 70.0),
            ProjectKind::Graphic => (450.0, 110.0),
            ProjectKind::Sound => (180.0, 160.0),
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "product" => Some(ProjectKind::Product),
            "graphic" => Some(ProjectKind::Graphic),
            "sound" => Some(ProjectKind::Sound),
            _ => None,
        }
    }
}

/// Frame-constant ripple inputs.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RippleDrive {
    pub time: f32,
    pub freq_norm: f32,
    pub bpm_norm: f32,
    pub pulse_amplitude: f32,
}

impl RippleDrive {
    pub fn new(time: f32, hover_frequency: f32, hover_bpm: f32, pulse_amplitude: f32) -> Self {
        Self {
            time,
            freq_norm: hover_frequency / RIPPLE_FREQ_NORM,
            bpm_norm: if hover_bpm > 0.0 {
                hover_bpm / RIPPLE_BPM_NORM
            } else {
                1.0
            },
            pulse_amplitude,
        }
    }
}

/// The four displacement terms at one UV, kept apart for inspection.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct RippleTerms {
    pub cone: f32,
    pub center: f32,
    pub edge: f32,
    pub pulse: f32,
}

impl RippleTerms {
    #[inline]
    pub fn total(&self) -> f32 {
        self.cone + self.center + self.edge + self.pulse
    }
}

pub fn ripple_terms(uv: Vec2, drive: &RippleDrive) -> RippleTerms {
    let t = drive.time;
    let r = (uv - Vec2::splat(0.5)).length();
    let over = (r - RIPPLE_EDGE_START).max(0.0);
    RippleTerms {
        cone: r.sqrt(),
        center: (r * PI * 3.0 - t * 5.0).cos() * (RIPPLE_CENTER_FALLOFF - r) * RIPPLE_CENTER_AMP,
        edge: if over > 0.0 {
            ((r - RIPPLE_EDGE_START) * PI * 6.0 + t * 1.5).sin() * over * RIPPLE_EDGE_AMP
        } else {
            0.0
        },
        pulse: (t * (2.0 + drive.freq_norm * 1.5 + drive.bpm_norm * 0.3)).sin()
            * (1.0 - r)
            * drive.pulse_amplitude,
    }
}

/// Where a plane floats and how it is phased against the others.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PlaneLayout {
    pub position: Vec3,
    pub phase: f32,
}

impl PlaneLayout {
    /// Even slots go left, odd slots right, each at a random height and phase.
    pub fn random<R: Rng>(slot: usize, spread: f32, rng: &mut R) -> Self {
        let x = if slot % 2 == 0 { -spread } else { spread };
        Self {
            position: Vec3::new(x, (rng.gen::<f32>() - 0.5) * PLANE_JITTER_Y, PLANE_Z),
            phase: rng.gen::<f32>() * TAU,
        }
    }

    /// Tilt toward the centre of the screen.
    pub fn base_rotation(&self) -> Vec3 {
        if self.position.x < 0.0 {
            Vec3::new(-0.7, 0.7, 1.0)
        } else {
            Vec3::new(-0.7, -0.7, -1.0)
        }
    }

    pub fn rotation_at(&self, time: f32) -> Vec3 {
        let p = self.phase;
        self.base_rotation()
            + Vec3::new(
                (time * 0.3 + p * 0.6).sin() * 0.05,
                (time * 0.5 + p).sin() * 0.1,
                (time * 0.4 + p * 1.1).sin() * 0.04,
            )
    }
}

/// One textured, rippling plane.
#[derive(Debug)]
pub struct ImagePlane {
    mesh: MeshPointSet,
    positions: Vec<Vec3>,
    layout: PlaneLayout,
    transform: Transform,
    dirty: bool,
}

impl ImagePlane {
    /// Plane sized for an image of `width` x `height` pixels.
    pub fn new(width: u32, height: u32, layout: PlaneLayout, profile: &ViewportProfile) -> Self {
        let aspect = if width > 0 && height > 0 {
            width as f32 / height as f32
        } else {
            1.0
        };
        let h = profile.plane_height;
        let mesh = MeshPointSet::plane(
            h * aspect,
            h,
            profile.plane_segments,
            profile.plane_segments,
        );
        let positions = mesh.base().to_vec();
        Self {
            mesh,
            positions,
            transform: Transform {
                position: layout.position,
                rotation: layout.base_rotation(),
                scale: 1.0,
            },
            layout,
            dirty: true,
        }
    }

    pub fn update(&mut self, drive: &RippleDrive) {
        for ((out, base), uv) in self
            .positions
            .iter_mut()
            .zip(self.mesh.base())
            .zip(self.mesh.uvs())
        {
            let z = ripple_terms(*uv, drive).total();
            *out = Vec3::new(base.x, base.y, base.z + z);
        }
        self.transform.rotation = self.layout.rotation_at(drive.time);
        self.dirty = true;
    }

    #[inline]
    pub fn mesh(&self) -> &MeshPointSet {
        &self.mesh
    }

    #[inline]
    pub fn positions(&self) -> &[Vec3] {
        &self.positions
    }

    #[inline]
    pub fn layout(&self) -> &PlaneLayout {
        &self.layout
    }

    #[inline]
    pub fn transform(&self) -> &Transform {
        &self.transform
    }

    /// Read and clear the upload flag.
    #[inline]
    pub fn take_dirty(&mut self) -> bool {
        std::mem::replace(&mut self.dirty, false)
    }
}
