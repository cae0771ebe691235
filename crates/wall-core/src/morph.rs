//! Secondary morph targets and the blend that mixes them into the sphere.
//!
//! Both morph styles share the same shape: a primary point from the wave
//! kernel, a secondary target, a progress `k`, and a handful of overlay layers
//! that only exist while the morph is in flight.

use crate::constants::{
    EXPLOSION_RADIAL, EXPLOSION_SHOCK_Z, WAVE_LINE_HEIGHT, WAVE_LINE_SPEED,
    WAVE_LINE_STEREO_PHASE, WAVE_LINE_WIDTH,
};
use crate::mesh::Spherical;
use crate::noise::NoiseSource;
use glam::Vec3;
use std::f32::consts::{PI, TAU};

/// `primary * (1 - k) + secondary * k` with `k` clamped to [0, 1].
///
/// The endpoints return their input unchanged so a settled morph reproduces
/// either shape bit for bit. A non-finite `k` counts as 0.
#[inline]
pub fn blend(primary: Vec3, secondary: Vec3, k: f32) -> Vec3 {
    let k = if k.is_finite() { k.clamp(0.0, 1.0) } else { 0.0 };
    if k <= 0.0 {
        primary
    } else if k >= 1.0 {
        secondary
    } else {
        primary * (1.0 - k) + secondary * k
    }
}

/// Scale `p` back onto a sphere of radius `max` when it lies outside it.
/// Non-finite points collapse to the origin.
#[inline]
pub fn clamp_displacement(p: Vec3, max: f32) -> Vec3 {
    if !p.is_finite() {
        return Vec3::ZERO;
    }
    let len2 = p.length_squared();
    if len2 > max * max {
        p * (max / len2.sqrt())
    } else {
        p
    }
}

/// Per-frame inputs shared by every point of one sphere's morph.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MorphFrame {
    pub time: f32,
    /// Morph progress, already clamped to [0, 1].
    pub progress: f32,
    /// Equal to `progress` while the morph mode is current, 0 otherwise.
    /// Fades the swirl layers out once the target has locked in.
    pub cloud_lock: f32,
    pub exiting: bool,
    /// -1 for the left sphere, 1 for the right one.
    pub side: f32,
}

impl MorphFrame {
    pub fn new(time: f32, progress: f32, in_morph_mode: bool, exiting: bool, side: f32) -> Self {
        let progress = if progress.is_finite() {
            progress.clamp(0.0, 1.0)
        } else {
            0.0
        };
        Self {
            time,
            progress,
            cloud_lock: if in_morph_mode { progress } else { 0.0 },
            exiting,
            side: if side < 0.0 { -1.0 } else { 1.0 },
        }
    }

    /// True when the secondary target has to be computed this frame.
    #[inline]
    pub fn is_engaged(&self, in_morph_mode: bool, epsilon: f32) -> bool {
        in_morph_mode || self.progress > epsilon
    }

    /// Weight of the organic jitter while a relief morph takes over.
    #[inline]
    pub fn jitter_fade(&self) -> f32 {
        1.0 - self.progress.powf(1.8)
    }

    /// Outward burst that plays while leaving the morph mode.
    #[inline]
    pub fn explosion(&self, base: Vec3) -> Vec3 {
        if !self.exiting {
            return Vec3::ZERO;
        }
        let e = ((1.0 - self.progress) * PI).sin();
        base * (e * EXPLOSION_RADIAL) + Vec3::Z * (e * EXPLOSION_SHOCK_Z)
    }

    /// Vortex twist around Z plus the radial smear, both faded by the cloud lock.
    #[inline]
    pub fn swirl(&self, base: Vec3, s: &Spherical) -> Vec3 {
        let fade = 1.0 - self.cloud_lock;
        if fade <= 0.0 {
            return Vec3::ZERO;
        }
        let vortex = self.progress * 0.35 * 0.04;
        let smear = (self.time * 2.0 + s.radius * 3.0).sin() * 0.15 * (self.progress * PI).sin();
        Vec3::new(-base.y * vortex, base.x * vortex, 0.0) * fade + Vec3::splat(smear * 0.4 * fade)
    }

    /// Relief target with its pulse and slow drift layered on top.
    pub fn relief_target(&self, relief: Vec3, base: Vec3) -> Vec3 {
        let (t, m) = (self.time, self.progress);
        let pulse_z = (t * 4.5 + base.x * 3.0 + base.y * 2.0).sin() * 0.8 * m;
        let t1 = (t * 0.6 + base.x * 1.3 + base.y * 0.7).sin() * 0.12;
        let t2 = (t * 0.8 + base.y * 1.0 + base.z * 0.5).cos() * 0.10;
        let t3 = (t * 0.5 + base.z * 0.9 + base.x * 0.4).sin() * 0.14;
        let drift = m * 0.22;
        relief + Vec3::new(t1 * drift, t2 * drift, pulse_z + t3 * drift * 1.4)
    }

    /// Full relief-style composition for one point.
    ///
    /// Without a ready relief the target is the primary point itself, so the
    /// sphere keeps animating and only the overlay layers move.
    pub fn compose_relief(
        &self,
        primary: Vec3,
        base: Vec3,
        s: &Spherical,
        relief: Option<Vec3>,
    ) -> Vec3 {
        let target = match relief {
            Some(r) if self.progress > 0.001 => self.relief_target(r, base),
            _ => primary,
        };
        let mut p = blend(primary, target, self.progress);
        if self.cloud_lock < 1.0 {
            p += self.swirl(base, s);
        }
        if self.exiting {
            p += self.explosion(base);
        }
        p
    }

    /// Point `index` of `count` on the stereo wave line.
    ///
    /// The line runs along X; its amplitude lands on Z and the grain and dust
    /// scatter on Y so it reads as a flat ribbon after the sphere's X tilt.
    pub fn wave_line_point(&self, index: usize, count: usize, noise: &mut dyn NoiseSource) -> Vec3 {
        let t = self.time;
        let u = if count > 0 {
            index as f32 / count as f32
        } else {
            0.0
        };
        let breath = 0.9 + 0.1 * (t * 0.6).sin();
        let phase = u * TAU + t * WAVE_LINE_SPEED + self.side * WAVE_LINE_STEREO_PHASE;

        let mut x = (u - 0.5) * WAVE_LINE_WIDTH;
        let base_y = phase.sin() * WAVE_LINE_HEIGHT * breath;

        // clean at the centre, dusty toward both ends
        let edge = ((u - 0.5).abs() * 2.0).min(1.0);
        let dust = edge * edge;
        let mut y = base_y * (0.5 + 0.5 * (1.0 - dust));
        let mut z = 0.0;

        let grain = (t * 4.0 + u * 35.0 + self.side * 2.3).sin() * 0.02 + noise.signed() * 0.003;
        let dust_amt = 0.9 * dust;
        x += grain * 0.4 + noise.signed() * 0.3 * dust_amt;
        y += grain * 0.9 + noise.signed() * 0.8 * dust_amt;
        z += grain * 0.2 + noise.signed() * 0.6 * dust_amt;

        Vec3::new(x, z, y)
    }

    /// Full wave-line-style composition for one point.
    pub fn compose_wave_line(&self, primary: Vec3, target: Option<Vec3>, base: Vec3) -> Vec3 {
        let mut p = match target {
            Some(w) => blend(primary, w, self.progress),
            None => primary,
        };
        if self.exiting {
            p += self.explosion(base);
        }
        p
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::noise::Silence;

    #[test]
    fn blend_endpoints_are_exact() {
        let a = Vec3::new(1.0, 2.0, 3.0);
        let b = Vec3::new(-4.0, 0.5, 9.0);
        assert_eq!(blend(a, b, 0.0), a);
        assert_eq!(blend(a, b, 1.0), b);
        assert_eq!(blend(a, b, -2.0), a);
        assert_eq!(blend(a, b, 7.0), b);
        assert_eq!(blend(a, b, f32::NAN), a);
        let mid = blend(a, b, 0.25);
        assert!((mid - (a + (b - a) * 0.25)).length() < 1e-5);
    }

    #[test]
    fn clamp_keeps_inner_points_and_pulls_back_outer_ones() {
        let p = Vec3::new(3.0, 4.0, 0.0);
        assert_eq!(clamp_displacement(p, 10.0), p);
        let q = clamp_displacement(p * 10.0, 10.0);
        assert!((q.length() - 10.0).abs() < 1e-4);
        assert_eq!(clamp_displacement(Vec3::NAN, 10.0), Vec3::ZERO);
    }

    #[test]
    fn settled_relief_morph_outputs_the_target() {
        let f = MorphFrame::new(2.3, 1.0, true, false, 1.0);
        let base = Vec3::new(0.4, -1.1, 1.2);
        let s = Spherical::from_point(base);
        let relief = Vec3::new(3.0, -2.0, 7.5);
        let out = f.compose_relief(Vec3::ONE, base, &s, Some(relief));
        assert_eq!(out, f.relief_target(relief, base));
    }

    #[test]
    fn explosion_only_while_exiting_and_vanishes_at_both_ends() {
        let base = Vec3::new(1.0, 0.0, 0.0);
        assert_eq!(MorphFrame::new(0.0, 0.5, false, false, 1.0).explosion(base), Vec3::ZERO);
        let mid = MorphFrame::new(0.0, 0.5, false, true, 1.0).explosion(base);
        assert!((mid.x - EXPLOSION_RADIAL).abs() < 1e-5);
        assert!((mid.z - EXPLOSION_SHOCK_Z).abs() < 1e-5);
        let end = MorphFrame::new(0.0, 1.0, false, true, 1.0).explosion(base);
        assert!(end.length() < 1e-5);
    }

    #[test]
    fn wave_line_spans_its_width_and_is_silent_without_noise() {
        let f = MorphFrame::new(0.0, 1.0, true, false, -1.0);
        let first = f.wave_line_point(0, 100, &mut Silence);
        let mid = f.wave_line_point(50, 100, &mut Silence);
        assert!((first.x + WAVE_LINE_WIDTH * 0.5).abs() < 0.02);
        assert!(mid.x.abs() < 0.02);
        assert!(mid.z.abs() <= WAVE_LINE_HEIGHT + 0.03);
        assert!(f.wave_line_point(0, 0, &mut Silence).is_finite());
    }

    #[test]
    fn stereo_sides_are_phase_shifted() {
        let l = MorphFrame::new(0.4, 1.0, true, false, -1.0).wave_line_point(30, 100, &mut Silence);
        let r = MorphFrame::new(0.4, 1.0, true, false, 1.0).wave_line_point(30, 100, &mut Silence);
        assert!((l.z - r.z).abs() > 1e-3);
    }
}
