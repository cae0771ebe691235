//! Radial wave field that turns a rest sphere into the "cymatic" point cloud.

use crate::constants::{
    JITTER_AMPLITUDE, JITTER_WEIGHTS, LIQUID_BASE, SPHERE_BASE_RADIUS, SPLIT_CHAOS_GAIN,
    SPLIT_CHAOS_START, WAVE_RADIAL_GAIN,
};
use crate::mesh::Spherical;
use crate::noise::NoiseSource;
use crate::smoothing::{HoverState, ShapeState};
use glam::Vec3;

/// Frame-constant inputs of the wave kernel.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WaveField {
    pub freq_r: f32,
    pub freq_a: f32,
    pub amplitude: f32,
    pub time: f32,
    pub freq_mod: f32,
    pub pulse: f32,
    pub base_radius: f32,
}

impl WaveField {
    pub fn new(shape: &ShapeState, hover: &HoverState, time: f32) -> Self {
        Self {
            freq_r: shape.freq_r,
            freq_a: shape.freq_a,
            amplitude: shape.amplitude,
            time,
            freq_mod: hover.freq_mod(),
            pulse: hover.pulse(time),
            base_radius: SPHERE_BASE_RADIUS,
        }
    }

    /// Scalar wave value at a rest point.
    #[inline]
    pub fn wave(&self, s: &Spherical) -> f32 {
        let t = self.time;
        let m = self.freq_mod;
        let standing = (self.freq_r * s.radius * m - t * 1.2).sin()
            * (self.freq_a * s.azimuth * m + t * 0.8).cos()
            * (self.freq_a * s.polar * m - t * 0.6).cos();
        let shimmer = (t * 2.5 + s.radius * 5.0).sin() * 0.05;
        (standing + shimmer) * self.amplitude
    }

    /// Radius the unit direction is scaled to.
    #[inline]
    pub fn displaced_radius(&self, s: &Spherical) -> f32 {
        self.base_radius + self.wave(s) * WAVE_RADIAL_GAIN + self.pulse
    }
}

/// Low-amplitude organic jitter of a rest point; identical on all axes before weighting.
#[inline]
pub fn jitter(base: Vec3, time: f32) -> f32 {
    (time * 0.7 + base.x * 1.2 + base.y * 0.8 + base.z * 0.5).sin() * JITTER_AMPLITUDE
        + (time * 0.4 + base.x * 0.5 - base.y * 1.1 + base.z * 0.3).cos() * JITTER_AMPLITUDE
}

/// Primary deformation of one rest point.
///
/// `jitter_weight` scales the organic jitter (1 for the full effect, fading
/// toward 0 while a relief morph takes over).
#[inline]
pub fn deform_point(base: Vec3, s: &Spherical, field: &WaveField, jitter_weight: f32) -> Vec3 {
    let dir = base * s.inv_radius;
    let n = jitter(base, field.time) * jitter_weight;
    dir * field.displaced_radius(s) + Vec3::from(JITTER_WEIGHTS) * n
}

/// Liquid wobble and glitch layered on the wave-line style spheres.
///
/// `push_dir` is the sign of the sphere's side so the two spheres mirror each other.
#[inline]
pub fn liquid_offset(
    base: Vec3,
    s: &Spherical,
    time: f32,
    push_dir: f32,
    noise: &mut dyn NoiseSource,
) -> Vec3 {
    let t = time;
    let r = s.radius;
    let liquid = Vec3::new(
        (t * 2.8 + base.y * 4.5 + base.z * 3.5).sin() * LIQUID_BASE * 0.9,
        (t * 3.2 + base.x * 3.5).sin() * LIQUID_BASE * 0.7,
        (t * 3.8 + base.x * 4.0 + base.y * 2.5).cos() * LIQUID_BASE * 1.1,
    );
    let glitch = ((t * 18.0 + r * 30.0).sin() * 0.5 + 0.5) * 0.5;
    let glitch = Vec3::new(
        glitch * noise.signed() * 0.9,
        glitch * noise.signed() * 0.7,
        glitch * noise.signed() * 1.2,
    );
    let fuse = (t * 1.2 + r * 3.0).sin() * 0.4;
    Vec3::new(
        -push_dir * (liquid.x * 0.5 + glitch.x + fuse * 0.3),
        push_dir * (liquid.y * 0.4 + glitch.y + fuse * 0.2),
        push_dir * (liquid.z * 0.5 + glitch.z + fuse * 0.5),
    )
}

/// Uniform expansion applied while the spheres separate.
#[inline]
pub fn split_chaos_gain(split_progress: f32) -> f32 {
    if split_progress > SPLIT_CHAOS_START {
        let p = ((split_progress - SPLIT_CHAOS_START) / (1.0 - SPLIT_CHAOS_START)).min(1.0);
        1.0 + p.powf(1.4) * SPLIT_CHAOS_GAIN
    } else {
        1.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::noise::Silence;

    fn field(t: f32) -> WaveField {
        WaveField::new(&ShapeState::default(), &HoverState::default(), t)
    }

    #[test]
    fn zero_amplitude_gives_a_sphere_of_base_radius_plus_pulse() {
        let mut f = field(0.0);
        f.amplitude = 0.0;
        let base = Vec3::new(0.0, 0.0, 3.0);
        let s = Spherical::from_point(base);
        let p = deform_point(base, &s, &f, 0.0);
        assert!((p.length() - (SPHERE_BASE_RADIUS + f.pulse)).abs() < 1e-5);
    }

    #[test]
    fn origin_point_only_moves_by_jitter() {
        let f = field(1.3);
        let s = Spherical::from_point(Vec3::ZERO);
        let p = deform_point(Vec3::ZERO, &s, &f, 1.0);
        assert!(p.is_finite());
        assert!(p.length() <= 2.0 * JITTER_AMPLITUDE * 0.6 * 3f32.sqrt() + 1e-6);
    }

    #[test]
    fn split_chaos_is_flat_then_grows() {
        assert_eq!(split_chaos_gain(0.0), 1.0);
        assert_eq!(split_chaos_gain(0.25), 1.0);
        assert!((split_chaos_gain(1.0) - 1.35).abs() < 1e-6);
        assert!(split_chaos_gain(0.6) > 1.0 && split_chaos_gain(0.6) < 1.35);
    }

    #[test]
    fn liquid_offset_mirrors_between_sides() {
        let base = Vec3::new(0.3, -0.2, 0.1);
        let s = Spherical::from_point(base);
        let l = liquid_offset(base, &s, 0.7, -1.0, &mut Silence);
        let r = liquid_offset(base, &s, 0.7, 1.0, &mut Silence);
        assert!((l + r).length() < 1e-6);
    }
}
