//! First-order lag applied to the shape and hover parameters.
//!
//! Every tracked scalar moves toward its target by `(target - value) * k`
//! once per frame. With the default [`SmoothingClock::PerFrame`] the rate does
//! not depend on frame duration, so convergence speed follows the display's
//! refresh rate. [`SmoothingClock::Normalized`] rescales `k` by the elapsed time
//! so that a frame at `reference_fps` behaves exactly like the per-frame clock.

use crate::constants::{
    AMP_SMOOTHING, FREQ_SMOOTHING, HOVER_FREQ_GAIN, HOVER_SMOOTHING, INITIAL_AMPLITUDE,
    INITIAL_FREQ_A, INITIAL_FREQ_R, INITIAL_SCALE, PULSE_DEPTH, REFERENCE_FPS, SCALE_SMOOTHING,
};
use crate::mode::ShapeTarget;
use std::f32::consts::TAU;

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub enum SmoothingClock {
    #[default]
    PerFrame,
    Normalized { reference_fps: f32 },
}

impl SmoothingClock {
    pub fn normalized() -> Self {
        SmoothingClock::Normalized {
            reference_fps: REFERENCE_FPS,
        }
    }

    /// Effective per-step rate for a frame lasting `dt_sec`.
    #[inline]
    pub fn factor(self, k: f32, dt_sec: f32) -> f32 {
        match self {
            SmoothingClock::PerFrame => k,
            SmoothingClock::Normalized { reference_fps } => {
                let frames = (dt_sec.max(0.0) * reference_fps).min(1.0e4);
                (1.0 - (1.0 - k).powf(frames)).clamp(0.0, 1.0)
            }
        }
    }
}

/// One lag step. `k` must lie in (0, 1] for the result to stay between
/// `value` and `target`.
#[inline]
pub fn approach(value: f32, target: f32, k: f32) -> f32 {
    if !target.is_finite() {
        return value;
    }
    value + (target - value) * k
}

/// The smoothed (freqR, freqA, amplitude, scale) quadruple.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ShapeState {
    pub freq_r: f32,
    pub freq_a: f32,
    pub amplitude: f32,
    pub scale: f32,
}

impl Default for ShapeState {
    fn default() -> Self {
        Self {
            freq_r: INITIAL_FREQ_R,
            freq_a: INITIAL_FREQ_A,
            amplitude: INITIAL_AMPLITUDE,
            scale: INITIAL_SCALE,
        }
    }
}

impl ShapeState {
    pub fn step(&mut self, target: &ShapeTarget, clock: SmoothingClock, dt_sec: f32) {
        let kf = clock.factor(FREQ_SMOOTHING, dt_sec);
        self.freq_r = approach(self.freq_r, target.freq_r, kf);
        self.freq_a = approach(self.freq_a, target.freq_a, kf);
        self.amplitude = approach(
            self.amplitude,
            target.amplitude,
            clock.factor(AMP_SMOOTHING, dt_sec),
        );
        self.scale = approach(self.scale, target.scale, clock.factor(SCALE_SMOOTHING, dt_sec));
    }
}

/// Smoothed hover frequency (Hz-like units) and beats per minute.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct HoverState {
    pub frequency: f32,
    pub bpm: f32,
}

impl HoverState {
    pub fn step(&mut self, frequency: f32, bpm: f32, clock: SmoothingClock, dt_sec: f32) {
        let k = clock.factor(HOVER_SMOOTHING, dt_sec);
        self.frequency = approach(self.frequency, sanitize_rate(frequency), k);
        self.bpm = approach(self.bpm, sanitize_rate(bpm), k);
    }

    /// Multiplier applied to every angular argument of the wave field.
    #[inline]
    pub fn freq_mod(&self) -> f32 {
        1.0 + self.frequency * HOVER_FREQ_GAIN
    }

    /// Pulse cycles per second; one per second when nothing is hovered.
    #[inline]
    pub fn bpm_ratio(&self) -> f32 {
        if self.bpm > 0.0 {
            self.bpm / 60.0
        } else {
            1.0
        }
    }

    #[inline]
    pub fn pulse(&self, time: f32) -> f32 {
        (time * self.bpm_ratio() * TAU).sin() * PULSE_DEPTH
    }
}

#[inline]
fn sanitize_rate(v: f32) -> f32 {
    if v.is_finite() {
        v.max(0.0)
    } else {
        0.0
    }
}
