//! Time-based eased tweens for split and morph progress.

use crate::constants::{EXIT_CLEAR_THRESHOLD, MORPH_DURATION_SEC};
use std::f32::consts::PI;

/// Cosine ease-in-out on [0, 1].
#[inline]
pub fn ease_cosine(x: f32) -> f32 {
    0.5 - 0.5 * (PI * x.clamp(0.0, 1.0)).cos()
}

/// A scalar that eases from its current value to a target over a fixed duration.
///
/// Retargeting mid-flight restarts the clock from the current value instead of
/// snapping back to the start.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Tween {
    from: f32,
    to: f32,
    elapsed: f32,
    duration: f32,
    value: f32,
}

impl Tween {
    pub fn settled(value: f32, duration: f32) -> Self {
        Self {
            from: value,
            to: value,
            elapsed: duration,
            duration: duration.max(f32::EPSILON),
            value,
        }
    }

    pub fn retarget(&mut self, to: f32) {
        if to == self.to {
            return;
        }
        self.from = self.value;
        self.to = to;
        self.elapsed = 0.0;
    }

    /// Move to `value` and ease from there toward the unchanged target.
    pub fn jump(&mut self, value: f32) {
        self.from = value;
        self.value = value;
        self.elapsed = if value == self.to { self.duration } else { 0.0 };
    }

    pub fn advance(&mut self, dt_sec: f32) -> f32 {
        if dt_sec.is_finite() && dt_sec > 0.0 {
            self.elapsed = (self.elapsed + dt_sec).min(self.duration);
        }
        let p = self.elapsed / self.duration;
        self.value = if p >= 1.0 {
            self.to
        } else {
            self.from + (self.to - self.from) * ease_cosine(p)
        };
        self.value
    }

    #[inline]
    pub fn value(&self) -> f32 {
        self.value
    }

    #[inline]
    pub fn target(&self) -> f32 {
        self.to
    }

    #[inline]
    pub fn is_settled(&self) -> bool {
        self.elapsed >= self.duration
    }
}

/// Morph progress of one sphere plus the one-shot `exiting` flag.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MorphTracker {
    tween: Tween,
    active: bool,
    exiting: bool,
}

impl Default for MorphTracker {
    fn default() -> Self {
        Self::new(MORPH_DURATION_SEC)
    }
}

impl MorphTracker {
    pub fn new(duration: f32) -> Self {
        Self {
            tween: Tween::settled(0.0, duration),
            active: false,
            exiting: false,
        }
    }

    /// Called every frame with whether the morph mode is the current mode.
    pub fn set_active(&mut self, active: bool) {
        if active == self.active {
            return;
        }
        self.active = active;
        if active {
            self.exiting = false;
            self.tween.retarget(1.0);
        } else {
            self.exiting = true;
            self.tween.retarget(0.0);
        }
    }

    pub fn advance(&mut self, dt_sec: f32) -> f32 {
        let k = self.tween.advance(dt_sec);
        self.clear_exit(k);
        k
    }

    /// Take the progress from an external driver instead of the internal tween.
    /// Once the driver lets go, [`advance`](Self::advance) eases on from `k`
    /// toward the target of the current mode.
    pub fn follow(&mut self, progress: f32) -> f32 {
        let k = if progress.is_finite() {
            progress.clamp(0.0, 1.0)
        } else {
            0.0
        };
        self.tween.jump(k);
        self.clear_exit(k);
        k
    }

    fn clear_exit(&mut self, k: f32) {
        if self.exiting && !self.active && k < EXIT_CLEAR_THRESHOLD {
            self.exiting = false;
        }
    }

    #[inline]
    pub fn progress(&self) -> f32 {
        self.tween.value()
    }

    #[inline]
    pub fn is_active(&self) -> bool {
        self.active
    }

    #[inline]
    pub fn is_exiting(&self) -> bool {
        self.exiting
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ease_hits_endpoints_and_midpoint() {
        assert_eq!(ease_cosine(0.0), 0.0);
        assert!((ease_cosine(0.5) - 0.5).abs() < 1e-6);
        assert!((ease_cosine(1.0) - 1.0).abs() < 1e-6);
        assert_eq!(ease_cosine(-3.0), 0.0);
    }

    #[test]
    fn tween_reaches_target_after_duration() {
        let mut t = Tween::settled(0.0, 1.5);
        t.retarget(1.0);
        for _ in 0..89 {
            t.advance(1.0 / 60.0);
        }
        assert!(t.value() < 1.0);
        t.advance(1.0);
        assert_eq!(t.value(), 1.0);
        assert!(t.is_settled());
    }

    #[test]
    fn retarget_mid_flight_continues_from_current_value() {
        let mut t = Tween::settled(0.0, 1.0);
        t.retarget(1.0);
        let mid = t.advance(0.5);
        t.retarget(0.0);
        let next = t.advance(0.0);
        assert!((next - mid).abs() < 1e-6);
    }

    #[test]
    fn exiting_flag_lifecycle() {
        let mut m = MorphTracker::default();
        m.set_active(true);
        for _ in 0..60 {
            m.advance(1.0 / 60.0);
        }
        assert!(!m.is_exiting());
        m.set_active(false);
        assert!(m.is_exiting());
        m.advance(1.0 / 60.0);
        assert!(m.is_exiting());
        for _ in 0..60 {
            m.advance(1.0 / 60.0);
        }
        assert!(!m.is_exiting());
        assert_eq!(m.progress(), 0.0);
    }

    #[test]
    fn external_progress_still_drives_the_exit_flag() {
        let mut m = MorphTracker::default();
        m.set_active(true);
        assert_eq!(m.follow(1.0), 1.0);
        m.set_active(false);
        assert!(m.is_exiting());
        m.follow(0.4);
        assert!(m.is_exiting());
        m.follow(0.001);
        assert!(!m.is_exiting());
        assert_eq!(m.follow(f32::NAN), 0.0);
    }

    #[test]
    fn released_external_progress_resumes_toward_the_mode_target() {
        let mut m = MorphTracker::default();
        m.set_active(true);
        for _ in 0..5 {
            m.follow(0.5);
        }
        let next = m.advance(1.0 / 60.0);
        assert!(next > 0.5 && next < 0.51, "next = {next}");
        for _ in 0..240 {
            m.advance(1.0 / 60.0);
        }
        assert_eq!(m.progress(), 1.0);

        m.set_active(false);
        m.follow(0.3);
        for _ in 0..240 {
            m.advance(1.0 / 60.0);
        }
        assert_eq!(m.progress(), 0.0);
        assert!(!m.is_exiting());
    }

    #[test]
    fn jump_keeps_the_target() {
        let mut t = Tween::settled(0.0, 1.0);
        t.retarget(1.0);
        t.jump(0.25);
        assert_eq!(t.target(), 1.0);
        assert!(!t.is_settled());
        assert_eq!(t.advance(0.0), 0.25);
        t.jump(1.0);
        assert!(t.is_settled());
    }

    #[test]
    fn re_entering_cancels_the_exit() {
        let mut m = MorphTracker::default();
        m.set_active(true);
        m.advance(1.0);
        m.set_active(false);
        m.advance(0.1);
        m.set_active(true);
        assert!(!m.is_exiting());
    }
}
