use wall_core::{Mode, MorphStyle, ShapeState, SmoothingClock};

#[test]
fn home_target_is_reached_within_two_percent_after_200_frames() {
    let target = MorphStyle::ImageRelief.shape_target(Mode::Home);
    let start = ShapeState::default();
    let mut s = start;
    for _ in 0..200 {
        s.step(&target, SmoothingClock::PerFrame, 1.0 / 60.0);
    }
    let pairs = [
        (start.freq_r, s.freq_r, target.freq_r),
        (start.freq_a, s.freq_a, target.freq_a),
        (start.amplitude, s.amplitude, target.amplitude),
        (start.scale, s.scale, target.scale),
    ];
    for (v0, v, t) in pairs {
        assert!((v - t).abs() <= 0.02 * (v0 - t).abs(), "{v} vs {t}");
    }
}

#[test]
fn distance_to_target_follows_the_geometric_law() {
    let target = MorphStyle::WaveLine.shape_target(Mode::Works);
    let mut s = ShapeState::default();
    let d0 = (s.freq_r - target.freq_r).abs();
    let mut prev = d0;
    for n in 1..=120 {
        s.step(&target, SmoothingClock::PerFrame, 0.0);
        let d = (s.freq_r - target.freq_r).abs();
        let expected = d0 * 0.98f32.powi(n);
        assert!((d - expected).abs() < 1e-4, "frame {n}: {d} vs {expected}");
        // monotone and never crosses the target
        assert!(d <= prev);
        assert!((s.freq_r - target.freq_r).signum() == (5.0f32 - target.freq_r).signum());
        prev = d;
    }
}

#[test]
fn normalized_clock_is_frame_rate_independent() {
    let target = MorphStyle::ImageRelief.shape_target(Mode::Contacts);
    let clock = SmoothingClock::normalized();
    let mut at60 = ShapeState::default();
    let mut at120 = ShapeState::default();
    for _ in 0..60 {
        at60.step(&target, clock, 1.0 / 60.0);
    }
    for _ in 0..120 {
        at120.step(&target, clock, 1.0 / 120.0);
    }
    assert!((at60.freq_r - at120.freq_r).abs() < 1e-3);
    assert!((at60.scale - at120.scale).abs() < 1e-3);
}
