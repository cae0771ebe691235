// Sanity checks on the tuning constants and their relationships.

use wall_core::constants::*;

#[test]
#[allow(clippy::assertions_on_constants)]
fn smoothing_rates_are_proper_fractions() {
    for k in [FREQ_SMOOTHING, AMP_SMOOTHING, SCALE_SMOOTHING, HOVER_SMOOTHING] {
        assert!(k > 0.0 && k <= 1.0);
    }
    assert!(REFERENCE_FPS > 0.0);
}

#[test]
#[allow(clippy::assertions_on_constants)]
fn relief_depth_range_and_weights() {
    assert!(RELIEF_MIN_DEPTH < RELIEF_MAX_DEPTH);
    assert!(RELIEF_PLANE_SIZE > 0.0);
    assert!(RELIEF_EDGE_SHARPNESS > 0.0);
    assert!(RELIEF_LUMINANCE_WEIGHT > 0.0 && RELIEF_EDGE_WEIGHT > 0.0);
}

#[test]
#[allow(clippy::assertions_on_constants)]
fn displacement_clamp_leaves_room_for_the_relief() {
    // furthest relief corner plus pulse and drift
    let half = RELIEF_PLANE_SIZE * 0.5;
    let z = RELIEF_MAX_DEPTH.max(-RELIEF_MIN_DEPTH) + 1.0;
    let far = (half * half * 2.0 + z * z).sqrt();
    assert!(far < MAX_DISPLACEMENT);
    // and for a fully displaced sphere
    assert!(SPHERE_BASE_RADIUS + WAVE_RADIAL_GAIN + PULSE_DEPTH < MAX_DISPLACEMENT);
}

#[test]
#[allow(clippy::assertions_on_constants)]
fn transition_thresholds_are_small() {
    assert!(MORPH_ACTIVE_EPSILON < EXIT_CLEAR_THRESHOLD);
    assert!(EXIT_CLEAR_THRESHOLD < 0.1);
    assert!(MORPH_DURATION_SEC > 0.0 && SPLIT_DURATION_SEC > MORPH_DURATION_SEC);
    assert!(INTRO_SCALE > 0.0 && INTRO_SCALE < 1.0);
}

#[test]
#[allow(clippy::assertions_on_constants)]
fn ripple_edge_starts_inside_the_plane() {
    assert!(RIPPLE_EDGE_START > 0.0 && RIPPLE_EDGE_START < 0.5f32.hypot(0.5));
    assert!(RIPPLE_CENTER_FALLOFF > 0.0);
    assert!(PLANE_OPACITY > 0.0 && PLANE_OPACITY <= 1.0);
}
