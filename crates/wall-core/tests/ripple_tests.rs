// Image-plane ripple: terms, bounds and plane updates.

use glam::Vec2;
use rand::{rngs::StdRng, SeedableRng};
use wall_core::ripple::{ripple_terms, PlaneLayout};
use wall_core::{ImagePlane, ProjectKind, RippleDrive, ViewportProfile};

#[test]
fn centre_displacement_is_bounded() {
    let amp = 0.08;
    for (freq, bpm) in ProjectKind::ALL.map(ProjectKind::hover) {
        for i in 0..200 {
            let drive = RippleDrive::new(i as f32 * 0.05, freq, bpm, amp);
            let terms = ripple_terms(Vec2::splat(0.5), &drive);
            assert_eq!(terms.cone, 0.0);
            assert_eq!(terms.edge, 0.0);
            assert!(terms.total().abs() <= 0.35 + amp + 1e-6);
        }
    }
}

fn close(actual: f32, expected: f32) {
    assert!((actual - expected).abs() < 2e-5, "{actual} != {expected}");
}

#[test]
fn terms_match_reference_values() {
    // freqNorm = 450/900, bpmNorm = 110/120
    let drive = RippleDrive::new(1.1, 450.0, 110.0, 0.08);
    close(drive.freq_norm, 0.5);
    close(drive.bpm_norm, 0.916_666_7);

    // r = 0.3606, inside the edge radius
    let inner = ripple_terms(Vec2::new(0.8, 0.3), &drive);
    close(inner.cone, 0.600_462_4);
    close(inner.center, -0.085_954_3);
    assert_eq!(inner.edge, 0.0);
    close(inner.pulse, -0.009_455_5);
    close(inner.total(), 0.505_052_6);

    // r = 0.6021, past it
    let outer = ripple_terms(Vec2::new(0.05, 0.1), &drive);
    close(outer.cone, 0.775_938_0);
    close(outer.center, 0.048_216_9);
    close(outer.edge, 0.006_355_0);
    close(outer.pulse, -0.005_884_1);
    close(outer.total(), 0.824_625_8);
}

#[test]
fn edge_term_only_appears_past_its_start_radius() {
    let drive = RippleDrive::new(1.3, 450.0, 110.0, 0.08);
    assert_eq!(ripple_terms(Vec2::new(0.5, 0.9), &drive).edge, 0.0);
    let corner = ripple_terms(Vec2::ZERO, &drive);
    assert!(corner.edge.abs() > 0.0);
    assert!(corner.cone > 0.8);
}

#[test]
fn unhovered_drive_runs_at_the_default_rate() {
    let drive = RippleDrive::new(0.0, 0.0, 0.0, 0.05);
    assert_eq!(drive.freq_norm, 0.0);
    assert_eq!(drive.bpm_norm, 1.0);
}

#[test]
fn update_writes_ripple_into_z_and_marks_dirty() {
    let profile = ViewportProfile::default();
    let mut rng = StdRng::seed_from_u64(3);
    let layout = PlaneLayout::random(0, profile.plane_spread, &mut rng);
    let mut plane = ImagePlane::new(640, 480, layout, &profile);
    plane.take_dirty();
    plane.update(&RippleDrive::new(0.7, 900.0, 70.0, profile.plane_pulse_amplitude));
    assert!(plane.take_dirty());
    assert_eq!(plane.positions().len(), plane.mesh().len());
    for (p, b) in plane.positions().iter().zip(plane.mesh().base()) {
        assert_eq!(p.x, b.x);
        assert_eq!(p.y, b.y);
        assert!(p.z.is_finite());
    }
}

#[test]
fn project_names_map_to_hover_presets() {
    assert_eq!(ProjectKind::from_name("sound"), Some(ProjectKind::Sound));
    assert_eq!(ProjectKind::Sound.hover(), (180.0, 160.0));
    assert_eq!(ProjectKind::from_name("video"), None);
}
