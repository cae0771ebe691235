use glam::{Vec2, Vec3};
use wall_core::deform::{deform_point, WaveField};
use wall_core::{HoverState, MeshPointSet, ShapeState, Spherical};

fn close(actual: f32, expected: f32) {
    assert!((actual - expected).abs() < 2e-5, "{actual} != {expected}");
}

#[test]
fn wave_matches_reference_values() {
    let base = Vec3::new(1.0, 0.5, 1.5);
    let s = Spherical::from_point(base);
    close(s.radius, 1.870_828_7);
    close(s.azimuth, 0.463_647_6);
    close(s.polar, 0.640_522_3);
    let field = WaveField {
        freq_r: 5.0,
        freq_a: 3.0,
        amplitude: 0.4,
        time: 0.7,
        freq_mod: 1.3,
        pulse: 0.1,
        base_radius: 2.0,
    };
    // [sin(5*r*1.3 - 0.84) * cos(3*az*1.3 + 0.56) * cos(3*polar*1.3 - 0.42)
    //  + sin(1.75 + 5r) * 0.05] * 0.4
    close(field.wave(&s), -0.151_650_77);
    // 2 + 4 * wave + pulse
    close(field.displaced_radius(&s), 1.493_396_9);
    let p = deform_point(base, &s, &field, 0.0);
    close(p.length(), 1.493_396_9);
}

#[test]
fn hover_sets_frequency_multiplier_and_pulse_rate() {
    let hover = HoverState {
        frequency: 100.0,
        bpm: 90.0,
    };
    let field = WaveField::new(&ShapeState::default(), &hover, 0.7);
    close(field.freq_mod, 1.3);
    // sin(0.7 * 90/60 * 2pi) * 0.15
    close(field.pulse, 0.046_352_55);
    assert_eq!(field.base_radius, 2.0);
}

#[test]
fn pole_at_the_origin_stays_finite_and_bounded() {
    let mesh = MeshPointSet::from_points(vec![Vec3::ZERO], vec![Vec2::ZERO], vec![]).unwrap();
    let s = mesh.spherical()[0];
    assert_eq!(s.inv_radius, 0.0);
    let shape = ShapeState {
        freq_r: 20.0,
        freq_a: 1.0,
        amplitude: 0.9,
        scale: 1.0,
    };
    let hover = HoverState {
        frequency: 900.0,
        bpm: 160.0,
    };
    for i in 0..100 {
        let f = WaveField::new(&shape, &hover, i as f32 * 0.37);
        let p = deform_point(Vec3::ZERO, &s, &f, 1.0);
        assert!(p.is_finite());
        assert!(p.length() < 0.1);
    }
}

#[test]
fn kernel_is_finite_over_a_dense_sphere_and_extreme_state() {
    let mesh = MeshPointSet::uv_sphere(2.0, 40, 40);
    let shape = ShapeState {
        freq_r: 20.0,
        freq_a: 6.0,
        amplitude: 0.9,
        scale: 8.0,
    };
    let hover = HoverState {
        frequency: 1.0e4,
        bpm: 1.0e3,
    };
    let f = WaveField::new(&shape, &hover, 1234.5);
    for (b, s) in mesh.base().iter().zip(mesh.spherical()) {
        let p = deform_point(*b, s, &f, 1.0);
        assert!(p.is_finite());
        // |wave| <= 1.05 * amp, so the radius is bounded
        assert!(p.length() <= 2.0 + 4.0 * 1.05 * 0.9 + 0.15 + 0.05);
    }
}
