// Morph composition driven through a whole scene.

use glam::Vec3;
use image::{Rgba, RgbaImage};
use wall_core::morph::{blend, MorphFrame};
use wall_core::{
    Mode, MorphStyle, NoiseKind, NoiseSource, ReliefSource, Scene, SceneConfig, SceneInput,
    Silence, ViewportProfile,
};

fn gradient(width: u32, height: u32) -> RgbaImage {
    RgbaImage::from_fn(width, height, |x, y| {
        let r = (x * 255 / width.max(1)) as u8;
        let g = (y * 255 / height.max(1)) as u8;
        Rgba([r, g, 128, 255])
    })
}

fn scene(style: MorphStyle) -> Scene {
    let mut config = SceneConfig::new(style, ViewportProfile::default().with_sphere_segments(12));
    config.noise = NoiseKind::Silent;
    let mut scene = Scene::new(config);
    scene.finish_intro();
    scene
}

fn contacts() -> SceneInput {
    SceneInput {
        mode: Mode::Contacts,
        started: true,
        ..SceneInput::default()
    }
}

#[test]
fn blend_is_exact_at_both_ends() {
    let a = Vec3::new(0.3, -1.2, 4.0);
    let b = Vec3::new(7.0, 0.1, -2.5);
    assert_eq!(blend(a, b, 0.0), a);
    assert_eq!(blend(a, b, 1.0), b);
    assert_eq!(blend(a, b, -3.0), a);
    assert_eq!(blend(a, b, f32::NAN), a);
    let mid = blend(a, b, 0.5);
    assert!((mid - (a + b) * 0.5).length() < 1e-6);
}

#[test]
fn relief_morph_settles_within_54_frames() {
    let mut scene = scene(MorphStyle::ImageRelief);
    scene.set_relief_image(ReliefSource::new(gradient(16, 12)));
    let dt = 1.0 / 60.0;
    let input = contacts();
    for n in 1..=54 {
        scene.frame(n as f32 * dt, dt, &input);
    }
    for s in scene.spheres() {
        assert!(s.morph_progress() >= 0.99, "{}", s.morph_progress());
    }
    assert!(scene.relief().is_some());
}

#[test]
fn settled_relief_points_equal_the_relief_target() {
    let mut scene = scene(MorphStyle::ImageRelief);
    scene.set_relief_image(ReliefSource::new(gradient(16, 12)));
    let dt = 1.0 / 60.0;
    let input = contacts();
    let mut t = 0.0;
    for _ in 0..80 {
        t += dt;
        scene.frame(t, dt, &input);
    }
    let relief = scene.relief().expect("relief built in contacts");
    let base = scene.mesh().base();
    for s in scene.spheres() {
        assert_eq!(s.morph_progress(), 1.0);
        let frame = MorphFrame::new(t, 1.0, true, false, s.side());
        for (i, p) in s.positions().iter().enumerate() {
            let expected = frame.relief_target(relief.points()[i], base[i]);
            assert_eq!(*p, expected, "point {i}");
        }
    }
}

#[test]
fn missing_relief_keeps_the_sphere_animating() {
    let mut scene = scene(MorphStyle::ImageRelief);
    scene.set_relief_image(ReliefSource::decode(&[]));
    let input = contacts();
    for n in 1..=30 {
        scene.frame(n as f32 / 60.0, 1.0 / 60.0, &input);
    }
    assert!(scene.relief().is_none());
    for s in scene.spheres() {
        assert!(s.positions().iter().all(|p| p.is_finite()));
        assert!(s.positions().iter().any(|p| p.length() > 0.1));
    }
}

#[test]
fn leaving_contacts_plays_the_exit_and_clears_it() {
    let mut scene = scene(MorphStyle::WaveLine);
    let dt = 1.0 / 60.0;
    let mut t = 0.0;
    for _ in 0..60 {
        t += dt;
        scene.frame(t, dt, &contacts());
    }
    let home = SceneInput {
        started: true,
        ..SceneInput::default()
    };
    t += dt;
    scene.frame(t, dt, &home);
    assert!(scene.spheres()[0].is_exiting());
    for _ in 0..60 {
        t += dt;
        scene.frame(t, dt, &home);
    }
    for s in scene.spheres() {
        assert!(!s.is_exiting());
        assert_eq!(s.morph_progress(), 0.0);
    }
}

#[test]
fn settled_wave_line_matches_the_line_target() {
    let mut scene = scene(MorphStyle::WaveLine);
    let input = SceneInput {
        morph_progress: Some(1.0),
        ..contacts()
    };
    let t = 2.0;
    scene.frame(t, 1.0 / 60.0, &input);
    let count = scene.mesh().len();
    for s in scene.spheres() {
        let frame = MorphFrame::new(t, 1.0, true, false, s.side());
        let mut quiet = Silence;
        for (i, p) in s.positions().iter().enumerate() {
            let expected = frame.wave_line_point(i, count, &mut quiet as &mut dyn NoiseSource);
            assert_eq!(*p, expected);
        }
        // both lines meet in the middle
        assert_eq!(s.transform().position, Vec3::ZERO);
    }
}
