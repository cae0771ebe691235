// Relief sampling against small synthetic images.

use glam::Vec2;
use image::{Rgba, RgbaImage};
use wall_core::relief::{generate_relief, sample_depth};
use wall_core::{MeshPointSet, ReliefCache, ReliefParams, ReliefSource, WallError};

fn checker(width: u32, height: u32) -> RgbaImage {
    RgbaImage::from_fn(width, height, |x, y| {
        if (x + y) % 2 == 0 {
            Rgba([255, 255, 255, 255])
        } else {
            Rgba([20, 40, 60, 255])
        }
    })
}

#[test]
fn generation_is_bit_identical_across_runs() {
    let image = checker(9, 7);
    let mesh = MeshPointSet::uv_sphere(2.0, 16, 16);
    let params = ReliefParams::default();
    let a = generate_relief(&image, mesh.uvs(), &params);
    let b = generate_relief(&image, mesh.uvs(), &params);
    assert_eq!(a.len(), mesh.len());
    for (p, q) in a.iter().zip(&b) {
        assert_eq!(p.to_array().map(f32::to_bits), q.to_array().map(f32::to_bits));
    }
}

#[test]
fn depth_stays_inside_the_configured_range() {
    let image = checker(5, 5);
    let params = ReliefParams::default();
    for i in 0..=20 {
        for j in 0..=20 {
            let uv = Vec2::new(i as f32 / 20.0, j as f32 / 20.0);
            let d = sample_depth(&image, uv, &params);
            assert!(d >= params.min_depth && d <= params.max_depth, "{uv}: {d}");
        }
    }
}

#[test]
fn black_image_sits_at_the_minimum_depth() {
    let image = RgbaImage::from_pixel(4, 4, Rgba([0, 0, 0, 255]));
    let params = ReliefParams::default();
    let d = sample_depth(&image, Vec2::new(0.5, 0.5), &params);
    assert_eq!(d, params.min_depth);
}

#[test]
fn xy_spans_the_relief_plane() {
    let image = checker(3, 3);
    let params = ReliefParams::default();
    let uvs = [Vec2::ZERO, Vec2::ONE, Vec2::splat(0.5)];
    let pts = generate_relief(&image, &uvs, &params);
    assert_eq!(pts[0].x, -params.plane_width * 0.5);
    assert_eq!(pts[1].y, params.plane_height * 0.5);
    assert_eq!(pts[2].x, 0.0);
    assert_eq!(pts[2].y, 0.0);
}

#[test]
fn cache_reuses_fields_for_the_same_inputs() {
    let source = ReliefSource::new(checker(4, 4)).unwrap();
    let mesh = MeshPointSet::uv_sphere(2.0, 8, 8);
    let params = ReliefParams::default();
    let mut cache = ReliefCache::new();
    let a = cache.get_or_build(&source, &mesh, &params);
    let b = cache.get_or_build(&source, &mesh, &params);
    assert!(std::rc::Rc::ptr_eq(&a, &b));
    assert_eq!(cache.len(), 1);
    assert!(a.matches(&source, &mesh));

    let other = MeshPointSet::uv_sphere(2.0, 10, 10);
    let c = cache.get_or_build(&source, &other, &params);
    assert_eq!(c.points().len(), other.len());
    assert_eq!(cache.len(), 2);
}

#[test]
fn bad_assets_are_reported() {
    assert!(matches!(ReliefSource::decode(&[]), Err(WallError::EmptyAsset)));
    assert!(matches!(
        ReliefSource::decode(b"not an image"),
        Err(WallError::Decode(_))
    ));
    assert!(matches!(
        ReliefSource::new(RgbaImage::new(0, 3)),
        Err(WallError::ZeroSizedImage { .. })
    ));
}
