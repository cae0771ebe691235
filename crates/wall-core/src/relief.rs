//! Photo relief: a per-point heightmap sampled from an RGBA image.
//!
//! Every rest point is mapped to its UV on the image. Brightness and local
//! contrast decide how far the point stands out of a flat plane, so the
//! picture reads as a bas-relief once the sphere has morphed into it.

use crate::constants::{
    RELIEF_CACHE_CAPACITY, RELIEF_CONTRAST_BOOST, RELIEF_EDGE_SHARPNESS, RELIEF_EDGE_WEIGHT,
    RELIEF_LUMINANCE_WEIGHT, RELIEF_MAX_DEPTH, RELIEF_MIN_DEPTH, RELIEF_PLANE_SIZE,
};
use crate::error::{Result, WallError};
use crate::mesh::MeshPointSet;
use fnv::FnvHasher;
use glam::{Vec2, Vec3};
use image::imageops::{self, FilterType};
use image::RgbaImage;
use std::borrow::Cow;
use std::hash::{Hash, Hasher};
use std::rc::Rc;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ReliefParams {
    pub plane_width: f32,
    pub plane_height: f32,
    pub min_depth: f32,
    pub max_depth: f32,
    pub contrast_boost: f32,
    /// Exponent on luminance. 1 keeps the raw value.
    pub luminance_power: f32,
    pub edge_sharpness: f32,
    pub luminance_weight: f32,
    pub edge_weight: f32,
}

impl Default for ReliefParams {
    fn default() -> Self {
        Self {
            plane_width: RELIEF_PLANE_SIZE,
            plane_height: RELIEF_PLANE_SIZE,
            min_depth: RELIEF_MIN_DEPTH,
            max_depth: RELIEF_MAX_DEPTH,
            contrast_boost: RELIEF_CONTRAST_BOOST,
            luminance_power: 1.0,
            edge_sharpness: RELIEF_EDGE_SHARPNESS,
            luminance_weight: RELIEF_LUMINANCE_WEIGHT,
            edge_weight: RELIEF_EDGE_WEIGHT,
        }
    }
}

impl ReliefParams {
    fn fingerprint(&self, hasher: &mut FnvHasher) {
        [
            self.plane_width,
            self.plane_height,
            self.min_depth,
            self.max_depth,
            self.contrast_boost,
            self.luminance_power,
            self.edge_sharpness,
            self.luminance_weight,
            self.edge_weight,
        ]
        .map(f32::to_bits)
        .hash(hasher);
    }
}

/// A decoded image plus a content fingerprint used as cache key.
#[derive(Clone, Debug)]
pub struct ReliefSource {
    image: RgbaImage,
    fingerprint: u64,
}

impl ReliefSource {
    pub fn new(image: RgbaImage) -> Result<Self> {
        let (width, height) = image.dimensions();
        if width == 0 || height == 0 {
            return Err(WallError::ZeroSizedImage { width, height });
        }
        let mut hasher = FnvHasher::default();
        (width, height).hash(&mut hasher);
        image.as_raw().hash(&mut hasher);
        Ok(Self {
            image,
            fingerprint: hasher.finish(),
        })
    }

    /// Decode any format the `image` crate was built with into RGBA8.
    pub fn decode(bytes: &[u8]) -> Result<Self> {
        Self::new(decode_rgba(bytes)?)
    }

    #[inline]
    pub fn image(&self) -> &RgbaImage {
        &self.image
    }

    #[inline]
    pub fn fingerprint(&self) -> u64 {
        self.fingerprint
    }
}

pub fn decode_rgba(bytes: &[u8]) -> Result<RgbaImage> {
    if bytes.is_empty() {
        return Err(WallError::EmptyAsset);
    }
    let img = image::load_from_memory(bytes)?.to_rgba8();
    let (width, height) = img.dimensions();
    if width == 0 || height == 0 {
        return Err(WallError::ZeroSizedImage { width, height });
    }
    Ok(img)
}

/// Size that fits `width` x `height` inside `max_dim` on both axes keeping the
/// aspect ratio, or `None` when it already fits.
pub fn fitted_size(width: u32, height: u32, max_dim: u32) -> Option<(u32, u32)> {
    let max_dim = max_dim.max(1);
    if width <= max_dim && height <= max_dim {
        return None;
    }
    let scale = max_dim as f64 / width.max(height) as f64;
    let fit = |v: u32| ((v as f64 * scale).round() as u32).clamp(1, max_dim);
    Some((fit(width), fit(height)))
}

/// Downscale an image that exceeds the texture size limit; smaller images are
/// borrowed as they are.
pub fn fit_within(image: &RgbaImage, max_dim: u32) -> Cow<'_, RgbaImage> {
    let (width, height) = image.dimensions();
    match fitted_size(width, height, max_dim) {
        None => Cow::Borrowed(image),
        Some((w, h)) => {
            log::info!("downscaling {width}x{height} image to {w}x{h}");
            Cow::Owned(imageops::resize(image, w, h, FilterType::Triangle))
        }
    }
}

/// Red channel in [0, 1] at pixel (x, y), or 0 outside the image.
#[inline]
fn red_at(image: &RgbaImage, x: i64, y: i64) -> f32 {
    let (w, h) = image.dimensions();
    if x < 0 || y < 0 || x >= w as i64 || y >= h as i64 {
        return 0.0;
    }
    image.get_pixel(x as u32, y as u32)[0] as f32 / 255.0
}

/// Height in [min_depth, max_depth] for one UV.
pub fn sample_depth(image: &RgbaImage, uv: Vec2, params: &ReliefParams) -> f32 {
    let (w, h) = image.dimensions();
    let px = ((uv.x * w as f32).floor() as i64).clamp(0, w as i64 - 1);
    let py = (((1.0 - uv.y) * h as f32).floor() as i64).clamp(0, h as i64 - 1);
    let [r, g, b, _] = image.get_pixel(px as u32, py as u32).0;
    let (r, g, b) = (r as f32 / 255.0, g as f32 / 255.0, b as f32 / 255.0);

    let lum = (0.299 * r + 0.587 * g + 0.114 * b).powf(params.luminance_power);
    let edge = (red_at(image, px + 1, py) - red_at(image, px - 1, py)).abs()
        + (red_at(image, px, py - 1) - red_at(image, px, py + 1)).abs();
    let edge = (edge * params.contrast_boost).min(1.0);

    let importance = (lum * params.luminance_weight + edge * params.edge_weight)
        .powf(params.edge_sharpness)
        .clamp(0.0, 1.0);
    params.min_depth * (1.0 - importance) + params.max_depth * importance
}

/// Relief position for every UV, in the same order.
pub fn generate_relief(image: &RgbaImage, uvs: &[Vec2], params: &ReliefParams) -> Vec<Vec3> {
    uvs.iter()
        .map(|&uv| {
            Vec3::new(
                (uv.x - 0.5) * params.plane_width,
                (uv.y - 0.5) * params.plane_height,
                sample_depth(image, uv, params),
            )
        })
        .collect()
}

/// A generated relief bound to the image and mesh layout it came from.
#[derive(Debug)]
pub struct ReliefField {
    points: Vec<Vec3>,
    fingerprint: u64,
    topology_id: u64,
}

impl ReliefField {
    pub fn build(source: &ReliefSource, mesh: &MeshPointSet, params: &ReliefParams) -> Self {
        Self {
            points: generate_relief(source.image(), mesh.uvs(), params),
            fingerprint: source.fingerprint(),
            topology_id: mesh.topology_id(),
        }
    }

    #[inline]
    pub fn points(&self) -> &[Vec3] {
        &self.points
    }

    #[inline]
    pub fn get(&self, index: usize) -> Option<Vec3> {
        self.points.get(index).copied()
    }

    /// True when this field was generated for exactly this image and layout.
    #[inline]
    pub fn matches(&self, source: &ReliefSource, mesh: &MeshPointSet) -> bool {
        self.fingerprint == source.fingerprint()
            && self.topology_id == mesh.topology_id()
            && self.points.len() == mesh.len()
    }
}

/// Reliefs keyed by (image, layout, parameters). Holds the most recently used
/// few; older fields are dropped once the capacity is reached.
#[derive(Debug)]
pub struct ReliefCache {
    entries: Vec<(u64, Rc<ReliefField>)>,
    capacity: usize,
}

impl Default for ReliefCache {
    fn default() -> Self {
        Self::with_capacity(RELIEF_CACHE_CAPACITY)
    }
}

impl ReliefCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: Vec::new(),
            capacity: capacity.max(1),
        }
    }

    fn key(source: &ReliefSource, mesh: &MeshPointSet, params: &ReliefParams) -> u64 {
        let mut hasher = FnvHasher::default();
        source.fingerprint().hash(&mut hasher);
        mesh.topology_id().hash(&mut hasher);
        params.fingerprint(&mut hasher);
        hasher.finish()
    }

    pub fn get_or_build(
        &mut self,
        source: &ReliefSource,
        mesh: &MeshPointSet,
        params: &ReliefParams,
    ) -> Rc<ReliefField> {
        let key = Self::key(source, mesh, params);
        if let Some(i) = self.entries.iter().position(|(k, _)| *k == key) {
            // most recent last
            let entry = self.entries.remove(i);
            let field = entry.1.clone();
            self.entries.push(entry);
            return field;
        }
        log::info!("building relief for {} points", mesh.len());
        let field = Rc::new(ReliefField::build(source, mesh, params));
        if self.entries.len() >= self.capacity {
            self.entries.remove(0);
        }
        self.entries.push((key, field.clone()));
        field
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
