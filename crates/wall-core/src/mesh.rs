//! Immutable rest geometry: base points, UVs and precomputed spherical coordinates.

use crate::constants::INV_R_EPSILON;
use crate::error::{Result, WallError};
use fnv::FnvHasher;
use glam::{Vec2, Vec3};
use std::f32::consts::{PI, TAU};
use std::hash::{Hash, Hasher};

/// Radius, azimuth and polar angle of a rest point, computed once.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Spherical {
    pub radius: f32,
    /// `1 / radius`, or 0 for points within `INV_R_EPSILON` of the origin.
    pub inv_radius: f32,
    /// `atan2(y, x)`
    pub azimuth: f32,
    /// `acos(z / r)`; a degenerate point gets `acos(0) = PI / 2`.
    pub polar: f32,
}

impl Spherical {
    pub fn from_point(p: Vec3) -> Self {
        let radius = p.length();
        let inv_radius = if radius > INV_R_EPSILON {
            1.0 / radius
        } else {
            0.0
        };
        Self {
            radius,
            inv_radius,
            azimuth: p.y.atan2(p.x),
            polar: (p.z * inv_radius).clamp(-1.0, 1.0).acos(),
        }
    }
}

/// Ordered rest points of a sphere or plane.
///
/// Nothing here changes after construction; animation writes into a separate
/// buffer of the same length.
#[derive(Clone, Debug)]
pub struct MeshPointSet {
    base: Vec<Vec3>,
    uvs: Vec<Vec2>,
    spherical: Vec<Spherical>,
    indices: Vec<u32>,
    topology_id: u64,
}

impl MeshPointSet {
    /// Build from explicit points and UVs. Triangle indices are optional.
    pub fn from_points(base: Vec<Vec3>, uvs: Vec<Vec2>, indices: Vec<u32>) -> Result<Self> {
        if base.len() != uvs.len() {
            return Err(WallError::AttributeMismatch {
                points: base.len(),
                uvs: uvs.len(),
            });
        }
        let mut hasher = FnvHasher::default();
        "points".hash(&mut hasher);
        for (p, uv) in base.iter().zip(&uvs) {
            p.to_array().map(f32::to_bits).hash(&mut hasher);
            uv.to_array().map(f32::to_bits).hash(&mut hasher);
        }
        Ok(Self::assemble(base, uvs, indices, hasher.finish()))
    }

    /// UV sphere with the vertex order and UV layout of a classic
    /// latitude/longitude tessellation: rows from the +Y pole down, u wrapping
    /// around the Y axis, v = 1 at the top.
    pub fn uv_sphere(radius: f32, width_segments: u32, height_segments: u32) -> Self {
        let ws = width_segments.max(3);
        let hs = height_segments.max(2);
        let count = ((ws + 1) * (hs + 1)) as usize;
        let mut base = Vec::with_capacity(count);
        let mut uvs = Vec::with_capacity(count);
        for iy in 0..=hs {
            let v = iy as f32 / hs as f32;
            // pole rows shift u by half a segment so the fan samples the centre of each cell
            let u_offset = if iy == 0 {
                0.5 / ws as f32
            } else if iy == hs {
                -0.5 / ws as f32
            } else {
                0.0
            };
            let (sin_v, cos_v) = (v * PI).sin_cos();
            for ix in 0..=ws {
                let u = ix as f32 / ws as f32;
                let (sin_u, cos_u) = (u * TAU).sin_cos();
                base.push(Vec3::new(
                    -radius * cos_u * sin_v,
                    radius * cos_v,
                    radius * sin_u * sin_v,
                ));
                uvs.push(Vec2::new(u + u_offset, 1.0 - v));
            }
        }
        let topology_id = topology_hash("sphere", radius, ws, hs);
        Self::assemble(base, uvs, Vec::new(), topology_id)
    }

    /// Flat grid in the XY plane centred on the origin, with triangle indices.
    /// Row 0 is the top edge (`y = height / 2`, v = 1).
    pub fn plane(width: f32, height: f32, width_segments: u32, height_segments: u32) -> Self {
        let gx = width_segments.max(1);
        let gy = height_segments.max(1);
        let seg_w = width / gx as f32;
        let seg_h = height / gy as f32;
        let count = ((gx + 1) * (gy + 1)) as usize;
        let mut base = Vec::with_capacity(count);
        let mut uvs = Vec::with_capacity(count);
        for iy in 0..=gy {
            let y = iy as f32 * seg_h - height * 0.5;
            for ix in 0..=gx {
                let x = ix as f32 * seg_w - width * 0.5;
                base.push(Vec3::new(x, -y, 0.0));
                uvs.push(Vec2::new(ix as f32 / gx as f32, 1.0 - iy as f32 / gy as f32));
            }
        }
        let row = gx + 1;
        let mut indices = Vec::with_capacity((gx * gy * 6) as usize);
        for iy in 0..gy {
            for ix in 0..gx {
                let a = ix + row * iy;
                let b = ix + row * (iy + 1);
                let c = ix + 1 + row * (iy + 1);
                let d = ix + 1 + row * iy;
                indices.extend_from_slice(&[a, b, d, b, c, d]);
            }
        }
        let mut hasher = FnvHasher::default();
        "plane".hash(&mut hasher);
        width.to_bits().hash(&mut hasher);
        height.to_bits().hash(&mut hasher);
        (gx, gy).hash(&mut hasher);
        Self::assemble(base, uvs, indices, hasher.finish())
    }

    fn assemble(base: Vec<Vec3>, uvs: Vec<Vec2>, indices: Vec<u32>, topology_id: u64) -> Self {
        let spherical = base.iter().copied().map(Spherical::from_point).collect();
        Self {
            base,
            uvs,
            spherical,
            indices,
            topology_id,
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.base.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.base.is_empty()
    }

    #[inline]
    pub fn base(&self) -> &[Vec3] {
        &self.base
    }

    #[inline]
    pub fn uvs(&self) -> &[Vec2] {
        &self.uvs
    }

    #[inline]
    pub fn spherical(&self) -> &[Spherical] {
        &self.spherical
    }

    #[inline]
    pub fn indices(&self) -> &[u32] {
        &self.indices
    }

    /// Stable identifier of the vertex layout; changes whenever the sampled
    /// points or their order would change.
    #[inline]
    pub fn topology_id(&self) -> u64 {
        self.topology_id
    }
}

fn topology_hash(kind: &str, radius: f32, a: u32, b: u32) -> u64 {
    let mut hasher = FnvHasher::default();
    kind.hash(&mut hasher);
    radius.to_bits().hash(&mut hasher);
    (a, b).hash(&mut hasher);
    hasher.finish()
}
