//! Per-frame orchestration of the two spheres and the floating image planes.
//!
//! A [`Scene`] owns everything that animates: the shared rest mesh, the
//! smoothed hover state, one [`SphereInstance`] per side, the relief and the
//! planes. Front-ends feed it a [`SceneInput`] once per display frame and read
//! back dirty-flagged position buffers and transforms.

use crate::asset::AssetSlot;
use crate::constants::{
    INTRO_GROW_SEC, INTRO_SCALE, MAX_DISPLACEMENT, MORPH_ACTIVE_EPSILON, POINT_COLOR,
    RELIEF_PULSE_SCALE, RELIEF_ROLL_Z, SCENE_TIME_WRAP_SEC,
};
use crate::deform::{deform_point, liquid_offset, split_chaos_gain, WaveField};
use crate::error::WallError;
use crate::mesh::MeshPointSet;
use crate::mode::{Mode, MorphStyle};
use crate::morph::{clamp_displacement, MorphFrame};
use crate::noise::{NoiseKind, NoiseSource};
use crate::relief::{ReliefCache, ReliefField, ReliefParams, ReliefSource};
use crate::ripple::{ImagePlane, PlaneLayout, RippleDrive};
use crate::smoothing::{HoverState, ShapeState, SmoothingClock};
use crate::transform::Transform;
use crate::transition::{ease_cosine, MorphTracker};
use crate::viewport::ViewportProfile;
use glam::Vec3;
use rand::{rngs::StdRng, SeedableRng};
use smallvec::SmallVec;
use std::f32::consts::FRAC_PI_2;
use std::rc::Rc;

/// Seconds since start folded into the scene clock, so the `f32` time fed to
/// the kernels keeps sub-millisecond resolution in long sessions.
#[inline]
pub fn scene_time(elapsed_sec: f64) -> f32 {
    elapsed_sec.max(0.0).rem_euclid(SCENE_TIME_WRAP_SEC) as f32
}

/// What the UI hands the scene every frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SceneInput {
    pub mode: Mode,
    /// 0 when nothing is hovered.
    pub hover_frequency: f32,
    pub hover_bpm: f32,
    /// Already eased split tween value in [0, 1].
    pub split_progress: f32,
    /// External morph progress; `None` lets each sphere run its own tween.
    pub morph_progress: Option<f32>,
    /// Set once the visitor has interacted; releases the intro latch.
    pub started: bool,
}

impl Default for SceneInput {
    fn default() -> Self {
        Self {
            mode: Mode::Home,
            hover_frequency: 0.0,
            hover_bpm: 0.0,
            split_progress: 0.0,
            morph_progress: None,
            started: false,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct SceneConfig {
    pub style: MorphStyle,
    pub profile: ViewportProfile,
    pub clock: SmoothingClock,
    pub relief: ReliefParams,
    pub noise: NoiseKind,
    pub max_displacement: f32,
    /// Seed for plane heights and phases.
    pub layout_seed: u64,
    /// Base RGB of the left and right sphere.
    pub sphere_colors: [[f32; 3]; 2],
}

impl SceneConfig {
    pub fn new(style: MorphStyle, profile: ViewportProfile) -> Self {
        Self {
            style,
            profile,
            clock: SmoothingClock::default(),
            relief: ReliefParams::default(),
            noise: NoiseKind::default(),
            max_displacement: MAX_DISPLACEMENT,
            layout_seed: 7,
            sphere_colors: [POINT_COLOR; 2],
        }
    }
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self::new(MorphStyle::default(), ViewportProfile::default())
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum IntroPhase {
    /// Small, bobbing, waiting for the first interaction.
    Waiting,
    /// Growing toward full size; carries the eased progress.
    Growing(f32),
    Done,
}

/// One-way intro state: waiting, then a timed grow, then done for good.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct IntroLatch {
    grow_start: Option<f32>,
    done: bool,
}

impl IntroLatch {
    pub fn advance(&mut self, started: bool, time: f32) -> IntroPhase {
        if self.done {
            return IntroPhase::Done;
        }
        if !started {
            return IntroPhase::Waiting;
        }
        let mut start = *self.grow_start.get_or_insert(time);
        if time < start {
            // scene clock wrapped while growing
            start = time;
            self.grow_start = Some(time);
        }
        let p = ((time - start) / INTRO_GROW_SEC).clamp(0.0, 1.0);
        if p >= 1.0 {
            self.done = true;
            log::debug!("intro finished");
            return IntroPhase::Done;
        }
        IntroPhase::Growing(ease_cosine(p))
    }

    /// Jump straight to the settled state.
    pub fn finish(&mut self) {
        self.done = true;
    }

    #[inline]
    pub fn is_done(&self) -> bool {
        self.done
    }
}

impl IntroPhase {
    fn scale(self, full: f32) -> f32 {
        match self {
            IntroPhase::Waiting => INTRO_SCALE,
            IntroPhase::Growing(e) => INTRO_SCALE + (full - INTRO_SCALE) * e,
            IntroPhase::Done => full,
        }
    }
}

/// One animated point cloud with its own shape and morph state.
pub struct SphereInstance {
    side: f32,
    color: [f32; 3],
    relief_tint: f32,
    shape: ShapeState,
    morph: MorphTracker,
    noise: Box<dyn NoiseSource>,
    positions: Vec<Vec3>,
    transform: Transform,
    dirty: bool,
}

impl SphereInstance {
    fn new(
        side: f32,
        color: [f32; 3],
        mesh: &MeshPointSet,
        style: MorphStyle,
        noise: Box<dyn NoiseSource>,
    ) -> Self {
        Self {
            side,
            color,
            relief_tint: 0.0,
            shape: ShapeState::default(),
            morph: MorphTracker::default(),
            noise,
            positions: mesh.base().to_vec(),
            transform: Transform {
                rotation: Vec3::new(style.rest_tilt(), 0.0, 0.0),
                ..Transform::default()
            },
            dirty: true,
        }
    }

    /// -1 for the left sphere, 1 for the right.
    #[inline]
    pub fn side(&self) -> f32 {
        self.side
    }

    #[inline]
    pub fn color(&self) -> [f32; 3] {
        self.color
    }

    /// How much the relief image colours the points, 0 while no relief is
    /// built; follows the morph progress otherwise.
    #[inline]
    pub fn relief_tint(&self) -> f32 {
        self.relief_tint
    }

    #[inline]
    pub fn shape(&self) -> &ShapeState {
        &self.shape
    }

    #[inline]
    pub fn morph_progress(&self) -> f32 {
        self.morph.progress()
    }

    #[inline]
    pub fn is_exiting(&self) -> bool {
        self.morph.is_exiting()
    }

    #[inline]
    pub fn positions(&self) -> &[Vec3] {
        &self.positions
    }

    #[inline]
    pub fn transform(&self) -> &Transform {
        &self.transform
    }

    /// Read and clear the upload flag.
    #[inline]
    pub fn take_dirty(&mut self) -> bool {
        std::mem::replace(&mut self.dirty, false)
    }
}

/// Identifies a plane across asynchronous loads; a new hover invalidates the
/// ids handed out for the previous one.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct PlaneId {
    pub generation: u32,
    pub index: u16,
}

struct PlaneSlot {
    id: PlaneId,
    plane: AssetSlot<ImagePlane>,
}

pub type PlaneIds = SmallVec<[PlaneId; 4]>;

pub struct Scene {
    config: SceneConfig,
    mesh: Rc<MeshPointSet>,
    hover: HoverState,
    intro: IntroLatch,
    spheres: [SphereInstance; 2],
    relief_source: AssetSlot<ReliefSource>,
    relief_cache: ReliefCache,
    relief: Option<Rc<ReliefField>>,
    planes: SmallVec<[PlaneSlot; 4]>,
    plane_generation: u32,
    layout_rng: StdRng,
    time: f32,
}

impl Scene {
    pub fn new(config: SceneConfig) -> Self {
        let mesh = Rc::new(Self::sphere_mesh(&config));
        let [left, right] = config.sphere_colors;
        let spheres = [
            SphereInstance::new(-1.0, left, &mesh, config.style, config.noise.build(0)),
            SphereInstance::new(1.0, right, &mesh, config.style, config.noise.build(1)),
        ];
        log::info!(
            "scene: {:?} style, {} points per sphere",
            config.style,
            mesh.len()
        );
        Self {
            layout_rng: StdRng::seed_from_u64(config.layout_seed),
            config,
            mesh,
            hover: HoverState::default(),
            intro: IntroLatch::default(),
            spheres,
            relief_source: AssetSlot::Pending,
            relief_cache: ReliefCache::new(),
            relief: None,
            planes: SmallVec::new(),
            plane_generation: 0,
            time: 0.0,
        }
    }

    fn sphere_mesh(config: &SceneConfig) -> MeshPointSet {
        let seg = config.profile.sphere_segments;
        MeshPointSet::uv_sphere(config.style.mesh_radius(), seg, seg)
    }

    #[inline]
    pub fn config(&self) -> &SceneConfig {
        &self.config
    }

    #[inline]
    pub fn mesh(&self) -> &Rc<MeshPointSet> {
        &self.mesh
    }

    #[inline]
    pub fn hover(&self) -> &HoverState {
        &self.hover
    }

    #[inline]
    pub fn intro(&self) -> &IntroLatch {
        &self.intro
    }

    /// Skip the intro; spheres render at full size from the next frame.
    pub fn finish_intro(&mut self) {
        self.intro.finish();
    }

    #[inline]
    pub fn spheres(&self) -> &[SphereInstance; 2] {
        &self.spheres
    }

    #[inline]
    pub fn spheres_mut(&mut self) -> &mut [SphereInstance; 2] {
        &mut self.spheres
    }

    #[inline]
    pub fn relief(&self) -> Option<&ReliefField> {
        self.relief.as_deref()
    }

    /// The decoded relief image, once it has loaded.
    #[inline]
    pub fn relief_source(&self) -> Option<&ReliefSource> {
        self.relief_source.ready()
    }

    /// Switch layouts (desktop/mobile). Rebuilds the rest mesh when the
    /// tessellation changes and drops planes sized for the old layout.
    pub fn set_profile(&mut self, profile: ViewportProfile) {
        if profile == self.config.profile {
            return;
        }
        let retessellate = profile.sphere_segments != self.config.profile.sphere_segments;
        self.config.profile = profile;
        if retessellate {
            self.mesh = Rc::new(Self::sphere_mesh(&self.config));
            for s in &mut self.spheres {
                s.positions = self.mesh.base().to_vec();
                s.dirty = true;
            }
            self.relief = None;
        }
        self.clear_planes();
    }

    /// Hand over the relief image once it has loaded (or failed to).
    pub fn set_relief_image(&mut self, result: Result<ReliefSource, WallError>) {
        self.relief_source.resolve("relief image", result);
        self.relief = None;
        self.relief_cache.clear();
    }

    /// Start a new plane set for `count` images. Returns the ids to resolve as
    /// each image finishes loading; on mobile only the first few are kept.
    pub fn show_planes(&mut self, count: usize) -> PlaneIds {
        self.clear_planes();
        let count = match self.config.profile.max_planes {
            Some(max) => count.min(max),
            None => count,
        };
        let generation = self.plane_generation;
        let ids: PlaneIds = (0..count.min(u16::MAX as usize))
            .map(|i| PlaneId {
                generation,
                index: i as u16,
            })
            .collect();
        self.planes.extend(ids.iter().map(|&id| PlaneSlot {
            id,
            plane: AssetSlot::Pending,
        }));
        log::debug!("queued {} planes (generation {generation})", ids.len());
        ids
    }

    /// Settle a queued plane with the pixel size of its image. Returns false
    /// for ids from an earlier plane set.
    pub fn resolve_plane(&mut self, id: PlaneId, size: Result<(u32, u32), WallError>) -> bool {
        let profile = &self.config.profile;
        let rng = &mut self.layout_rng;
        let Some(slot) = self.planes.iter_mut().find(|s| s.id == id) else {
            return false;
        };
        let plane = size.map(|(w, h)| {
            let layout = PlaneLayout::random(id.index as usize, profile.plane_spread, rng);
            ImagePlane::new(w, h, layout, profile)
        });
        slot.plane.resolve("plane image", plane);
        true
    }

    pub fn clear_planes(&mut self) {
        self.planes.clear();
        self.plane_generation = self.plane_generation.wrapping_add(1);
    }

    /// Ready planes in slot order.
    pub fn planes(&self) -> impl Iterator<Item = (PlaneId, &ImagePlane)> {
        self.planes
            .iter()
            .filter_map(|s| s.plane.ready().map(|p| (s.id, p)))
    }

    pub fn planes_mut(&mut self) -> impl Iterator<Item = (PlaneId, &mut ImagePlane)> {
        self.planes
            .iter_mut()
            .filter_map(|s| s.plane.ready_mut().map(|p| (s.id, p)))
    }

    /// Ids of the current plane set that are still loading or loaded.
    pub fn live_plane_ids(&self) -> PlaneIds {
        self.planes
            .iter()
            .filter(|s| !s.plane.is_failed())
            .map(|s| s.id)
            .collect()
    }

    #[inline]
    pub fn time(&self) -> f32 {
        self.time
    }

    /// Advance every animated buffer to time `t` (seconds, see [`scene_time`]);
    /// `dt` is the length of the frame that just elapsed.
    pub fn frame(&mut self, t: f32, dt: f32, input: &SceneInput) {
        self.time = t;
        let clock = self.config.clock;
        let style = self.config.style;
        let in_morph_mode = input.mode == Mode::Contacts;

        self.hover
            .step(input.hover_frequency, input.hover_bpm, clock, dt);
        let target = style.shape_target(input.mode);
        for s in &mut self.spheres {
            s.shape.step(&target, clock, dt);
        }

        if in_morph_mode && style == MorphStyle::ImageRelief {
            self.ensure_relief();
        }

        let intro = self.intro.advance(input.started, t);
        let split = ease_cosine(input.split_progress);
        let max_disp = self.config.max_displacement;
        let offset_x = self.config.profile.sphere_offset_x;
        let mesh = &self.mesh;
        let relief = self.relief.as_deref();
        let hover = &self.hover;

        for sphere in &mut self.spheres {
            sphere.morph.set_active(in_morph_mode);
            let k = match input.morph_progress {
                Some(k) => sphere.morph.follow(k),
                None => sphere.morph.advance(dt),
            };
            sphere.relief_tint = if relief.is_some() { k } else { 0.0 };
            let frame = MorphFrame::new(t, k, in_morph_mode, sphere.morph.is_exiting(), sphere.side);
            let field = WaveField::new(&sphere.shape, hover, t);
            match style {
                MorphStyle::ImageRelief => {
                    deform_relief_style(sphere, mesh, &field, &frame, relief, max_disp)
                }
                MorphStyle::WaveLine => deform_wave_line_style(
                    sphere,
                    mesh,
                    &field,
                    &frame,
                    input.split_progress,
                    frame.is_engaged(in_morph_mode, MORPH_ACTIVE_EPSILON),
                    max_disp,
                ),
            }
            place_sphere(
                sphere,
                style,
                &frame,
                Placement {
                    mode: input.mode,
                    intro,
                    split,
                    offset_x,
                    pulse: field.pulse,
                    engaged: frame.is_engaged(in_morph_mode, MORPH_ACTIVE_EPSILON),
                },
            );
            sphere.dirty = true;
        }

        let drive = RippleDrive::new(
            t,
            self.hover.frequency,
            self.hover.bpm,
            self.config.profile.plane_pulse_amplitude,
        );
        for (_, plane) in self.planes_mut() {
            plane.update(&drive);
        }
    }

    fn ensure_relief(&mut self) {
        let Some(source) = self.relief_source.ready() else {
            return;
        };
        if let Some(field) = &self.relief {
            if field.matches(source, &self.mesh) {
                return;
            }
        }
        self.relief = Some(
            self.relief_cache
                .get_or_build(source, &self.mesh, &self.config.relief),
        );
    }
}

fn deform_relief_style(
    sphere: &mut SphereInstance,
    mesh: &MeshPointSet,
    field: &WaveField,
    frame: &MorphFrame,
    relief: Option<&ReliefField>,
    max_disp: f32,
) {
    let jitter = frame.jitter_fade();
    let points = mesh.base().iter().zip(mesh.spherical());
    for (i, (out, (&base, s))) in sphere.positions.iter_mut().zip(points).enumerate() {
        let primary = deform_point(base, s, field, jitter);
        let target = relief.and_then(|r| r.get(i));
        *out = clamp_displacement(frame.compose_relief(primary, base, s, target), max_disp);
    }
}

fn deform_wave_line_style(
    sphere: &mut SphereInstance,
    mesh: &MeshPointSet,
    field: &WaveField,
    frame: &MorphFrame,
    split_progress: f32,
    engaged: bool,
    max_disp: f32,
) {
    let chaos = split_chaos_gain(split_progress);
    let count = mesh.len();
    let noise = sphere.noise.as_mut();
    let points = mesh.base().iter().zip(mesh.spherical());
    for (i, (out, (&base, s))) in sphere.positions.iter_mut().zip(points).enumerate() {
        let primary = (deform_point(base, s, field, 1.0)
            + liquid_offset(base, s, field.time, frame.side, noise))
            * chaos;
        let target = engaged.then(|| frame.wave_line_point(i, count, noise));
        *out = clamp_displacement(frame.compose_wave_line(primary, target, base), max_disp);
    }
}

struct Placement {
    mode: Mode,
    intro: IntroPhase,
    split: f32,
    offset_x: f32,
    pulse: f32,
    engaged: bool,
}

fn place_sphere(sphere: &mut SphereInstance, style: MorphStyle, frame: &MorphFrame, p: Placement) {
    let t = frame.time;
    let k = frame.progress;
    let side_x = sphere.side * p.offset_x;
    let tf = &mut sphere.transform;

    match style {
        MorphStyle::WaveLine => {
            if !p.engaged {
                tf.rotation = Vec3::new(style.rest_tilt(), 0.0, 0.0);
            }
            tf.scale = p.intro.scale(sphere.shape.scale);
            tf.position = if p.engaged {
                // the two lines meet in the middle while morphing
                Vec3::new(side_x * p.split * (1.0 - k), 0.0, 0.0)
            } else if p.intro != IntroPhase::Done && p.mode == Mode::Home {
                Vec3::ZERO
            } else {
                Vec3::new(side_x * p.split, 0.0, 0.0)
            };
        }
        MorphStyle::ImageRelief => {
            let tilt = style.rest_tilt();
            tf.rotation = Vec3::new(
                tilt * (1.0 - k) + (tilt + FRAC_PI_2) * k,
                0.01,
                sphere.side * RELIEF_ROLL_Z * p.split,
            );
            tf.scale = p
                .intro
                .scale(sphere.shape.scale + p.pulse * RELIEF_PULSE_SCALE);
            tf.position = Vec3::new(side_x * p.split, 0.0, 0.0);
        }
    }

    if p.intro == IntroPhase::Waiting && p.mode == Mode::Home {
        tf.position = Vec3::new(0.0, (t * 1.5).sin() * 0.05 + (t * 2.3).cos() * 0.03, 0.0);
        tf.rotation.z = (t * 0.9).sin() * 0.3;
    }
}
