// Shared tuning constants for the sphere, morph and ripple kernels.

// Smoothing rates applied once per frame (see `SmoothingClock`)
pub const FREQ_SMOOTHING: f32 = 0.02; // radial and angular frequency
pub const AMP_SMOOTHING: f32 = 0.05;
pub const SCALE_SMOOTHING: f32 = 0.04;
pub const HOVER_SMOOTHING: f32 = 0.05; // hover frequency and bpm
pub const REFERENCE_FPS: f32 = 60.0; // frame rate the per-frame rates were tuned at

// Initial shape state before any mode target has been applied
pub const INITIAL_FREQ_R: f32 = 5.0;
pub const INITIAL_FREQ_A: f32 = 7.0;
pub const INITIAL_AMPLITUDE: f32 = 0.15;
pub const INITIAL_SCALE: f32 = 1.0;

// Radial wave kernel
pub const INV_R_EPSILON: f32 = 1e-6;
pub const HOVER_FREQ_GAIN: f32 = 0.003; // freqMod = 1 + hoverFreq * gain
pub const PULSE_DEPTH: f32 = 0.15;
pub const SPHERE_BASE_RADIUS: f32 = 2.0; // displaced radius before wave and pulse
pub const WAVE_RADIAL_GAIN: f32 = 4.0;
pub const JITTER_AMPLITUDE: f32 = 0.02;
pub const JITTER_WEIGHTS: [f32; 3] = [0.4, 0.4, 0.6];

// Liquid blob layer (wave-line style)
pub const LIQUID_BASE: f32 = 1.2;
pub const SPLIT_CHAOS_START: f32 = 0.25;
pub const SPLIT_CHAOS_GAIN: f32 = 0.35;

// Morph transitions
pub const MORPH_DURATION_SEC: f32 = 0.9;
pub const SPLIT_DURATION_SEC: f32 = 1.5;
pub const MORPH_ACTIVE_EPSILON: f32 = 1e-4; // below this the secondary target is skipped
pub const EXIT_CLEAR_THRESHOLD: f32 = 0.01; // exiting flag clears under this progress
pub const EXPLOSION_RADIAL: f32 = 0.6;
pub const EXPLOSION_SHOCK_Z: f32 = 1.8;
pub const MAX_DISPLACEMENT: f32 = 36.0; // clamp on the final point radius

// Wave-line morph target
pub const WAVE_LINE_WIDTH: f32 = 3.2;
pub const WAVE_LINE_HEIGHT: f32 = 0.65;
pub const WAVE_LINE_SPEED: f32 = 2.0;
pub const WAVE_LINE_STEREO_PHASE: f32 = 1.5;

// Image relief
pub const RELIEF_PLANE_SIZE: f32 = 30.0;
pub const RELIEF_MIN_DEPTH: f32 = -8.0;
pub const RELIEF_MAX_DEPTH: f32 = 14.0;
pub const RELIEF_CONTRAST_BOOST: f32 = 1.8;
pub const RELIEF_EDGE_SHARPNESS: f32 = 2.2;
pub const RELIEF_LUMINANCE_WEIGHT: f32 = 0.7;
pub const RELIEF_EDGE_WEIGHT: f32 = 0.8;
pub const RELIEF_CACHE_CAPACITY: usize = 2; // one field per viewport class

// Image-plane ripple
pub const RIPPLE_FREQ_NORM: f32 = 900.0;
pub const RIPPLE_BPM_NORM: f32 = 120.0;
pub const RIPPLE_CENTER_AMP: f32 = 0.5;
pub const RIPPLE_CENTER_FALLOFF: f32 = 0.7;
pub const RIPPLE_EDGE_START: f32 = 0.55;
pub const RIPPLE_EDGE_AMP: f32 = 0.25;
pub const PLANE_Z: f32 = -0.25;
pub const PLANE_JITTER_Y: f32 = 1.5;

// Scene clock
pub const SCENE_TIME_WRAP_SEC: f64 = 3600.0; // absolute time wraps hourly before the f32 cast

// Intro latch
pub const INTRO_SCALE: f32 = 0.23;
pub const INTRO_GROW_SEC: f32 = 1.1;

// Sphere meshes and transforms
pub const WAVE_LINE_MESH_RADIUS: f32 = 0.5;
pub const RELIEF_MESH_RADIUS: f32 = 2.0;
pub const WAVE_LINE_TILT_X: f32 = 1.5;
pub const RELIEF_TILT_X: f32 = 1.58;
pub const RELIEF_ROLL_Z: f32 = 0.6;
pub const RELIEF_PULSE_SCALE: f32 = 0.5;

// Rendering
pub const POINT_COLOR: [f32; 3] = [1.0, 1.0, 1.0]; // base colour of both spheres
pub const POINT_SIZE: f32 = 9.0; // billboard pixels at unit view depth
pub const PLANE_OPACITY: f32 = 0.97;
pub const CLEAR_COLOR: [f64; 4] = [0.0, 0.0, 0.0, 1.0];
