pub mod asset;
pub mod camera;
pub mod constants;
pub mod controls;
pub mod deform;
pub mod error;
pub mod mesh;
pub mod mode;
pub mod morph;
pub mod noise;
pub mod relief;
pub mod ripple;
pub mod scene;
pub mod smoothing;
pub mod transform;
pub mod transition;
pub mod viewport;

#[cfg(feature = "gpu")]
pub mod gpu;

pub static POINTS_WGSL: &str = include_str!("../shaders/points.wgsl");
pub static PLANE_WGSL: &str = include_str!("../shaders/plane.wgsl");

pub use asset::AssetSlot;
pub use camera::Camera;
pub use controls::Controls;
pub use error::{Result, WallError};
pub use mesh::{MeshPointSet, Spherical};
pub use mode::{Mode, MorphStyle, ShapeTarget};
pub use noise::{NoiseKind, NoiseSource, SeededNoise, Silence};
pub use relief::{ReliefCache, ReliefField, ReliefParams, ReliefSource};
pub use ripple::{ImagePlane, ProjectKind, RippleDrive};
pub use scene::{PlaneId, PlaneIds, Scene, SceneConfig, SceneInput, SphereInstance};
pub use smoothing::{HoverState, ShapeState, SmoothingClock};
pub use transform::Transform;
pub use transition::{ease_cosine, MorphTracker, Tween};
pub use viewport::{ViewportClass, ViewportProfile};
