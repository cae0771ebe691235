use thiserror::Error;

/// Failures surfaced by the engine.
///
/// None of these are fatal at runtime: the scene logs them and skips the
/// affected visual (a plane or the relief morph) while the spheres keep running.
#[derive(Debug, Error)]
pub enum WallError {
    #[error("asset is empty")]
    EmptyAsset,
    #[error("image has zero size ({width}x{height})")]
    ZeroSizedImage { width: u32, height: u32 },
    #[error("failed to decode image: {0}")]
    Decode(#[from] image::ImageError),
    #[error("unknown mode index {0}")]
    UnknownMode(u8),
    #[error("mesh attribute length mismatch: {points} points, {uvs} uvs")]
    AttributeMismatch { points: usize, uvs: usize },
}

pub type Result<T> = std::result::Result<T, WallError>;
