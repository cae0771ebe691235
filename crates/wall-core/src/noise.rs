//! Injectable per-point randomness for grain, dust and glitch effects.

use rand::prelude::*;

pub trait NoiseSource {
    /// Uniform sample in `[-0.5, 0.5) * amplitude`.
    fn signed(&mut self) -> f32;
}

/// Deterministic noise from a seeded `StdRng`.
pub struct SeededNoise {
    rng: StdRng,
    amplitude: f32,
}

impl SeededNoise {
    pub fn new(seed: u64) -> Self {
        Self::with_amplitude(seed, 1.0)
    }

    pub fn with_amplitude(seed: u64, amplitude: f32) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            amplitude,
        }
    }
}

impl NoiseSource for SeededNoise {
    #[inline]
    fn signed(&mut self) -> f32 {
        (self.rng.gen::<f32>() - 0.5) * self.amplitude
    }
}

/// Noise source that always returns zero; used for exact replays.
#[derive(Clone, Copy, Debug, Default)]
pub struct Silence;

impl NoiseSource for Silence {
    #[inline]
    fn signed(&mut self) -> f32 {
        0.0
    }
}

/// How a scene builds the noise source of each sphere.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum NoiseKind {
    Seeded { seed: u64, amplitude: f32 },
    Silent,
}

impl Default for NoiseKind {
    fn default() -> Self {
        NoiseKind::Seeded {
            seed: 42,
            amplitude: 1.0,
        }
    }
}

impl NoiseKind {
    /// Noise source for instance `index`, with its own stream derived from the base seed.
    pub fn build(self, index: usize) -> Box<dyn NoiseSource> {
        match self {
            NoiseKind::Seeded { seed, amplitude } => {
                let mix = seed ^ (index as u64).wrapping_mul(0x9E37_79B9_7F4A_7C15);
                Box::new(SeededNoise::with_amplitude(mix, amplitude))
            }
            NoiseKind::Silent => Box::new(Silence),
        }
    }
}
