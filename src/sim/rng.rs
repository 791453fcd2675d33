//! Injectable randomness
//!
//! The simulation only ever asks for uniform samples in `[0, 1)`. Production
//! uses a seeded PCG stream so runs are reproducible; tests can script the
//! exact sequence to force power-up spawns and launch angles.

use std::collections::VecDeque;

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

/// Source of uniform samples in `[0, 1)`
pub trait RandomSource: std::fmt::Debug {
    fn next_unit(&mut self) -> f32;
}

/// Seeded PCG random stream
#[derive(Debug, Clone)]
pub struct SeededRandom {
    rng: Pcg32,
}

impl SeededRandom {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: Pcg32::seed_from_u64(seed),
        }
    }
}

impl RandomSource for SeededRandom {
    fn next_unit(&mut self) -> f32 {
        self.rng.random::<f32>()
    }
}

/// Replays a fixed list of samples, then repeats the fallback value
#[derive(Debug, Clone)]
pub struct ScriptedRandom {
    samples: VecDeque<f32>,
    fallback: f32,
}

impl ScriptedRandom {
    pub fn new(samples: impl IntoIterator<Item = f32>) -> Self {
        Self {
            samples: samples.into_iter().collect(),
            fallback: 0.5,
        }
    }

    /// Value returned once the scripted samples run out
    pub fn with_fallback(mut self, fallback: f32) -> Self {
        self.fallback = fallback;
        self
    }
}

impl RandomSource for ScriptedRandom {
    fn next_unit(&mut self) -> f32 {
        // Keep scripted values inside the documented range
        self.samples
            .pop_front()
            .unwrap_or(self.fallback)
            .clamp(0.0, 1.0 - f32::EPSILON)
    }
}
