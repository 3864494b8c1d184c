//! Injectable randomness
//!
//! Spawn selection, item scheduling and drop chances draw from a
//! `RandomSource` so a run can be replayed from its seed, and tests can
//! script exact sequences.

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

/// Source of uniform samples in `[0, 1)`
pub trait RandomSource {
    /// Next uniform sample in `[0, 1)`
    fn unit(&mut self) -> f32;

    /// Uniform sample in `[lo, hi)`
    fn range(&mut self, lo: f32, hi: f32) -> f32 {
        lo + self.unit() * (hi - lo)
    }

    /// Uniform integer in `[lo, hi)`
    fn range_u32(&mut self, lo: u32, hi: u32) -> u32 {
        if hi <= lo {
            return lo;
        }
        let span = hi - lo;
        lo + ((self.unit() * span as f32) as u32).min(span - 1)
    }

    /// True with probability `p`
    fn chance(&mut self, p: f32) -> bool {
        self.unit() < p
    }
}

impl RandomSource for Pcg32 {
    fn unit(&mut self) -> f32 {
        self.random::<f32>()
    }
}

/// Seeded generator used for a shooter run
pub fn seeded(seed: u64) -> Pcg32 {
    Pcg32::seed_from_u64(seed)
}

/// Replays a fixed list of samples, cycling when exhausted.
///
/// Public so hosts can pin the shooter's rolls in their own deterministic
/// tests, e.g. `ShooterSession::new(tuning, ScriptedSource::constant(0.5), sink)`.
/// Samples are clamped into `[0, 1)`; an empty list always yields 0.
#[derive(Debug, Clone)]
pub struct ScriptedSource {
    samples: Vec<f32>,
    cursor: usize,
}

impl ScriptedSource {
    pub fn new(samples: impl Into<Vec<f32>>) -> Self {
        Self {
            samples: samples.into(),
            cursor: 0,
        }
    }

    /// Always returns the same sample
    pub fn constant(sample: f32) -> Self {
        Self::new(vec![sample])
    }
}

impl RandomSource for ScriptedSource {
    fn unit(&mut self) -> f32 {
        if self.samples.is_empty() {
            return 0.0;
        }
        let sample = self.samples[self.cursor % self.samples.len()];
        self.cursor += 1;
        sample.clamp(0.0, 0.999_999)
    }
}
