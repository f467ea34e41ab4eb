//! Seeded offsets and fractal Perlin sampling.
//!
//! The coherent noise is Perlin over a fixed permutation table, remapped to
//! `[0, 1]`. The seed never reseeds the table; it only picks the
//! [`NoiseOffsets`] added to every sample coordinate, so one seed always gives
//! the same terrain no matter which chunk is built first or on which thread.

use noise::{NoiseFn, Perlin};
use rand::prelude::*;

use crate::config::FractalParams;

/// Offsets are drawn from `[-OFFSET_RANGE, OFFSET_RANGE]`.
pub const OFFSET_RANGE: i32 = 100_000;

/// Permutation seed for the coherent noise table. Fixed so the sampler has no
/// state that depends on the run.
const PERMUTATION_SEED: u32 = 0;

/// Per-run coordinate offsets derived from the terrain seed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NoiseOffsets {
    pub x: i32,
    pub z: i32,
}

impl NoiseOffsets {
    /// Derive the offsets for `seed`. X is drawn first, then Z.
    pub fn derive(seed: u64) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        let x = rng.gen_range(-OFFSET_RANGE..=OFFSET_RANGE);
        let z = rng.gen_range(-OFFSET_RANGE..=OFFSET_RANGE);
        Self { x, z }
    }
}

/// Derive the run's noise offsets from `seed`.
pub fn derive_offsets(seed: u64) -> NoiseOffsets {
    NoiseOffsets::derive(seed)
}

/// Stateless fractal noise evaluator. Safe to share across threads.
#[derive(Debug, Clone)]
pub struct NoiseSampler {
    perlin: Perlin,
}

impl Default for NoiseSampler {
    fn default() -> Self {
        Self::new()
    }
}

impl NoiseSampler {
    pub fn new() -> Self {
        Self {
            perlin: Perlin::new(PERMUTATION_SEED),
        }
    }

    /// Smooth 2D noise in `[0, 1]`.
    #[inline]
    pub fn coherent(&self, x: f64, z: f64) -> f64 {
        ((self.perlin.get([x, z]) + 1.0) * 0.5).clamp(0.0, 1.0)
    }

    /// Octave-summed noise at `(world_x, world_z)` shifted by `offsets`.
    ///
    /// Octave `o` samples at frequency `lacunarity^o` and weight
    /// `persistence^o`. The sum is not normalized, so with `persistence = 0.5`
    /// the result approaches `[0, 2)` as octaves grow.
    pub fn sample(
        &self,
        world_x: f64,
        world_z: f64,
        params: &FractalParams,
        offsets: NoiseOffsets,
    ) -> f64 {
        let base_x = (world_x + offsets.x as f64) / params.perlin_scale;
        let base_z = (world_z + offsets.z as f64) / params.perlin_scale;

        let mut value = 0.0;
        for o in 0..params.octaves {
            let frequency = params.lacunarity.powi(o as i32);
            let amplitude = params.persistence.powi(o as i32);
            value += self.coherent(base_x * frequency, base_z * frequency) * amplitude;
        }
        value
    }
}
