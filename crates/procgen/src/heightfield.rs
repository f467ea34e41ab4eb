//! Per-chunk vertex grid: noise → curve → clamp → falloff → clamp → multiplier.
//!
//! The noise coordinate for vertex `(x, z)` is the *grid index* plus the
//! chunk's world offset, not `index * scale + offset`. With `scale != 1` the
//! sampled pattern does not line up between neighbouring chunks. That is the
//! established look of this terrain and it is reproduced as-is.

use glam::Vec3;

use crate::config::TerrainConfig;
use crate::falloff;
use crate::noise_sampler::{NoiseOffsets, NoiseSampler};

/// Vertex grid for one chunk before triangulation.
#[derive(Debug, Clone, PartialEq)]
pub struct HeightField {
    pub width: u32,
    pub depth: u32,
    /// Chunk-local positions, row-major with `z` outer: index = z·(width+1) + x.
    pub vertices: Vec<Vec3>,
    /// Shaped heights before `height_multiplier`, same order as `vertices`.
    pub raw_heights: Vec<f32>,
}

/// Apply curve, clamping and falloff to one raw noise sample.
///
/// The order is fixed: `raw *= curve(raw)`, clamp, subtract falloff at
/// `(world_x, world_z)`, clamp again. Returns the value before
/// `height_multiplier`.
pub fn shape_height(config: &TerrainConfig, raw: f32, world_x: f32, world_z: f32) -> f32 {
    let mut value = raw * config.curve.evaluate(raw);

    if config.use_clamping {
        value = value.clamp(config.min_clamp, config.max_clamp);
    }

    if config.enable_fall_off {
        value -= falloff::evaluate(world_x, world_z, config.grid_size.x, config.x_pos_offset);
        if config.use_clamping {
            value = value.clamp(config.min_clamp, config.max_clamp);
        }
    }

    value
}

/// Build the `(width+1) × (depth+1)` vertex grid for the chunk at `chunk_offset`.
///
/// The config must already be validated.
pub fn build_vertex_grid(
    config: &TerrainConfig,
    sampler: &NoiseSampler,
    chunk_offset: Vec3,
    offsets: NoiseOffsets,
) -> HeightField {
    let params = config.fractal();
    let count = config.vertices_per_chunk();
    let mut vertices = Vec::with_capacity(count);
    let mut raw_heights = Vec::with_capacity(count);

    for z in 0..=config.depth {
        for x in 0..=config.width {
            let local_x = config.scale * x as f32;
            let local_z = config.scale * z as f32;
            let world_x = chunk_offset.x + local_x;
            let world_z = chunk_offset.z + local_z;

            let raw = sampler.sample(
                x as f64 + chunk_offset.x as f64,
                z as f64 + chunk_offset.z as f64,
                &params,
                offsets,
            ) as f32;

            let shaped = shape_height(config, raw, world_x, world_z);
            raw_heights.push(shaped);
            vertices.push(Vec3::new(local_x, shaped * config.height_multiplier, local_z));
        }
    }

    HeightField {
        width: config.width,
        depth: config.depth,
        vertices,
        raw_heights,
    }
}
