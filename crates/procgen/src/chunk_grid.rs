//! Centered grid of terrain chunks.
//!
//! **Full regeneration:** every call to [`TerrainGenerator::generate`] derives
//! the noise offsets once, builds the whole grid, and only then replaces the
//! previous chunk set. A rejected config leaves the old grid in place.

use std::ops::Range;
use std::time::Instant;

use glam::{IVec2, IVec3, Vec3};
use rayon::prelude::*;

use crate::config::TerrainConfig;
use crate::error::{Result, TerrainError};
use crate::heightfield::build_vertex_grid;
use crate::host::{ChunkHost, ChunkSpawn};
use crate::mesh::MeshRecord;
use crate::modulation::{modulate, Brush};
use crate::noise_sampler::{NoiseOffsets, NoiseSampler};

/// One generated terrain chunk.
#[derive(Debug, Clone, PartialEq)]
pub struct Chunk {
    /// Grid coordinates (x, z).
    pub coord: IVec2,
    pub name: String,
    /// World position of the mesh origin, local to the terrain root.
    pub position: Vec3,
    pub mesh: MeshRecord,
}

/// `Chunk_{x}_{z}`.
pub fn chunk_name(coord: IVec2) -> String {
    format!("Chunk_{}_{}", coord.x, coord.y)
}

/// Centered coordinate range for `count` chunks: `[-count/2, count - count/2)`.
pub fn chunk_range(count: i32) -> Range<i32> {
    -(count / 2)..(count - count / 2)
}

/// Every chunk coordinate of the grid, `z` outer and `x` inner.
pub fn chunk_coords(grid_size: IVec3) -> Vec<IVec2> {
    chunk_range(grid_size.z)
        .flat_map(|z| chunk_range(grid_size.x).map(move |x| IVec2::new(x, z)))
        .collect()
}

/// World offset of the chunk at `coord`.
pub fn chunk_offset(config: &TerrainConfig, coord: IVec2) -> Vec3 {
    Vec3::new(
        coord.x as f32 * config.x_pos_offset,
        0.0,
        coord.y as f32 * config.z_pos_offset,
    )
}

/// Build one chunk. The config must already be validated.
pub fn build_chunk(
    config: &TerrainConfig,
    sampler: &NoiseSampler,
    offsets: NoiseOffsets,
    coord: IVec2,
) -> Chunk {
    let position = chunk_offset(config, coord);
    let field = build_vertex_grid(config, sampler, position, offsets);
    let chunk = Chunk {
        coord,
        name: chunk_name(coord),
        position,
        mesh: MeshRecord::assemble(field),
    };
    log::debug!(
        "Built {} at {:?} ({} verts)",
        chunk.name,
        chunk.position,
        chunk.mesh.vertices().len()
    );
    chunk
}

/// Owns the current chunk set and rebuilds it on request.
#[derive(Debug, Default)]
pub struct TerrainGenerator {
    sampler: NoiseSampler,
    config: Option<TerrainConfig>,
    offsets: Option<NoiseOffsets>,
    chunks: Vec<Chunk>,
}

impl TerrainGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild the whole grid for `config`, replacing any previous chunks.
    pub fn generate(&mut self, config: &TerrainConfig) -> Result<&[Chunk]> {
        self.regenerate(config, false)
    }

    /// Like [`generate`](Self::generate) but builds chunks on the rayon pool.
    /// The resulting chunk order and contents are identical.
    pub fn generate_parallel(&mut self, config: &TerrainConfig) -> Result<&[Chunk]> {
        self.regenerate(config, true)
    }

    fn regenerate(&mut self, config: &TerrainConfig, parallel: bool) -> Result<&[Chunk]> {
        config.validate()?;

        let started = Instant::now();
        let offsets = NoiseOffsets::derive(config.seed);
        let coords = chunk_coords(config.grid_size);
        let sampler = &self.sampler;

        let chunks: Vec<Chunk> = if parallel {
            coords
                .par_iter()
                .map(|&coord| build_chunk(config, sampler, offsets, coord))
                .collect()
        } else {
            coords
                .iter()
                .map(|&coord| build_chunk(config, sampler, offsets, coord))
                .collect()
        };

        log::info!(
            "Generated {} terrain chunks ({}x{}, seed {}, offsets {:?}) in {:.1?}",
            chunks.len(),
            config.grid_size.x,
            config.grid_size.z,
            config.seed,
            offsets,
            started.elapsed()
        );

        self.clear();
        self.config = Some(config.clone());
        self.offsets = Some(offsets);
        self.chunks = chunks;
        Ok(&self.chunks)
    }

    /// Discard every generated chunk.
    pub fn clear(&mut self) {
        if !self.chunks.is_empty() {
            log::debug!("Clearing {} terrain chunks", self.chunks.len());
        }
        self.chunks.clear();
        self.config = None;
        self.offsets = None;
    }

    pub fn chunks(&self) -> &[Chunk] {
        &self.chunks
    }

    pub fn chunk(&self, coord: IVec2) -> Option<&Chunk> {
        self.chunks.iter().find(|c| c.coord == coord)
    }

    pub fn chunk_mut(&mut self, coord: IVec2) -> Option<&mut Chunk> {
        self.chunks.iter_mut().find(|c| c.coord == coord)
    }

    /// Config of the current grid, if one has been generated.
    pub fn config(&self) -> Option<&TerrainConfig> {
        self.config.as_ref()
    }

    /// Noise offsets of the current grid.
    pub fn offsets(&self) -> Option<NoiseOffsets> {
        self.offsets
    }

    /// Hand the current chunk set to `host`, replacing whatever it showed before.
    /// Handles are returned in chunk order.
    pub fn spawn_into<H: ChunkHost>(&self, host: &mut H) -> Vec<H::Handle> {
        host.clear_chunks();
        let (material, layers) = match &self.config {
            Some(config) => (config.material.as_str(), config.layers.as_slice()),
            None => return Vec::new(),
        };

        self.chunks
            .iter()
            .map(|chunk| {
                let handle = host.spawn_chunk(ChunkSpawn {
                    coord: chunk.coord,
                    name: &chunk.name,
                    position: chunk.position,
                    mesh: &chunk.mesh,
                    material,
                    layers,
                });
                host.register_collider(handle, &chunk.mesh);
                handle
            })
            .collect()
    }

    /// Apply `brush` at `world_position` to the chunk at `coord`.
    pub fn modulate_at(&mut self, coord: IVec2, world_position: Vec3, brush: Brush) -> Result<usize> {
        let chunk = self.chunk_mut(coord).ok_or(TerrainError::MissingMesh)?;
        let origin = chunk.position;
        modulate(
            Some(&mut chunk.mesh),
            origin,
            world_position,
            brush.height,
            brush.radius,
        )
    }
}
