//! Procedural generation for chunked heightfield terrain.
//!
//! Seed-driven fractal noise is shaped by a remap curve, clamping and a radial
//! falloff, then assembled into one grid mesh per chunk. Generated meshes can
//! be sculpted afterwards with [`modulate`].

pub mod chunk_grid;
pub mod config;
pub mod curve;
pub mod error;
pub mod falloff;
pub mod heightfield;
pub mod host;
pub mod mesh;
pub mod modulation;
pub mod noise_sampler;

pub use chunk_grid::*;
pub use config::*;
pub use curve::*;
pub use error::TerrainError;
pub use heightfield::*;
pub use host::*;
pub use mesh::*;
pub use modulation::*;
pub use noise_sampler::*;
