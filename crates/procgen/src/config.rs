//! Terrain generation parameters.

use glam::IVec3;
use serde::{Deserialize, Serialize};

use crate::curve::HeightCurve;
use crate::error::{Result, TerrainError};
use crate::falloff;
use crate::noise_sampler::OFFSET_RANGE;

/// Upper bound on `octaves`. Higher octaves add nothing visible and would
/// overflow the per-octave exponent.
pub const MAX_OCTAVES: u32 = 64;

/// Largest noise coordinate magnitude a run may reach. The Perlin lattice
/// lookup casts `floor(coord)` to an integer, so coordinates must stay well
/// inside the exactly representable `f64` range.
pub const MAX_NOISE_COORDINATE: f64 = (1u64 << 40) as f64;

/// A texture layer that starts at a normalized terrain height.
///
/// Layers are data for the host's shading; generation never reads them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Layer {
    /// Texture handle understood by the host renderer.
    pub texture: String,
    /// Normalized height (0-1) where this layer begins.
    pub start_height: f32,
}

/// Configuration for one full generation run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TerrainConfig {
    /// Seed for the noise offsets.
    pub seed: u64,
    /// Number of chunks along X and Z (`y` is ignored).
    pub grid_size: IVec3,
    /// Cells per chunk along X.
    pub width: u32,
    /// Cells per chunk along Z.
    pub depth: u32,
    /// World units per grid cell.
    pub scale: f32,
    /// Final multiplier applied to shaped noise.
    pub height_multiplier: f32,
    /// World spacing between chunk origins along X.
    pub x_pos_offset: f32,
    /// World spacing between chunk origins along Z.
    pub z_pos_offset: f32,
    /// Divisor applied to noise coordinates (higher = smoother).
    pub perlin_scale: f64,
    /// Number of octaves for fractal noise.
    pub octaves: u32,
    /// Lacunarity (frequency multiplier per octave).
    pub lacunarity: f64,
    /// Persistence (amplitude multiplier per octave).
    pub persistence: f64,
    /// Remap curve; its value at the raw sample multiplies the sample.
    pub curve: HeightCurve,
    /// Subtract a radial falloff so the grid sinks toward its edges.
    pub enable_fall_off: bool,
    /// Clamp shaped noise to `[min_clamp, max_clamp]`.
    pub use_clamping: bool,
    pub min_clamp: f32,
    pub max_clamp: f32,
    /// Material handle passed to the host with every chunk.
    pub material: String,
    /// Texture layers ordered by start height.
    pub layers: Vec<Layer>,
}

impl Default for TerrainConfig {
    fn default() -> Self {
        Self {
            seed: 0,
            grid_size: IVec3::new(4, 0, 4),
            width: 32,
            depth: 32,
            scale: 1.0,
            height_multiplier: 12.0,
            x_pos_offset: 32.0,
            z_pos_offset: 32.0,
            perlin_scale: 24.0,
            octaves: 4,
            lacunarity: 2.0,
            persistence: 0.5,
            curve: HeightCurve::default(),
            enable_fall_off: false,
            use_clamping: false,
            min_clamp: 0.0,
            max_clamp: 1.0,
            material: "terrain".to_string(),
            layers: Vec::new(),
        }
    }
}

/// Octave parameters handed to the noise sampler.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FractalParams {
    pub perlin_scale: f64,
    pub octaves: u32,
    pub lacunarity: f64,
    pub persistence: f64,
}

impl TerrainConfig {
    pub fn fractal(&self) -> FractalParams {
        FractalParams {
            perlin_scale: self.perlin_scale,
            octaves: self.octaves,
            lacunarity: self.lacunarity,
            persistence: self.persistence,
        }
    }

    /// Number of vertices in one chunk mesh.
    pub fn vertices_per_chunk(&self) -> usize {
        (self.width as usize + 1) * (self.depth as usize + 1)
    }

    /// Start heights of every layer, in order, for shader uniforms.
    pub fn layer_start_heights(&self) -> Vec<f32> {
        self.layers.iter().map(|l| l.start_height).collect()
    }

    /// Reject parameters that would build empty buffers or NaN/infinite vertices.
    pub fn validate(&self) -> Result<()> {
        if self.width == 0 {
            return Err(TerrainError::config("width", "must be at least 1"));
        }
        if self.depth == 0 {
            return Err(TerrainError::config("depth", "must be at least 1"));
        }
        if self.grid_size.x <= 0 || self.grid_size.z <= 0 {
            return Err(TerrainError::config(
                "grid_size",
                format!(
                    "x and z must be positive, got ({}, {})",
                    self.grid_size.x, self.grid_size.z
                ),
            ));
        }
        if (self.width as u64 + 1) * (self.depth as u64 + 1) > u32::MAX as u64 {
            return Err(TerrainError::config(
                "width/depth",
                format!(
                    "{}x{} cells exceed the u32 index range",
                    self.width, self.depth
                ),
            ));
        }
        if !(1..=MAX_OCTAVES).contains(&self.octaves) {
            return Err(TerrainError::config(
                "octaves",
                format!("must be in 1..={MAX_OCTAVES}, got {}", self.octaves),
            ));
        }
        if !(self.perlin_scale.is_finite() && self.perlin_scale > 0.0) {
            return Err(TerrainError::config(
                "perlin_scale",
                format!("must be finite and > 0, got {}", self.perlin_scale),
            ));
        }
        if !(self.scale.is_finite() && self.scale > 0.0) {
            return Err(TerrainError::config(
                "scale",
                format!("must be finite and > 0, got {}", self.scale),
            ));
        }
        let finite = [
            ("height_multiplier", self.height_multiplier),
            ("x_pos_offset", self.x_pos_offset),
            ("z_pos_offset", self.z_pos_offset),
        ];
        for (field, value) in finite {
            if !value.is_finite() {
                return Err(TerrainError::config(field, "must be finite"));
            }
        }
        if !(self.lacunarity.is_finite() && self.persistence.is_finite()) {
            return Err(TerrainError::config(
                "lacunarity/persistence",
                "must be finite",
            ));
        }
        if !self.curve.is_finite() {
            return Err(TerrainError::config("curve", "keys must be finite"));
        }
        if self.use_clamping {
            if !(self.min_clamp.is_finite() && self.max_clamp.is_finite()) {
                return Err(TerrainError::config("min_clamp/max_clamp", "must be finite"));
            }
            if self.min_clamp > self.max_clamp {
                return Err(TerrainError::config(
                    "min_clamp",
                    format!("{} exceeds max_clamp {}", self.min_clamp, self.max_clamp),
                ));
            }
        }
        if self.enable_fall_off {
            let max = falloff::max_distance(self.grid_size.x, self.x_pos_offset);
            if !(max > 0.0) {
                return Err(TerrainError::config(
                    "x_pos_offset",
                    format!("falloff max distance must be > 0, got {max}"),
                ));
            }
        }
        self.validate_ranges()
    }

    /// Bound the noise coordinates and the final heights of every vertex.
    fn validate_ranges(&self) -> Result<()> {
        let cells = self.width.max(self.depth) as f64;
        if self.scale as f64 * cells > f32::MAX as f64 {
            return Err(TerrainError::config("scale", "chunk extent is not finite"));
        }

        // Outermost chunk origin plus the largest grid index.
        let reach_x = (self.grid_size.x / 2) as f64 * (self.x_pos_offset as f64).abs();
        let reach_z = (self.grid_size.z / 2) as f64 * (self.z_pos_offset as f64).abs();
        let reach = reach_x.max(reach_z);
        if reach > f32::MAX as f64 {
            return Err(TerrainError::config("grid_size", "grid extent is not finite"));
        }

        let extent = OFFSET_RANGE as f64 + reach + cells;
        let top_frequency = self
            .lacunarity
            .abs()
            .max(1.0)
            .powi(self.octaves as i32 - 1);
        let coordinate = extent / self.perlin_scale * top_frequency;
        if !(coordinate <= MAX_NOISE_COORDINATE) {
            return Err(TerrainError::config(
                "perlin_scale/lacunarity/octaves",
                format!(
                    "noise coordinates reach {coordinate:e}, limit is {MAX_NOISE_COORDINATE:e}"
                ),
            ));
        }

        // Each octave contributes at most |persistence|^o.
        let amplitude: f64 = (0..self.octaves)
            .map(|o| self.persistence.abs().powi(o as i32))
            .sum();
        if !(amplitude <= f32::MAX as f64) {
            return Err(TerrainError::config(
                "persistence",
                format!("octave sum reaches {amplitude:e}"),
            ));
        }

        let shaped = if self.use_clamping {
            self.min_clamp.abs().max(self.max_clamp.abs()) as f64
        } else {
            let curve = self
                .curve
                .keys()
                .iter()
                .map(|k| k.value.abs() as f64)
                .reduce(f64::max)
                .unwrap_or(1.0);
            let falloff = if self.enable_fall_off { 1.0 } else { 0.0 };
            amplitude * curve + falloff
        };
        let height = shaped * (self.height_multiplier as f64).abs();
        if !(height <= f32::MAX as f64) {
            return Err(TerrainError::config(
                "height_multiplier",
                format!("heights could reach {height:e}"),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        assert!(TerrainConfig::default().validate().is_ok());
    }

    #[test]
    fn zero_width_rejected() {
        let config = TerrainConfig {
            width: 0,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(TerrainError::Configuration { field: "width", .. })
        ));
    }

    #[test]
    fn non_positive_perlin_scale_rejected() {
        for perlin_scale in [0.0, -3.0, f64::NAN] {
            let config = TerrainConfig {
                perlin_scale,
                ..Default::default()
            };
            assert!(config.validate().is_err(), "perlin_scale {perlin_scale}");
        }
    }

    #[test]
    fn falloff_needs_positive_spacing() {
        let config = TerrainConfig {
            enable_fall_off: true,
            x_pos_offset: 0.0,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(TerrainError::Configuration { field: "x_pos_offset", .. })
        ));
        // Same spacing is fine while falloff is off.
        let config = TerrainConfig {
            enable_fall_off: false,
            ..config
        };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn inverted_clamp_rejected_only_when_clamping() {
        let config = TerrainConfig {
            use_clamping: true,
            min_clamp: 0.8,
            max_clamp: 0.2,
            ..Default::default()
        };
        assert!(config.validate().is_err());
        let config = TerrainConfig {
            use_clamping: false,
            ..config
        };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn runaway_noise_frequency_rejected() {
        let config = TerrainConfig {
            grid_size: IVec3::new(1, 0, 1),
            width: 2,
            depth: 2,
            octaves: 60,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(TerrainError::Configuration {
                field: "perlin_scale/lacunarity/octaves",
                ..
            })
        ));

        let config = TerrainConfig {
            perlin_scale: 1e-16,
            ..Default::default()
        };
        assert!(config.validate().is_err());

        // Many octaves are fine while the frequency stays put.
        let config = TerrainConfig {
            octaves: 60,
            lacunarity: 1.0,
            ..Default::default()
        };
        assert!(config.validate().is_ok());

        let config = TerrainConfig {
            octaves: MAX_OCTAVES + 1,
            lacunarity: 1.0,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(TerrainError::Configuration { field: "octaves", .. })
        ));
    }

    #[test]
    fn overflowing_height_multiplier_rejected() {
        let config = TerrainConfig {
            grid_size: IVec3::new(1, 0, 1),
            width: 2,
            depth: 2,
            height_multiplier: f32::MAX,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(TerrainError::Configuration {
                field: "height_multiplier",
                ..
            })
        ));

        // Clamping bounds the shaped value, so a larger multiplier fits.
        let config = TerrainConfig {
            use_clamping: true,
            min_clamp: 0.0,
            max_clamp: 1.0,
            height_multiplier: 1e38,
            ..config
        };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn vertex_count_must_fit_u32_indices() {
        let config = TerrainConfig {
            width: 70_000,
            depth: 70_000,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(TerrainError::Configuration { field: "width/depth", .. })
        ));
    }

    #[test]
    fn partial_ron_fills_defaults() {
        let config: TerrainConfig =
            ron::from_str("(seed: 7, width: 8, enable_fall_off: true)").unwrap();
        assert_eq!(config.seed, 7);
        assert_eq!(config.width, 8);
        assert!(config.enable_fall_off);
        assert_eq!(config.depth, TerrainConfig::default().depth);
        assert_eq!(config.vertices_per_chunk(), 9 * 33);
    }
}
