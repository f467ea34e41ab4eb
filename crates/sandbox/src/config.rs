//! Sandbox configuration. Loaded from sandbox.ron at startup.

use std::path::{Path, PathBuf};

use engine_core::Vec3;
use procgen::{Brush, TerrainConfig};
use serde::{Deserialize, Serialize};

/// Which brush a sculpt stroke uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StrokeMode {
    Raise,
    Lower,
}

/// One scripted sculpt stroke: a pick ray plus a brush.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Stroke {
    pub origin: Vec3,
    pub direction: Vec3,
    pub mode: StrokeMode,
}

/// Sandbox settings. Every field falls back to its default when missing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SandboxConfig {
    /// Terrain generation parameters.
    #[serde(default)]
    pub terrain: TerrainConfig,
    /// Build chunks on the rayon pool.
    #[serde(default)]
    pub parallel: bool,
    /// World position of the terrain root node.
    #[serde(default)]
    pub root_position: Vec3,
    /// Brush used by `Raise` strokes.
    #[serde(default = "default_raise")]
    pub raise: Brush,
    /// Brush used by `Lower` strokes.
    #[serde(default = "default_lower")]
    pub lower: Brush,
    /// Maximum pick ray length.
    #[serde(default = "default_pick_distance")]
    pub pick_distance: f32,
    /// Strokes applied after generation, in order.
    #[serde(default)]
    pub strokes: Vec<Stroke>,
    /// Directory for per-chunk OBJ files. No export when unset.
    #[serde(default)]
    pub export_dir: Option<PathBuf>,
}

fn default_raise() -> Brush {
    Brush::raise(0.5, 3.0)
}
fn default_lower() -> Brush {
    Brush::lower(0.5, 3.0)
}
fn default_pick_distance() -> f32 {
    1000.0
}

impl Default for SandboxConfig {
    fn default() -> Self {
        Self {
            terrain: TerrainConfig::default(),
            parallel: false,
            root_position: Vec3::ZERO,
            raise: default_raise(),
            lower: default_lower(),
            pick_distance: default_pick_distance(),
            strokes: Vec::new(),
            export_dir: None,
        }
    }
}

impl SandboxConfig {
    /// Load config from `path`. If the file is missing or invalid, returns default config.
    pub fn load(path: &Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(data) => match ron::from_str(&data) {
                Ok(c) => return c,
                Err(e) => log::warn!("Invalid config at {:?}: {}, using defaults", path, e),
            },
            Err(e) => log::warn!("Could not read config at {:?}: {}, using defaults", path, e),
        }
        Self::default()
    }

    /// Save current config to `path`. Logs on error.
    pub fn save(&self, path: &Path) {
        if let Ok(s) = ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default()) {
            if let Err(e) = std::fs::write(path, s) {
                log::warn!("Could not write config to {:?}: {}", path, e);
            }
        }
    }

    /// Brush for a stroke mode.
    pub fn brush(&self, mode: StrokeMode) -> Brush {
        match mode {
            StrokeMode::Raise => self.raise,
            StrokeMode::Lower => self.lower,
        }
    }
}

/// `sandbox.ron` in the current directory.
pub fn default_config_path() -> PathBuf {
    std::env::current_dir()
        .unwrap_or_else(|_| PathBuf::from("."))
        .join("sandbox.ron")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_gives_defaults() {
        let config = SandboxConfig::load(Path::new("/definitely/not/here/sandbox.ron"));
        assert_eq!(config.terrain, TerrainConfig::default());
        assert!(config.strokes.is_empty());
    }

    #[test]
    fn saved_config_loads_back() {
        let path = std::env::temp_dir().join(format!("sandbox-{}.ron", std::process::id()));
        let mut config = SandboxConfig::default();
        config.terrain.seed = 1234;
        config.strokes.push(Stroke {
            origin: Vec3::new(0.0, 50.0, 0.0),
            direction: Vec3::NEG_Y,
            mode: StrokeMode::Lower,
        });
        config.save(&path);

        let loaded = SandboxConfig::load(&path);
        let _ = std::fs::remove_file(&path);
        assert_eq!(loaded.terrain.seed, 1234);
        assert_eq!(loaded.strokes, config.strokes);
        assert_eq!(loaded.brush(StrokeMode::Lower), config.lower);
    }

    #[test]
    fn bundled_sandbox_ron_is_valid() {
        let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("../../sandbox.ron");
        let data = std::fs::read_to_string(&path).unwrap();
        let config: SandboxConfig = ron::from_str(&data).unwrap();
        config.terrain.validate().unwrap();
        assert_eq!(config.terrain.layer_start_heights(), vec![0.0, 0.15, 0.55, 0.85]);
        assert_eq!(config.strokes.len(), 3);
        assert_eq!(config.strokes[2].mode, StrokeMode::Lower);
    }

    #[test]
    fn partial_config_keeps_brush_defaults() {
        let config: SandboxConfig = ron::from_str("(terrain: (seed: 9), parallel: true)").unwrap();
        assert_eq!(config.terrain.seed, 9);
        assert!(config.parallel);
        assert_eq!(config.raise, default_raise());
        assert!(config.lower.height < 0.0);
    }
}
