//! Errors reported by terrain generation and modulation.

use thiserror::Error;

/// Failures surfaced to callers of the terrain generator.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TerrainError {
    /// A configuration value would produce degenerate buffers or NaN heights.
    #[error("invalid terrain config `{field}`: {reason}")]
    Configuration { field: &'static str, reason: String },
    /// Modulation was requested for a mesh that has not been generated.
    #[error("no generated terrain mesh to modulate")]
    MissingMesh,
}

impl TerrainError {
    pub(crate) fn config(field: &'static str, reason: impl Into<String>) -> Self {
        Self::Configuration {
            field,
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, TerrainError>;
