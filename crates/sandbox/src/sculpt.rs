//! Pick-and-sculpt: ray → chunk → modulation → render/collider refresh.

use anyhow::{Context, Result};
use procgen::{Brush, ChunkHost, TerrainGenerator};

use crate::config::Stroke;
use crate::scene::Scene;

/// Outcome of one stroke.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StrokeResult {
    /// The ray hit no terrain.
    Missed,
    /// The ray hit a chunk; `moved` vertices were displaced.
    Applied { moved: usize },
}

/// Apply a single brush along a pick ray.
pub fn apply_brush(
    generator: &mut TerrainGenerator,
    scene: &mut Scene,
    stroke: &Stroke,
    brush: Brush,
    max_distance: f32,
) -> Result<StrokeResult> {
    let Some(hit) = scene.pick(stroke.origin, stroke.direction, max_distance) else {
        return Ok(StrokeResult::Missed);
    };

    let moved = generator
        .modulate_at(hit.chunk.0, hit.local_point, brush)
        .with_context(|| format!("modulating chunk {:?}", hit.chunk.0))?;

    if moved > 0 {
        let chunk = generator
            .chunk(hit.chunk.0)
            .context("chunk vanished after modulation")?;
        scene.refresh_mesh(hit.entity, &chunk.mesh);
    }

    log::info!(
        "{:?} stroke hit Chunk_{}_{} at {:?}: {} vertices moved by {}",
        stroke.mode,
        hit.chunk.x(),
        hit.chunk.z(),
        hit.hit.point,
        moved,
        brush.height
    );
    Ok(StrokeResult::Applied { moved })
}
