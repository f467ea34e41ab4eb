//! Terrain sandbox: generate a chunk grid, place it in an ECS scene with
//! colliders, replay scripted sculpt strokes, and optionally export OBJ files.

mod config;
mod export;
mod scene;
mod sculpt;

use std::path::PathBuf;

use anyhow::{Context, Result};
use procgen::TerrainGenerator;

use crate::config::{default_config_path, SandboxConfig};
use crate::scene::{Scene, TerrainSurface};
use crate::sculpt::{apply_brush, StrokeResult};

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config_path = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(default_config_path);
    log::info!("Loading sandbox config from {:?}", config_path);
    let config = SandboxConfig::load(&config_path);
    if !config_path.exists() {
        log::info!("Writing default config to {:?}", config_path);
        config.save(&config_path);
    }

    let mut generator = TerrainGenerator::new();
    let generated = if config.parallel {
        generator.generate_parallel(&config.terrain)
    } else {
        generator.generate(&config.terrain)
    };
    let chunk_count = generated.context("terrain generation failed")?.len();

    let mut scene = Scene::new(config.root_position);
    let handles = generator.spawn_into(&mut scene);
    log::info!(
        "Spawned {} of {} chunks under {:?}, {} colliders",
        handles.len(),
        chunk_count,
        scene.root(),
        scene.physics.collider_count()
    );
    for (entity, id) in scene.chunk_entities() {
        let Ok(surface) = scene.world.get::<&TerrainSurface>(entity) else {
            continue;
        };
        let bounds = surface.mesh.bounds();
        log::debug!(
            "Chunk {:?}: {} triangles, material {:?} with {} layers, centre {:?}, size {:?}",
            id.0,
            surface.mesh.triangle_count(),
            surface.material,
            surface.layers.len(),
            bounds.center(),
            bounds.size()
        );
    }

    let mut moved_total = 0;
    for stroke in &config.strokes {
        let brush = config.brush(stroke.mode);
        match apply_brush(&mut generator, &mut scene, stroke, brush, config.pick_distance) {
            Ok(StrokeResult::Applied { moved }) => moved_total += moved,
            Ok(StrokeResult::Missed) => {
                log::warn!("Stroke from {:?} missed the terrain", stroke.origin)
            }
            Err(e) => log::warn!("Stroke failed: {e:#}"),
        }
    }
    if !config.strokes.is_empty() {
        log::info!(
            "Applied {} strokes, {} vertex displacements",
            config.strokes.len(),
            moved_total
        );
    }

    if let Some(dir) = &config.export_dir {
        export::export_chunks(generator.chunks(), dir)?;
    }

    Ok(())
}
