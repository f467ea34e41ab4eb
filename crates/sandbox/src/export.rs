//! Per-chunk OBJ export.

use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use procgen::Chunk;

/// Write each chunk to `<dir>/<chunk name>.obj` (mesh-local coordinates).
/// Returns the written paths in chunk order.
pub fn export_chunks(chunks: &[Chunk], dir: &Path) -> Result<Vec<PathBuf>> {
    std::fs::create_dir_all(dir).with_context(|| format!("creating {}", dir.display()))?;

    let mut written = Vec::with_capacity(chunks.len());
    for chunk in chunks {
        let path = dir.join(format!("{}.obj", chunk.name));
        let file = File::create(&path).with_context(|| format!("creating {}", path.display()))?;
        let mut out = BufWriter::new(file);
        chunk
            .mesh
            .write_obj(&mut out, &chunk.name)
            .with_context(|| format!("writing {}", path.display()))?;
        written.push(path);
    }

    log::info!("Exported {} chunk meshes to {}", written.len(), dir.display());
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use engine_core::IVec3;
    use procgen::{TerrainConfig, TerrainGenerator};

    #[test]
    fn one_file_per_chunk() {
        let mut generator = TerrainGenerator::new();
        let chunks = generator
            .generate(&TerrainConfig {
                grid_size: IVec3::new(2, 0, 1),
                width: 3,
                depth: 2,
                ..Default::default()
            })
            .unwrap();

        let dir = std::env::temp_dir().join(format!("terrain-export-{}", std::process::id()));
        let paths = export_chunks(chunks, &dir).unwrap();
        assert_eq!(paths.len(), 2);
        assert!(paths[0].ends_with("Chunk_-1_0.obj"));

        let text = std::fs::read_to_string(&paths[1]).unwrap();
        assert!(text.starts_with("o Chunk_0_0"));
        assert_eq!(text.lines().filter(|l| l.starts_with("v ")).count(), 12);
        let _ = std::fs::remove_dir_all(&dir);
    }
}
