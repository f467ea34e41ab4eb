//! Scene host interface for placing generated chunks.

use glam::{IVec2, Vec3};

use crate::config::Layer;
use crate::mesh::MeshRecord;

/// Everything the host needs to attach one chunk to its scene.
#[derive(Debug, Clone, Copy)]
pub struct ChunkSpawn<'a> {
    pub coord: IVec2,
    pub name: &'a str,
    /// Position local to the terrain root.
    pub position: Vec3,
    pub mesh: &'a MeshRecord,
    pub material: &'a str,
    pub layers: &'a [Layer],
}

/// Scene, render and collision services provided by the embedding engine.
pub trait ChunkHost {
    type Handle: Copy;

    /// Remove every chunk previously spawned through this host.
    fn clear_chunks(&mut self);

    /// Attach a renderable object for the chunk under the terrain root.
    fn spawn_chunk(&mut self, spawn: ChunkSpawn<'_>) -> Self::Handle;

    /// Register (or re-register) the chunk's triangle mesh as a collider.
    fn register_collider(&mut self, handle: Self::Handle, mesh: &MeshRecord);

    /// Push modified vertices to the render mesh and rebuild the collider.
    fn refresh_mesh(&mut self, handle: Self::Handle, mesh: &MeshRecord) {
        self.register_collider(handle, mesh);
    }
}
