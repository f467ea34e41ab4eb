//! Common ECS components used by the scene host.

use glam::IVec2;
use hecs::Entity;

/// Human-readable entity name (e.g. `Chunk_-2_1`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Name(pub String);

impl Name {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Parent link in the scene hierarchy. The entity's `Transform` is local to the parent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Parent(pub Entity);

/// Grid coordinate of a terrain chunk entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ChunkId(pub IVec2);

impl ChunkId {
    pub fn new(x: i32, z: i32) -> Self {
        Self(IVec2::new(x, z))
    }

    pub fn x(&self) -> i32 {
        self.0.x
    }

    pub fn z(&self) -> i32 {
        self.0.y
    }
}

/// Tag component for the root node that owns every generated chunk.
#[derive(Debug, Clone, Copy, Default)]
pub struct TerrainRoot;
