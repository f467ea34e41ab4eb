//! Collision world holding one static triangle-mesh collider per terrain chunk.

use crate::collision::env_collision_groups;
use anyhow::{ensure, Result};
use engine_core::Vec3;
use rapier3d::prelude::*;

/// Collider sets plus the query pipeline used for picking.
pub struct PhysicsWorld {
    pub rigid_body_set: RigidBodySet,
    pub collider_set: ColliderSet,
    pub island_manager: IslandManager,
    pub query_pipeline: QueryPipeline,
}

impl Default for PhysicsWorld {
    fn default() -> Self {
        Self::new()
    }
}

impl PhysicsWorld {
    pub fn new() -> Self {
        Self {
            rigid_body_set: RigidBodySet::new(),
            collider_set: ColliderSet::new(),
            island_manager: IslandManager::new(),
            query_pipeline: QueryPipeline::new(),
        }
    }

    /// Update query pipeline for raycasting. Call after adding or replacing colliders.
    pub fn update_query_pipeline(&mut self) {
        self.query_pipeline.update(&self.collider_set);
    }

    /// Number of live colliders.
    pub fn collider_count(&self) -> usize {
        self.collider_set.len()
    }

    /// Add a fixed triangle-mesh collider for a terrain chunk.
    /// - `vertices`: mesh-local positions.
    /// - `triangles`: index triples into `vertices`.
    /// - `position`: world position of the mesh origin.
    pub fn add_terrain_trimesh(
        &mut self,
        vertices: &[Vec3],
        triangles: Vec<[u32; 3]>,
        position: Vec3,
    ) -> Result<ColliderHandle> {
        ensure!(!triangles.is_empty(), "terrain trimesh has no triangles");
        ensure!(
            triangles.iter().flatten().all(|&i| (i as usize) < vertices.len()),
            "terrain trimesh index out of range for {} vertices",
            vertices.len()
        );

        let points: Vec<Point<Real>> = vertices
            .iter()
            .map(|v| point![v.x as Real, v.y as Real, v.z as Real])
            .collect();

        let collider = ColliderBuilder::trimesh(points, triangles)
            .translation(vector![position.x, position.y, position.z])
            .collision_groups(env_collision_groups())
            .build();
        Ok(self.collider_set.insert(collider))
    }

    /// Swap an existing terrain collider for one built from new vertices.
    pub fn replace_terrain_trimesh(
        &mut self,
        old: ColliderHandle,
        vertices: &[Vec3],
        triangles: Vec<[u32; 3]>,
        position: Vec3,
    ) -> Result<ColliderHandle> {
        let handle = self.add_terrain_trimesh(vertices, triangles, position)?;
        self.remove_collider(old);
        Ok(handle)
    }

    /// Remove a collider by its handle.
    pub fn remove_collider(&mut self, handle: ColliderHandle) {
        self.collider_set.remove(
            handle,
            &mut self.island_manager,
            &mut self.rigid_body_set,
            true,
        );
    }

    /// World-space AABB of a collider, if it exists.
    pub fn collider_bounds(&self, handle: ColliderHandle) -> Option<(Vec3, Vec3)> {
        self.collider_set.get(handle).map(|c| {
            let aabb = c.compute_aabb();
            (
                Vec3::new(aabb.mins.x, aabb.mins.y, aabb.mins.z),
                Vec3::new(aabb.maxs.x, aabb.maxs.y, aabb.maxs.z),
            )
        })
    }
}
