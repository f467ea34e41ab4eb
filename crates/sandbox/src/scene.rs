//! ECS scene hosting terrain chunks: one entity per chunk under a terrain root,
//! each with a render copy of its mesh and a static trimesh collider.

use std::collections::HashMap;

use engine_core::{ChunkId, Entity, Name, Parent, TerrainRoot, Transform, Vec3, World};
use physics::{ColliderHandle, PhysicsWorld, RaycastHit};
use procgen::{ChunkHost, ChunkSpawn, Layer, MeshRecord};

/// Render-side surface of a chunk: what the host's renderer would draw.
#[derive(Debug, Clone)]
pub struct TerrainSurface {
    pub material: String,
    pub layers: Vec<Layer>,
    pub mesh: MeshRecord,
}

/// Collider registered for a chunk entity.
#[derive(Debug, Clone, Copy)]
pub struct ChunkCollider(pub ColliderHandle);

/// A pick ray that landed on a chunk.
#[derive(Debug, Clone, Copy)]
pub struct TerrainHit {
    pub entity: Entity,
    pub chunk: ChunkId,
    /// Hit point in terrain-root space.
    pub local_point: Vec3,
    pub hit: RaycastHit,
}

pub struct Scene {
    pub world: World,
    pub physics: PhysicsWorld,
    root: Entity,
    colliders: HashMap<ColliderHandle, Entity>,
}

impl Scene {
    pub fn new(root_position: Vec3) -> Self {
        let mut world = World::new();
        let root = world.spawn((
            Name::new("Terrain"),
            TerrainRoot,
            Transform::from_position(root_position),
        ));
        Self {
            world,
            physics: PhysicsWorld::new(),
            root,
            colliders: HashMap::new(),
        }
    }

    pub fn root(&self) -> Entity {
        self.root
    }

    fn root_transform(&self) -> Transform {
        self.world
            .get::<&Transform>(self.root)
            .map(|t| *t)
            .unwrap_or_default()
    }

    /// World transform of an entity, composed through its `Parent`.
    pub fn world_transform(&self, entity: Entity) -> Option<Transform> {
        let local = *self.world.get::<&Transform>(entity).ok()?;
        match self.world.get::<&Parent>(entity) {
            Ok(parent) => {
                let parent = parent.0;
                Some(self.world_transform(parent)?.mul_transform(&local))
            }
            Err(_) => Some(local),
        }
    }

    /// Every chunk entity, sorted by coordinate.
    pub fn chunk_entities(&self) -> Vec<(Entity, ChunkId)> {
        let mut chunks: Vec<_> = self
            .world
            .query::<&ChunkId>()
            .iter()
            .map(|(e, id)| (e, *id))
            .collect();
        chunks.sort_by_key(|(_, id)| (id.z(), id.x()));
        chunks
    }

    /// Cast a pick ray and resolve the chunk it hit.
    pub fn pick(&self, origin: Vec3, direction: Vec3, max_distance: f32) -> Option<TerrainHit> {
        let hit = self.physics.raycast(origin, direction, max_distance)?;
        let entity = *self.colliders.get(&hit.collider)?;
        let chunk = *self.world.get::<&ChunkId>(entity).ok()?;
        let local_point = self.root_transform().inverse_transform_point(hit.point);
        Some(TerrainHit {
            entity,
            chunk,
            local_point,
            hit,
        })
    }
}

impl ChunkHost for Scene {
    type Handle = Entity;

    fn clear_chunks(&mut self) {
        let chunks = self.chunk_entities();
        for (entity, _) in &chunks {
            if let Ok(collider) = self.world.get::<&ChunkCollider>(*entity).map(|c| c.0) {
                self.physics.remove_collider(collider);
                self.colliders.remove(&collider);
            }
            let _ = self.world.despawn(*entity);
        }
        if !chunks.is_empty() {
            log::debug!("Despawned {} chunk entities", chunks.len());
            self.physics.update_query_pipeline();
        }
    }

    fn spawn_chunk(&mut self, spawn: ChunkSpawn<'_>) -> Entity {
        self.world.spawn((
            Name::new(spawn.name),
            ChunkId(spawn.coord),
            Parent(self.root),
            Transform::from_position(spawn.position),
            TerrainSurface {
                material: spawn.material.to_string(),
                layers: spawn.layers.to_vec(),
                mesh: spawn.mesh.clone(),
            },
        ))
    }

    fn register_collider(&mut self, handle: Entity, mesh: &MeshRecord) {
        let Some(position) = self.world_transform(handle).map(|t| t.position) else {
            log::warn!("Cannot register collider for missing entity {:?}", handle);
            return;
        };
        let previous = self.world.get::<&ChunkCollider>(handle).ok().map(|c| c.0);

        let result = match previous {
            Some(old) => self
                .physics
                .replace_terrain_trimesh(old, mesh.vertices(), mesh.triangles(), position),
            None => self
                .physics
                .add_terrain_trimesh(mesh.vertices(), mesh.triangles(), position),
        };

        match result {
            Ok(collider) => {
                if let Some(old) = previous {
                    self.colliders.remove(&old);
                }
                self.colliders.insert(collider, handle);
                let _ = self.world.insert_one(handle, ChunkCollider(collider));
                self.physics.update_query_pipeline();
            }
            Err(e) => log::warn!("Terrain collider for {:?} failed: {e:#}", handle),
        }
    }

    fn refresh_mesh(&mut self, handle: Entity, mesh: &MeshRecord) {
        if let Ok(mut surface) = self.world.get::<&mut TerrainSurface>(handle) {
            surface.mesh = mesh.clone();
        }
        self.register_collider(handle, mesh);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use engine_core::{IVec2, IVec3};
    use procgen::{HeightField, TerrainConfig, TerrainGenerator};

    fn config() -> TerrainConfig {
        TerrainConfig {
            seed: 31,
            grid_size: IVec3::new(2, 0, 2),
            width: 4,
            depth: 4,
            x_pos_offset: 4.0,
            z_pos_offset: 4.0,
            perlin_scale: 6.0,
            octaves: 2,
            ..Default::default()
        }
    }

    impl Scene {
        pub(crate) fn chunk_entity(&self, id: ChunkId) -> Option<Entity> {
            self.chunk_entities()
                .into_iter()
                .find(|(_, c)| *c == id)
                .map(|(e, _)| e)
        }
    }

    #[test]
    fn spawns_named_children_with_colliders() {
        let mut generator = TerrainGenerator::new();
        generator.generate(&config()).unwrap();
        let mut scene = Scene::new(Vec3::ZERO);
        let handles = generator.spawn_into(&mut scene);

        assert_eq!(handles.len(), 4);
        assert_eq!(scene.physics.collider_count(), 4);
        let e = scene.chunk_entity(ChunkId::new(-1, 0)).unwrap();
        assert_eq!(scene.world.get::<&Name>(e).unwrap().as_str(), "Chunk_-1_0");
        assert_eq!(scene.world.get::<&Parent>(e).unwrap().0, scene.root());
        assert_eq!(
            scene.world_transform(e).unwrap().position,
            Vec3::new(-4.0, 0.0, 0.0)
        );
        let surface = scene.world.get::<&TerrainSurface>(e).unwrap();
        assert_eq!(surface.material, "terrain");
        assert_eq!(surface.layers, config().layers);
    }

    #[test]
    fn respawn_replaces_entities_and_colliders() {
        let mut generator = TerrainGenerator::new();
        let mut scene = Scene::new(Vec3::ZERO);
        generator.generate(&config()).unwrap();
        generator.spawn_into(&mut scene);
        generator
            .generate(&TerrainConfig {
                grid_size: IVec3::new(1, 0, 1),
                ..config()
            })
            .unwrap();
        generator.spawn_into(&mut scene);

        assert_eq!(scene.chunk_entities().len(), 1);
        assert_eq!(scene.physics.collider_count(), 1);
        assert_eq!(scene.chunk_entities()[0].1, ChunkId(IVec2::ZERO));
    }

    #[test]
    fn pick_resolves_chunk_under_offset_root() {
        let mut generator = TerrainGenerator::new();
        generator.generate(&config()).unwrap();
        let mut scene = Scene::new(Vec3::new(100.0, 0.0, 0.0));
        generator.spawn_into(&mut scene);

        // Root-local (1.5, _, 1.5) lies inside chunk (0, 0).
        let hit = scene
            .pick(Vec3::new(101.5, 500.0, 1.5), Vec3::NEG_Y, 1000.0)
            .expect("ray should land on terrain");
        assert_eq!(hit.chunk, ChunkId::new(0, 0));
        assert!((hit.local_point.x - 1.5).abs() < 1e-3);
        assert!((hit.local_point.z - 1.5).abs() < 1e-3);
    }

    #[test]
    fn failed_refresh_keeps_old_collider_pickable() {
        let mut generator = TerrainGenerator::new();
        generator.generate(&config()).unwrap();
        let mut scene = Scene::new(Vec3::ZERO);
        generator.spawn_into(&mut scene);
        let e = scene.chunk_entity(ChunkId::new(0, 0)).unwrap();
        let old = scene.world.get::<&ChunkCollider>(e).unwrap().0;

        // A single vertex has no triangles, so the collider rebuild fails.
        let degenerate = MeshRecord::assemble(HeightField {
            width: 0,
            depth: 0,
            vertices: vec![Vec3::ZERO],
            raw_heights: vec![0.0],
        });
        scene.refresh_mesh(e, &degenerate);

        assert_eq!(scene.world.get::<&ChunkCollider>(e).unwrap().0, old);
        assert_eq!(scene.physics.collider_count(), 4);
        let hit = scene
            .pick(Vec3::new(1.5, 500.0, 1.5), Vec3::NEG_Y, 1000.0)
            .expect("old collider should still be pickable");
        assert_eq!(hit.entity, e);
    }
}
