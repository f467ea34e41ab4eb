//! Raise or lower terrain vertices inside a radius.

use glam::{Vec2, Vec3};
use serde::{Deserialize, Serialize};

use crate::error::{Result, TerrainError};
use crate::mesh::MeshRecord;

/// Height change and radius of one sculpt stroke.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Brush {
    pub height: f32,
    pub radius: f32,
}

impl Brush {
    pub fn raise(height: f32, radius: f32) -> Self {
        Self {
            height: height.abs(),
            radius,
        }
    }

    pub fn lower(height: f32, radius: f32) -> Self {
        Self {
            height: -height.abs(),
            radius,
        }
    }
}

/// Add `height_delta` to every vertex within `radius` (planar XZ distance,
/// inclusive) of `world_position`.
///
/// `mesh_origin` is the mesh's world position; the target is moved into mesh
/// space by subtracting it. Displacement is additive, so repeated calls
/// accumulate. A non-positive radius or a target away from the mesh is a no-op.
/// Returns the number of vertices moved; normals and bounds are refreshed when
/// that is non-zero. The caller must then refresh any render/collision copy.
pub fn modulate(
    mesh: Option<&mut MeshRecord>,
    mesh_origin: Vec3,
    world_position: Vec3,
    height_delta: f32,
    radius: f32,
) -> Result<usize> {
    let mesh = mesh.ok_or(TerrainError::MissingMesh)?;

    if !(radius.is_finite() && radius > 0.0) {
        return Ok(0);
    }

    let local = world_position - mesh_origin;
    let target = Vec2::new(local.x, local.z);
    if !mesh.bounds().contains_xz(target.x, target.y, radius) {
        return Ok(0);
    }

    let mut affected = 0;
    for vertex in mesh.vertices_mut() {
        if Vec2::new(vertex.x, vertex.z).distance(target) <= radius {
            vertex.y += height_delta;
            affected += 1;
        }
    }

    if affected > 0 {
        mesh.recalculate();
    }
    Ok(affected)
}
