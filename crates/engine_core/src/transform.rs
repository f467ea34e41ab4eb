//! Transform component and utilities for spatial positioning.

use glam::{Mat4, Quat, Vec3};

/// A 3D transform representing position, rotation, and scale.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub position: Vec3,
    pub rotation: Quat,
    pub scale: Vec3,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            scale: Vec3::ONE,
        }
    }
}

impl Transform {
    /// Create a new transform at the given position.
    pub fn from_position(position: Vec3) -> Self {
        Self {
            position,
            ..Default::default()
        }
    }

    /// Create the model matrix for this transform.
    pub fn to_matrix(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(self.scale, self.rotation, self.position)
    }

    /// Map a point from this transform's local space into world space.
    pub fn transform_point(&self, local: Vec3) -> Vec3 {
        self.to_matrix().transform_point3(local)
    }

    /// Map a world-space point into this transform's local space.
    pub fn inverse_transform_point(&self, world: Vec3) -> Vec3 {
        self.to_matrix().inverse().transform_point3(world)
    }

    /// Compose a child's local transform under this (parent) transform.
    pub fn mul_transform(&self, child: &Transform) -> Transform {
        Transform {
            position: self.transform_point(child.position),
            rotation: self.rotation * child.rotation,
            scale: self.scale * child.scale,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn inverse_point_undoes_translation() {
        let t = Transform::from_position(Vec3::new(10.0, 2.0, -4.0));
        let world = Vec3::new(12.0, 2.0, -1.0);
        let local = t.inverse_transform_point(world);
        assert!((local - Vec3::new(2.0, 0.0, 3.0)).length() < 1e-5);
        assert!((t.transform_point(local) - world).length() < 1e-5);
    }

    #[test]
    fn child_under_translated_parent() {
        let parent = Transform::from_position(Vec3::new(1.0, 0.0, 1.0));
        let child = Transform::from_position(Vec3::new(-8.0, 0.0, 4.0));
        let world = parent.mul_transform(&child);
        assert!((world.position - Vec3::new(-7.0, 0.0, 5.0)).length() < 1e-5);
    }
}
