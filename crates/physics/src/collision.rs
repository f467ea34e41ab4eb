//! Collision groups and filtering.

use rapier3d::prelude::*;

/// Collision groups for different collider types.
#[repr(u32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollisionGroup {
    /// Static environment (terrain chunks)
    Environment = 1 << 0,
    /// Query rays used to pick terrain for sculpting
    Pick = 1 << 1,
}

impl CollisionGroup {
    /// Membership and filter for environment colliders.
    pub fn environment() -> (Group, Group) {
        let membership = Group::from_bits_retain(Self::Environment as u32);
        let filter = Group::ALL;
        (membership, filter)
    }

    /// Membership and filter for pick rays: they only hit environment.
    pub fn pick() -> (Group, Group) {
        let membership = Group::from_bits_retain(Self::Pick as u32);
        let filter = Group::from_bits_retain(Self::Environment as u32);
        (membership, filter)
    }
}

/// Interaction groups for static terrain colliders.
pub fn env_collision_groups() -> InteractionGroups {
    let (membership, filter) = CollisionGroup::environment();
    InteractionGroups::new(membership, filter)
}

/// Query filter that only reports environment colliders.
pub fn pick_filter() -> QueryFilter<'static> {
    let (membership, filter) = CollisionGroup::pick();
    QueryFilter::default().groups(InteractionGroups::new(membership, filter))
}
