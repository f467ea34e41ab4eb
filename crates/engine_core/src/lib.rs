//! Core engine types shared by the terrain crates.
//!
//! This crate provides the foundational types used across all engine systems:
//! - Transform and spatial components
//! - Scene components for the ECS host (names, parenting, chunk ids)

pub mod components;
pub mod transform;

pub use components::*;
pub use transform::*;

// Re-export commonly used types
pub use glam::{IVec2, IVec3, Mat4, Quat, Vec2, Vec3, Vec4};
pub use hecs::{Entity, World};
