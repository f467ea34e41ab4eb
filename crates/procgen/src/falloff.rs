//! Radial edge falloff over the whole chunk grid.

use glam::Vec2;

/// Exponent of the falloff curve.
pub const STEEPNESS: f32 = 3.0;
/// Shifts where the curve crosses 0.5; larger keeps the centre flatter.
pub const SHARPNESS: f32 = 2.2;

/// Distance from the origin at which the falloff reaches 1.
#[inline]
pub fn max_distance(grid_size_x: i32, x_pos_offset: f32) -> f32 {
    grid_size_x as f32 * x_pos_offset / 2.0
}

/// Falloff in `[0, 1]` at a world position: 0 at the grid centre, 1 at
/// `max_distance` and beyond.
///
/// A non-positive (or non-finite) max distance yields `0.0`, i.e. no
/// attenuation. Configuration validation rejects that case whenever falloff
/// is enabled, so generation never relies on it.
pub fn evaluate(world_x: f32, world_z: f32, grid_size_x: i32, x_pos_offset: f32) -> f32 {
    let max = max_distance(grid_size_x, x_pos_offset);
    if !(max.is_finite() && max > 0.0) {
        return 0.0;
    }
    let n = (Vec2::new(world_x, world_z).length() / max).clamp(0.0, 1.0);
    shape(n)
}

/// `n^a / (n^a + (b - b·n)^a)` for normalized distance `n` in `[0, 1]`.
#[inline]
pub fn shape(n: f32) -> f32 {
    let near = n.powf(STEEPNESS);
    let far = (SHARPNESS - SHARPNESS * n).powf(STEEPNESS);
    near / (near + far)
}
