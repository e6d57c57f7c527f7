//! Occupancy capability used by raycasting and collision.

use glam::Vec3;

/// Answers whether a world-space position lies inside solid geometry.
///
/// Implementations must be pure and cheap: the raycaster calls this once per
/// traversal step and the movement controller casts many probe rays per
/// frame. Positions outside the world are never occupied.
pub trait OccupancyQuery {
    /// Returns true if `position` is inside a solid voxel.
    fn is_occupied(&self, position: Vec3) -> bool;
}

impl<F> OccupancyQuery for F
where
    F: Fn(Vec3) -> bool,
{
    #[inline]
    fn is_occupied(&self, position: Vec3) -> bool {
        self(position)
    }
}
