//! Loaded scene: a brick map plus the bricks it references.

use brickcast_core::constants::{BRICK_SIZE, PALETTE_SLOTS};
use brickcast_core::{GpuMaterial, LoadError, OccupancyQuery, Result};
use glam::{IVec3, Vec3};

use crate::brick::Brick;
use crate::brick_map::BrickMap;
use crate::grid::PackedCells;

/// Scene context owned by the caller for the lifetime of a session.
///
/// World space is measured in brick-map cells: one unit spans one brick and
/// one voxel is `1 / 8` of a unit.
#[derive(Clone, Debug)]
pub struct Scene {
    brick_map: BrickMap,
    bricks: Vec<Brick>,
}

impl Scene {
    /// Assemble a scene, checking that every referenced brick exists.
    pub fn new(brick_map: BrickMap, bricks: Vec<Brick>) -> Result<Self> {
        let max_id = brick_map.max_brick_id();
        if max_id as usize > bricks.len() {
            return Err(LoadError::MissingBrick {
                index: max_id,
                available: bricks.len(),
            });
        }
        Ok(Self { brick_map, bricks })
    }

    #[inline]
    pub const fn brick_map(&self) -> &BrickMap {
        &self.brick_map
    }

    #[inline]
    pub fn bricks(&self) -> &[Brick] {
        &self.bricks
    }

    /// Grid extents in voxels, as used when raycasting in world space.
    #[inline]
    pub fn voxel_grid_size(&self) -> IVec3 {
        self.brick_map.size().as_ivec3() * BRICK_SIZE as i32
    }

    /// Palette index of the voxel containing `position` (0 for air).
    ///
    /// Two-stage lookup: the brick map cell selects a brick, the fractional
    /// position selects a voxel within it.
    pub fn material_at(&self, position: Vec3) -> u8 {
        if !position.is_finite() {
            return 0;
        }
        let map_cell = position.floor().as_ivec3();
        let brick_id = self.brick_map.brick_at(map_cell);
        if brick_id == 0 {
            return 0;
        }
        let Some(brick) = self.bricks.get(brick_id as usize - 1) else {
            return 0;
        };
        let local = (position * BRICK_SIZE as f32)
            .floor()
            .as_ivec3()
            % IVec3::splat(BRICK_SIZE as i32);
        brick.cell(local)
    }

    /// Materials for every brick, 16 slots per brick in brick order.
    pub fn material_buffer(&self) -> Vec<GpuMaterial> {
        let mut out = Vec::with_capacity(self.bricks.len() * PALETTE_SLOTS);
        for brick in &self.bricks {
            out.extend_from_slice(&brick.gpu_palette());
        }
        out
    }

    /// Packed words of every brick, concatenated in brick order.
    pub fn brick_words(&self) -> Vec<u32> {
        self.bricks
            .iter()
            .flat_map(|b| b.cells().words().iter().copied())
            .collect()
    }

    /// Packed words of the brick map.
    #[inline]
    pub fn brick_map_words(&self) -> &[u32] {
        self.brick_map.cells().words()
    }
}

impl OccupancyQuery for Scene {
    #[inline]
    fn is_occupied(&self, position: Vec3) -> bool {
        self.material_at(position) != 0
    }
}
