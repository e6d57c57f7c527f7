//! Core types, math, and traits for the Brickcast engine.
//!
//! This crate provides the foundational types used throughout the engine:
//! - Load error taxonomy
//! - Ray and slab math for grid traversal
//! - The occupancy capability shared by raycasting and collision
//! - Material and camera pose payloads

pub mod error;
pub mod math;
pub mod occupancy;
pub mod types;

pub use error::{LoadError, Result};
pub use math::{Aabb, Ray, SlabHit};
pub use occupancy::OccupancyQuery;
pub use types::{CameraPose, GpuMaterial, Material};

/// Engine-wide constants
pub mod constants {
    /// Edge length of a brick in voxels
    pub const BRICK_SIZE: usize = 8;
    /// Total voxels in a brick (8^3)
    pub const BRICK_VOXELS: usize = BRICK_SIZE * BRICK_SIZE * BRICK_SIZE;
    /// 4-bit cells packed into one 32-bit word along Y
    pub const CELLS_PER_WORD: usize = 8;
    /// Bits per packed cell
    pub const BITS_PER_CELL: u32 = 4;
    /// Largest value a packed cell can hold
    pub const MAX_CELL_VALUE: u8 = 0xF;
    /// Palette slots per brick, slot 0 being the implicit empty material
    pub const PALETTE_SLOTS: usize = 16;
    /// World-space edge length of one voxel when a brick spans one unit
    pub const VOXEL_SIZE: f32 = 1.0 / BRICK_SIZE as f32;
}
