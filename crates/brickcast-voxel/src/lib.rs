//! Brick map voxel storage for the Brickcast engine.
//!
//! Two levels: a [`BrickMap`] whose cells name bricks, and 8x8x8 [`Brick`]s
//! whose cells name palette materials. Both pack 4-bit cells into `u32`
//! words through [`VoxelGrid`].

pub mod brick;
pub mod brick_map;
pub mod grid;
pub mod scene;
pub mod source;

pub use brick::{Brick, OverflowPolicy, BRICK_EXTENT};
pub use brick_map::{pose_from_orbit, BrickMap};
pub use grid::{raw_index, PackedCells, VoxelGrid};
pub use scene::Scene;
pub use source::{
    OrbitCamera, SourceModel, SourcePalette, SourcePaletteEntry, SourceScene, SOURCE_PALETTE_LEN,
};
