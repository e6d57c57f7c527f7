//! Error types for scene loading.

use std::path::PathBuf;

use glam::UVec3;
use thiserror::Error;

/// Failure while turning source voxel data into bricks and brick maps.
///
/// Runtime geometry queries never produce errors; out-of-range reads resolve
/// to empty space instead.
#[derive(Error, Debug)]
pub enum LoadError {
    /// Source file could not be read
    #[error("cannot read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Scene manifest is malformed
    #[error("invalid scene manifest: {0}")]
    Manifest(String),

    /// The model source has no model for the requested path
    #[error("model not found: {0}")]
    ModelNotFound(PathBuf),

    /// Brick model is not 8x8x8
    #[error("model dimensions mismatch: expected {expected}, found {found}")]
    DimensionMismatch { expected: UVec3, found: UVec3 },

    /// Grid height is not a multiple of 8
    #[error("grid height has to be a multiple of 8, found {height}")]
    InvalidHeight { height: u32 },

    /// Raw cell buffer does not match the declared extents
    #[error("voxel buffer holds {found} cells, expected {expected}")]
    VoxelCountMismatch { expected: usize, found: usize },

    /// Brick uses more distinct materials than its palette can hold
    #[error("brick uses {distinct} distinct materials, at most 15 fit")]
    PaletteOverflow { distinct: usize },

    /// Voxel references a palette slot the brick does not define
    #[error("voxel references material {index}, palette has {available} entries")]
    UnknownMaterial { index: u8, available: usize },

    /// Cell value does not fit into 4 bits
    #[error("cell value {value} does not fit into 4 bits")]
    BrickIndexOverflow { value: u8 },

    /// Brick map references a brick that was not loaded
    #[error("brick map references brick {index}, only {available} loaded")]
    MissingBrick { index: u8, available: usize },
}

/// Result type alias using [`LoadError`].
pub type Result<T> = std::result::Result<T, LoadError>;
