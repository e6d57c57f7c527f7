//! Nibble-packed 3D grid.
//!
//! Cells hold 4-bit values. Eight cells stacked along Y share one `u32`
//! word, so a grid's height must be a multiple of 8. For cell `(x, y, z)`:
//!
//! - word index = `(z * size.x + x) * (size.y / 8) + y / 8`
//! - nibble shift = `(y % 8) * 4`
//!
//! Value 0 always means empty.

use brickcast_core::constants::{BITS_PER_CELL, CELLS_PER_WORD, MAX_CELL_VALUE};
use brickcast_core::{LoadError, Result};
use glam::{IVec3, UVec3};

const CELL_MASK: u32 = MAX_CELL_VALUE as u32;

/// Fixed-size grid of 4-bit cells packed into 32-bit words.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VoxelGrid {
    size: UVec3,
    words: Vec<u32>,
}

impl VoxelGrid {
    /// Allocate an empty grid.
    pub fn new(size: UVec3) -> Result<Self> {
        if size.y as usize % CELLS_PER_WORD != 0 {
            return Err(LoadError::InvalidHeight { height: size.y });
        }
        Ok(Self {
            size,
            words: vec![0; cell_count(size) / CELLS_PER_WORD],
        })
    }

    /// Encode a flat per-cell buffer laid out as
    /// `(y * size.x + x) * size.z + z` (see [`raw_index`]).
    pub fn from_raw(size: UVec3, raw: &[u8]) -> Result<Self> {
        let mut grid = Self::new(size)?;
        let expected = cell_count(size);
        if raw.len() != expected {
            return Err(LoadError::VoxelCountMismatch {
                expected,
                found: raw.len(),
            });
        }
        if let Some(&value) = raw.iter().find(|&&v| v > MAX_CELL_VALUE) {
            return Err(LoadError::BrickIndexOverflow { value });
        }

        let words_per_column = size.y as usize / CELLS_PER_WORD;
        for z in 0..size.z {
            for x in 0..size.x {
                let column = (z as usize * size.x as usize + x as usize) * words_per_column;
                for word in 0..words_per_column {
                    let mut packed = 0u32;
                    for nibble in 0..CELLS_PER_WORD {
                        let y = (word * CELLS_PER_WORD + nibble) as u32;
                        let value = u32::from(raw[raw_index(size, x, y, z)]);
                        packed |= value << (nibble as u32 * BITS_PER_CELL);
                    }
                    grid.words[column + word] = packed;
                }
            }
        }

        Ok(grid)
    }

    /// Decode into the flat layout accepted by [`VoxelGrid::from_raw`].
    pub fn to_raw(&self) -> Vec<u8> {
        let mut raw = vec![0; cell_count(self.size)];
        for y in 0..self.size.y {
            for x in 0..self.size.x {
                for z in 0..self.size.z {
                    raw[raw_index(self.size, x, y, z)] =
                        self.get(x as i32, y as i32, z as i32);
                }
            }
        }
        raw
    }

    /// Grid extents in cells.
    #[inline]
    pub const fn size(&self) -> UVec3 {
        self.size
    }

    /// Check whether a cell coordinate lies inside the grid.
    #[inline]
    pub fn contains(&self, pos: IVec3) -> bool {
        pos.cmpge(IVec3::ZERO).all() && pos.as_uvec3().cmplt(self.size).all()
    }

    /// Read a cell. Coordinates outside the grid read as 0.
    #[inline]
    pub fn get(&self, x: i32, y: i32, z: i32) -> u8 {
        self.locate(IVec3::new(x, y, z))
            .map_or(0, |(word, shift)| ((self.words[word] >> shift) & CELL_MASK) as u8)
    }

    /// Read a cell by vector coordinate.
    #[inline]
    pub fn get_at(&self, pos: IVec3) -> u8 {
        self.get(pos.x, pos.y, pos.z)
    }

    /// Overwrite one cell, leaving the other seven nibbles of its word intact.
    ///
    /// Out-of-range coordinates and values above 15 are ignored.
    #[inline]
    pub fn set(&mut self, x: i32, y: i32, z: i32, value: u8) {
        if value > MAX_CELL_VALUE {
            return;
        }
        if let Some((word, shift)) = self.locate(IVec3::new(x, y, z)) {
            let slot = &mut self.words[word];
            *slot = (*slot & !(CELL_MASK << shift)) | (u32::from(value) << shift);
        }
    }

    /// Write a cell by vector coordinate.
    #[inline]
    pub fn set_at(&mut self, pos: IVec3, value: u8) {
        self.set(pos.x, pos.y, pos.z, value);
    }

    /// Packed words in upload order.
    #[inline]
    pub fn words(&self) -> &[u32] {
        &self.words
    }

    /// Packed words as raw bytes.
    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.words)
    }

    /// Returns true if every cell is empty.
    pub fn is_empty(&self) -> bool {
        self.words.iter().all(|&w| w == 0)
    }

    #[inline]
    fn locate(&self, pos: IVec3) -> Option<(usize, u32)> {
        if !self.contains(pos) {
            return None;
        }
        let (x, y, z) = (pos.x as usize, pos.y as usize, pos.z as usize);
        let words_per_column = self.size.y as usize / CELLS_PER_WORD;
        let word = (z * self.size.x as usize + x) * words_per_column + y / CELLS_PER_WORD;
        let shift = (y % CELLS_PER_WORD) as u32 * BITS_PER_CELL;
        Some((word, shift))
    }
}

/// Index of cell `(x, y, z)` in a flat source buffer: Y slowest, Z fastest.
#[inline]
pub const fn raw_index(size: UVec3, x: u32, y: u32, z: u32) -> usize {
    (y as usize * size.x as usize + x as usize) * size.z as usize + z as usize
}

#[inline]
const fn cell_count(size: UVec3) -> usize {
    size.x as usize * size.y as usize * size.z as usize
}

/// Storage that exposes its cells through a [`VoxelGrid`].
///
/// Bricks and brick maps both compose a grid; this trait gives callers a
/// uniform read path without caring which level they hold.
pub trait PackedCells {
    /// The underlying packed grid.
    fn cells(&self) -> &VoxelGrid;

    /// Read one cell value (0 outside the grid).
    #[inline]
    fn cell(&self, pos: IVec3) -> u8 {
        self.cells().get_at(pos)
    }

    /// Grid extents in cells.
    #[inline]
    fn extent(&self) -> UVec3 {
        self.cells().size()
    }
}

impl PackedCells for VoxelGrid {
    #[inline]
    fn cells(&self) -> &VoxelGrid {
        self
    }
}
