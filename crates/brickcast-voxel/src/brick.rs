//! 8x8x8 voxel bricks with a small material palette.

use brickcast_core::constants::{BRICK_SIZE, BRICK_VOXELS, PALETTE_SLOTS};
use brickcast_core::{GpuMaterial, LoadError, Material, Result};
use glam::UVec3;
use serde::{Deserialize, Serialize};

use crate::grid::{PackedCells, VoxelGrid};
use crate::source::SourceScene;

/// Brick extents as a vector.
pub const BRICK_EXTENT: UVec3 = UVec3::splat(BRICK_SIZE as u32);

/// What to do when a source brick uses more than 15 distinct colors.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum OverflowPolicy {
    /// Fail the load.
    #[default]
    Reject,
    /// Map every further color onto the last palette slot.
    Clamp,
}

/// Dense 8x8x8 block of palette indices.
///
/// `materials[0]` is the implicit empty material; voxels reference slots
/// `1..materials.len()`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Brick {
    cells: VoxelGrid,
    materials: Vec<Material>,
}

impl Brick {
    /// Build a brick from raw cell values and its real materials (slot 1 first).
    pub fn from_parts(raw: &[u8], palette: &[Material]) -> Result<Self> {
        if palette.len() >= PALETTE_SLOTS {
            return Err(LoadError::PaletteOverflow {
                distinct: palette.len(),
            });
        }
        let cells = VoxelGrid::from_raw(BRICK_EXTENT, raw)?;
        if let Some(&index) = raw.iter().find(|&&v| v as usize > palette.len()) {
            return Err(LoadError::UnknownMaterial {
                index,
                available: palette.len(),
            });
        }

        let mut materials = Vec::with_capacity(palette.len() + 1);
        materials.push(Material::EMPTY);
        materials.extend_from_slice(palette);
        Ok(Self { cells, materials })
    }

    /// Decode a source model, assigning palette slots in first-seen order.
    pub fn from_source(scene: &SourceScene, policy: OverflowPolicy) -> Result<Self> {
        let model = &scene.model;
        if model.size != BRICK_EXTENT {
            return Err(LoadError::DimensionMismatch {
                expected: BRICK_EXTENT,
                found: model.size,
            });
        }
        if model.voxels.len() != BRICK_VOXELS {
            return Err(LoadError::VoxelCountMismatch {
                expected: BRICK_VOXELS,
                found: model.voxels.len(),
            });
        }

        let mut slot_of = [0u8; 256];
        let mut materials = vec![Material::EMPTY];
        let mut clamped = 0usize;
        let mut raw = [0u8; BRICK_VOXELS];

        for (out, &source_index) in raw.iter_mut().zip(&model.voxels) {
            if source_index == 0 {
                continue;
            }
            let known = slot_of[source_index as usize];
            if known != 0 {
                *out = known;
                continue;
            }
            if materials.len() < PALETTE_SLOTS {
                let slot = materials.len() as u8;
                materials.push(scene.palette.entry(source_index).to_material());
                slot_of[source_index as usize] = slot;
                *out = slot;
                continue;
            }
            match policy {
                OverflowPolicy::Reject => {
                    return Err(LoadError::PaletteOverflow {
                        distinct: distinct_colors(&model.voxels),
                    });
                }
                OverflowPolicy::Clamp => {
                    let last = (PALETTE_SLOTS - 1) as u8;
                    slot_of[source_index as usize] = last;
                    *out = last;
                    clamped += 1;
                }
            }
        }

        if clamped > 0 {
            tracing::warn!(
                clamped,
                "brick palette overflow, extra colors folded into slot {}",
                PALETTE_SLOTS - 1
            );
        }

        Ok(Self {
            cells: VoxelGrid::from_raw(BRICK_EXTENT, &raw)?,
            materials,
        })
    }

    /// Materials including the reserved empty slot 0.
    #[inline]
    pub fn materials(&self) -> &[Material] {
        &self.materials
    }

    /// Look up a palette slot.
    #[inline]
    pub fn material(&self, index: u8) -> Option<&Material> {
        self.materials.get(index as usize)
    }

    /// Number of real materials (excluding slot 0).
    #[inline]
    pub fn material_count(&self) -> usize {
        self.materials.len() - 1
    }

    /// Returns true if the brick has no solid voxels.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Palette packed for upload, unused slots zeroed.
    pub fn gpu_palette(&self) -> [GpuMaterial; PALETTE_SLOTS] {
        let mut out = [GpuMaterial::default(); PALETTE_SLOTS];
        for (slot, mat) in out.iter_mut().zip(&self.materials).skip(1) {
            *slot = mat.to_gpu();
        }
        out
    }
}

impl PackedCells for Brick {
    #[inline]
    fn cells(&self) -> &VoxelGrid {
        &self.cells
    }
}

fn distinct_colors(voxels: &[u8]) -> usize {
    let mut seen = [false; 256];
    for &v in voxels.iter().filter(|&&v| v != 0) {
        seen[v as usize] = true;
    }
    seen.iter().filter(|&&s| s).count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::raw_index;
    use crate::source::{SourceModel, SourcePalette, SourcePaletteEntry};
    use glam::IVec3;

    fn source_with(voxels: Vec<u8>) -> SourceScene {
        let mut palette = SourcePalette::default();
        for i in 1..=255u8 {
            palette.set(i, SourcePaletteEntry::solid(i, 255 - i, 7, 1.0));
        }
        SourceScene {
            model: SourceModel::new(BRICK_EXTENT, voxels),
            palette,
            camera: None,
        }
    }

    #[test]
    fn first_seen_palette_assignment() {
        let mut voxels = vec![0u8; BRICK_VOXELS];
        voxels[raw_index(BRICK_EXTENT, 0, 0, 0)] = 200;
        voxels[raw_index(BRICK_EXTENT, 0, 0, 1)] = 50;
        voxels[raw_index(BRICK_EXTENT, 3, 4, 5)] = 200;

        let brick = Brick::from_source(&source_with(voxels), OverflowPolicy::Reject).unwrap();
        assert_eq!(brick.material_count(), 2);
        assert_eq!(brick.materials()[0], Material::EMPTY);
        assert_eq!(brick.material(1).unwrap().rgb(), [200, 55, 7]);
        assert_eq!(brick.material(2).unwrap().rgb(), [50, 205, 7]);
        assert_eq!(brick.material(2).unwrap().roughness, 255);

        assert_eq!(brick.cell(IVec3::new(0, 0, 0)), 1);
        assert_eq!(brick.cell(IVec3::new(0, 0, 1)), 2);
        assert_eq!(brick.cell(IVec3::new(3, 4, 5)), 1);
        assert_eq!(brick.cell(IVec3::new(7, 7, 7)), 0);
    }

    #[test]
    fn wrong_dimensions_fail() {
        let mut scene = source_with(vec![0; 8 * 16 * 8]);
        scene.model.size = UVec3::new(8, 16, 8);
        let err = Brick::from_source(&scene, OverflowPolicy::Reject).unwrap_err();
        assert!(matches!(err, LoadError::DimensionMismatch { .. }));
    }

    #[test]
    fn sixteenth_color_is_rejected() {
        let voxels: Vec<u8> = (0..BRICK_VOXELS).map(|i| (i % 17) as u8).collect();
        let err = Brick::from_source(&source_with(voxels), OverflowPolicy::Reject).unwrap_err();
        assert!(matches!(err, LoadError::PaletteOverflow { distinct: 16 }));
    }

    #[test]
    fn sixteenth_color_is_clamped_on_request() {
        let voxels: Vec<u8> = (0..BRICK_VOXELS).map(|i| (i % 17) as u8).collect();
        let brick = Brick::from_source(&source_with(voxels), OverflowPolicy::Clamp).unwrap();
        assert_eq!(brick.material_count(), 15);
        let index_of_sixteenth = (0..BRICK_VOXELS).find(|i| i % 17 == 16).unwrap();
        // Decode the flat index back into coordinates.
        let z = index_of_sixteenth % 8;
        let x = (index_of_sixteenth / 8) % 8;
        let y = index_of_sixteenth / 64;
        assert_eq!(brick.cell(IVec3::new(x as i32, y as i32, z as i32)), 15);
    }

    #[test]
    fn from_parts_validates_palette() {
        let mut raw = [0u8; BRICK_VOXELS];
        raw[0] = 2;
        let err = Brick::from_parts(&raw, &[Material::from_rgb(1, 1, 1, 0, 0)]).unwrap_err();
        assert!(matches!(
            err,
            LoadError::UnknownMaterial {
                index: 2,
                available: 1
            }
        ));

        let too_many = vec![Material::default(); 16];
        assert!(Brick::from_parts(&raw, &too_many).is_err());
    }

    #[test]
    fn gpu_palette_layout() {
        let raw = [1u8; BRICK_VOXELS];
        let brick = Brick::from_parts(&raw, &[Material::from_rgb(1, 2, 3, 40, 5)]).unwrap();
        let palette = brick.gpu_palette();
        assert_eq!(palette[0], GpuMaterial::default());
        assert_eq!(palette[1].color_roughness, 0x0501_0203);
        assert_eq!(palette[1].emission, 40);
        assert_eq!(palette[2], GpuMaterial::default());
    }
}
