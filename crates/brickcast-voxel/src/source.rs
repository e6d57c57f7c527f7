//! Decoded source models handed over by an external voxel file parser.
//!
//! The parser is responsible for reading the asset format and permuting axes
//! so that Y is vertical. Everything here is plain data.

use brickcast_core::Material;
use glam::{UVec3, Vec3};

/// Number of entries in a source palette.
pub const SOURCE_PALETTE_LEN: usize = 256;

/// One entry of the 256-color source palette.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SourcePaletteEntry {
    /// RGBA color
    pub color: [u8; 4],
    /// Emission factor
    pub emit: f32,
    /// Emission power exponent (base 10)
    pub flux: f32,
    /// Roughness in `[0, 1]`
    pub rough: f32,
}

impl Default for SourcePaletteEntry {
    fn default() -> Self {
        Self {
            color: [0, 0, 0, 255],
            emit: 0.0,
            flux: 0.0,
            rough: 0.0,
        }
    }
}

impl SourcePaletteEntry {
    /// Opaque, non-emissive entry.
    pub const fn solid(r: u8, g: u8, b: u8, rough: f32) -> Self {
        Self {
            color: [r, g, b, 255],
            emit: 0.0,
            flux: 0.0,
            rough,
        }
    }

    /// Emission intensity as `emit * 10^flux`.
    #[inline]
    pub fn intensity(&self) -> f32 {
        self.emit * 10f32.powf(self.flux)
    }

    /// Convert into a brick material.
    ///
    /// Emission and roughness saturate into their integer ranges.
    pub fn to_material(&self) -> Material {
        let [r, g, b, _] = self.color;
        Material::from_rgb(
            r,
            g,
            b,
            (self.intensity() * 100.0) as u16,
            (self.rough * 255.0) as u8,
        )
    }
}

/// Palette accompanying a source model. Index 0 is unused (air).
#[derive(Clone, Debug, PartialEq)]
pub struct SourcePalette {
    entries: Vec<SourcePaletteEntry>,
}

impl Default for SourcePalette {
    fn default() -> Self {
        Self {
            entries: vec![SourcePaletteEntry::default(); SOURCE_PALETTE_LEN],
        }
    }
}

impl SourcePalette {
    /// Build a palette; missing trailing entries default to black.
    pub fn new(mut entries: Vec<SourcePaletteEntry>) -> Self {
        entries.resize(SOURCE_PALETTE_LEN, SourcePaletteEntry::default());
        entries.truncate(SOURCE_PALETTE_LEN);
        Self { entries }
    }

    /// Replace one entry.
    pub fn set(&mut self, index: u8, entry: SourcePaletteEntry) {
        self.entries[index as usize] = entry;
    }

    /// Look up an entry.
    #[inline]
    pub fn entry(&self, index: u8) -> &SourcePaletteEntry {
        &self.entries[index as usize]
    }
}

/// Dense model: per-cell palette indices in `raw_index` layout.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SourceModel {
    pub size: UVec3,
    pub voxels: Vec<u8>,
}

impl SourceModel {
    pub fn new(size: UVec3, voxels: Vec<u8>) -> Self {
        Self { size, voxels }
    }
}

/// Orbit camera stored alongside a source scene.
///
/// `focus` is in the source's own axes (Z up), `angle` in degrees.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct OrbitCamera {
    pub focus: Vec3,
    pub angle: Vec3,
    pub radius: f32,
}

/// Everything the parser extracts from one source file.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SourceScene {
    pub model: SourceModel,
    pub palette: SourcePalette,
    pub camera: Option<OrbitCamera>,
}
