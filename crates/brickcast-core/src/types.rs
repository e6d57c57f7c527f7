//! Core voxel payload types.

use bytemuck::{Pod, Zeroable};
use glam::Vec3;
use serde::{Deserialize, Serialize};

/// Material properties of one brick palette slot.
///
/// Slot 0 of every palette is the implicit empty material and is never
/// referenced by a voxel.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Material {
    /// Packed RGB color (`r << 16 | g << 8 | b`)
    pub color: u32,
    /// Emission intensity
    pub emission: u16,
    /// Roughness (0 = mirror, 255 = diffuse)
    pub roughness: u8,
}

impl Material {
    /// The reserved empty material
    pub const EMPTY: Self = Self {
        color: 0,
        emission: 0,
        roughness: 0,
    };

    /// Create a material from its packed components.
    #[inline]
    pub const fn new(color: u32, emission: u16, roughness: u8) -> Self {
        Self {
            color: color & 0x00FF_FFFF,
            emission,
            roughness,
        }
    }

    /// Create a material from separate 8-bit color channels.
    #[inline]
    pub const fn from_rgb(r: u8, g: u8, b: u8, emission: u16, roughness: u8) -> Self {
        Self::new(
            (r as u32) << 16 | (g as u32) << 8 | b as u32,
            emission,
            roughness,
        )
    }

    /// Color channels as `[r, g, b]`.
    #[inline]
    pub const fn rgb(&self) -> [u8; 3] {
        [
            (self.color >> 16) as u8,
            (self.color >> 8) as u8,
            self.color as u8,
        ]
    }

    /// Pack into the layout the renderer uploads.
    #[inline]
    pub const fn to_gpu(self) -> GpuMaterial {
        GpuMaterial {
            color_roughness: self.color | (self.roughness as u32) << 24,
            emission: self.emission as u32,
        }
    }
}

/// GPU material entry (two 32-bit words).
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Pod, Zeroable)]
pub struct GpuMaterial {
    /// `color | roughness << 24`
    pub color_roughness: u32,
    /// Emission intensity widened to 32 bits
    pub emission: u32,
}

/// Camera placement recovered from scene metadata.
///
/// Angles are in degrees.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct CameraPose {
    pub position: Vec3,
    pub yaw: f32,
    pub pitch: f32,
}
