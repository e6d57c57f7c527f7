//! Top-level sparse grid referencing bricks.

use brickcast_core::{CameraPose, Result};
use glam::{IVec3, UVec3, Vec3};

use crate::grid::{PackedCells, VoxelGrid};
use crate::source::{OrbitCamera, SourceScene};

/// Palette slot holding the environment light in source scenes.
const ENVIRONMENT_SLOT: u8 = 255;

/// Grid of brick ids. A cell value `k > 0` refers to `bricks[k - 1]`;
/// 0 is air.
#[derive(Clone, Debug, PartialEq)]
pub struct BrickMap {
    cells: VoxelGrid,
    /// Ambient environment color
    pub env_color: Vec3,
    /// Initial camera placement in map units
    pub camera: CameraPose,
}

impl BrickMap {
    /// Create an empty map of the given extents (height a multiple of 8).
    pub fn new(size: UVec3) -> Result<Self> {
        let cells = VoxelGrid::new(size)?;
        Ok(Self {
            camera: default_pose(size),
            cells,
            env_color: Vec3::ZERO,
        })
    }

    /// Decode a source scene whose model values are brick ids.
    pub fn from_source(scene: &SourceScene) -> Result<Self> {
        let size = scene.model.size;
        let cells = VoxelGrid::from_raw(size, &scene.model.voxels)?;

        let env = scene.palette.entry(ENVIRONMENT_SLOT);
        let [r, g, b, _] = env.color;
        let env_color =
            Vec3::new(f32::from(r), f32::from(g), f32::from(b)) * env.intensity() / 255.0;

        let camera = scene
            .camera
            .map_or_else(|| default_pose(size), |orbit| pose_from_orbit(&orbit, size));

        Ok(Self {
            cells,
            env_color,
            camera,
        })
    }

    /// Brick id at a map cell (0 outside the map).
    #[inline]
    pub fn brick_at(&self, pos: IVec3) -> u8 {
        self.cells.get_at(pos)
    }

    /// Place a brick id; ignored outside the map or above 15.
    #[inline]
    pub fn set_brick(&mut self, pos: IVec3, id: u8) {
        self.cells.set_at(pos, id);
    }

    /// Map extents in bricks.
    #[inline]
    pub const fn size(&self) -> UVec3 {
        self.cells.size()
    }

    /// Largest brick id referenced by any cell.
    pub fn max_brick_id(&self) -> u8 {
        self.cells
            .words()
            .iter()
            .flat_map(|&w| (0..8).map(move |i| ((w >> (i * 4)) & 0xF) as u8))
            .max()
            .unwrap_or(0)
    }
}

impl PackedCells for BrickMap {
    #[inline]
    fn cells(&self) -> &VoxelGrid {
        &self.cells
    }
}

/// Convert an orbit camera (Z-up source axes) into a pose in map space.
pub fn pose_from_orbit(orbit: &OrbitCamera, size: UVec3) -> CameraPose {
    let pitch = orbit.angle.x;
    let yaw = -orbit.angle.y;
    let (pitch_rad, yaw_rad) = (pitch.to_radians(), yaw.to_radians());
    let front = Vec3::new(
        pitch_rad.cos() * yaw_rad.sin(),
        pitch_rad.sin(),
        pitch_rad.cos() * yaw_rad.cos(),
    );
    let focus = Vec3::new(
        orbit.focus.x + size.x as f32 / 2.0,
        orbit.focus.z,
        orbit.focus.y + size.z as f32 / 2.0,
    );
    CameraPose {
        position: focus - orbit.radius * front,
        yaw,
        pitch,
    }
}

fn default_pose(size: UVec3) -> CameraPose {
    CameraPose {
        position: Vec3::new(size.x as f32 / 2.0, size.y as f32, size.z as f32 / 2.0),
        yaw: 0.0,
        pitch: 0.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::raw_index;
    use crate::source::{SourceModel, SourcePalette, SourcePaletteEntry};
    use approx::assert_relative_eq;
    use brickcast_core::LoadError;

    fn scene(size: UVec3, voxels: Vec<u8>) -> SourceScene {
        SourceScene {
            model: SourceModel::new(size, voxels),
            palette: SourcePalette::default(),
            camera: None,
        }
    }

    #[test]
    fn height_must_be_multiple_of_eight() {
        let size = UVec3::new(2, 4, 2);
        let err = BrickMap::from_source(&scene(size, vec![0; 16])).unwrap_err();
        assert!(matches!(err, LoadError::InvalidHeight { height: 4 }));
    }

    #[test]
    fn brick_ids_above_fifteen_fail() {
        let size = UVec3::new(1, 8, 1);
        let mut voxels = vec![0; 8];
        voxels[3] = 20;
        let err = BrickMap::from_source(&scene(size, voxels)).unwrap_err();
        assert!(matches!(err, LoadError::BrickIndexOverflow { value: 20 }));
    }

    #[test]
    fn decodes_brick_ids() {
        let size = UVec3::new(2, 8, 3);
        let mut voxels = vec![0; 48];
        voxels[raw_index(size, 1, 6, 2)] = 4;
        let map = BrickMap::from_source(&scene(size, voxels)).unwrap();
        assert_eq!(map.brick_at(IVec3::new(1, 6, 2)), 4);
        assert_eq!(map.brick_at(IVec3::new(0, 6, 2)), 0);
        assert_eq!(map.max_brick_id(), 4);
    }

    #[test]
    fn environment_color_from_last_palette_slot() {
        let size = UVec3::new(1, 8, 1);
        let mut source = scene(size, vec![0; 8]);
        source.palette.set(
            255,
            SourcePaletteEntry {
                color: [255, 51, 0, 255],
                emit: 0.5,
                flux: 0.0,
                rough: 0.0,
            },
        );
        let map = BrickMap::from_source(&source).unwrap();
        assert_relative_eq!(map.env_color.x, 0.5);
        assert_relative_eq!(map.env_color.y, 0.1);
        assert_relative_eq!(map.env_color.z, 0.0);
    }

    #[test]
    fn orbit_camera_pose() {
        let orbit = OrbitCamera {
            focus: Vec3::new(1.0, 2.0, 3.0),
            angle: Vec3::ZERO,
            radius: 10.0,
        };
        let pose = pose_from_orbit(&orbit, UVec3::new(8, 8, 16));
        // Looking down +Z with no pitch: step back along Z from the focus.
        assert_relative_eq!(pose.position.x, 5.0);
        assert_relative_eq!(pose.position.y, 3.0);
        assert_relative_eq!(pose.position.z, 0.0);
        assert_relative_eq!(pose.yaw, 0.0);
        assert_relative_eq!(pose.pitch, 0.0);
    }

    #[test]
    fn missing_camera_uses_map_top() {
        let map = BrickMap::new(UVec3::new(4, 8, 6)).unwrap();
        assert_eq!(map.camera.position, Vec3::new(2.0, 8.0, 3.0));
    }
}
