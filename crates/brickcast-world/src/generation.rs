//! Procedural test arenas.

use brickcast_core::constants::BRICK_VOXELS;
use brickcast_core::{CameraPose, Material, Result};
use brickcast_voxel::{raw_index, Brick, BrickMap, Scene, BRICK_EXTENT};
use glam::{IVec3, UVec3, Vec3};
use serde::{Deserialize, Serialize};

/// Brick id of the solid stone brick.
pub const SOLID_BRICK: u8 = 1;
/// Brick id of the hollow frame brick.
pub const FRAME_BRICK: u8 = 2;

/// Arena layout, in bricks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ArenaConfig {
    /// Map extents. Height must be a multiple of 8.
    pub size: UVec3,
    /// Number of solid floor layers.
    pub floor_height: u32,
    /// Height of the perimeter walls above the floor (0 for none).
    pub wall_height: u32,
    /// Height of the frame-brick pillar in the middle (0 for none).
    pub pillar_height: u32,
}

impl Default for ArenaConfig {
    fn default() -> Self {
        Self {
            size: UVec3::new(8, 8, 8),
            floor_height: 1,
            wall_height: 2,
            pillar_height: 4,
        }
    }
}

/// Builds a floor, walls and a pillar out of two bricks.
#[derive(Debug, Clone, Default)]
pub struct ArenaGenerator {
    config: ArenaConfig,
}

impl ArenaGenerator {
    pub fn new(config: ArenaConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ArenaConfig {
        &self.config
    }

    /// Generate the arena scene.
    pub fn generate(&self) -> Result<Scene> {
        let ArenaConfig {
            size,
            floor_height,
            wall_height,
            pillar_height,
        } = self.config;
        let mut map = BrickMap::new(size)?;
        let center = self.pillar_column();

        for z in 0..size.z {
            for x in 0..size.x {
                let on_edge = x == 0 || z == 0 || x + 1 == size.x || z + 1 == size.z;
                let column_top = if on_edge {
                    floor_height + wall_height
                } else {
                    floor_height
                };
                for y in 0..column_top.min(size.y) {
                    map.set_brick(IVec3::new(x as i32, y as i32, z as i32), SOLID_BRICK);
                }
                if (x, z) == center {
                    let top = (floor_height + pillar_height).min(size.y);
                    for y in floor_height..top {
                        map.set_brick(IVec3::new(x as i32, y as i32, z as i32), FRAME_BRICK);
                    }
                }
            }
        }

        map.camera = self.spawn_pose();
        map.env_color = Vec3::new(0.6, 0.7, 0.9);

        Scene::new(map, vec![solid_brick()?, frame_brick()?])
    }

    /// Standing position above the floor, between the wall and the pillar.
    pub fn spawn_pose(&self) -> CameraPose {
        let size = self.config.size;
        CameraPose {
            position: Vec3::new(
                size.x as f32 / 4.0 + 0.5,
                self.config.floor_height as f32 + 0.5,
                size.z as f32 / 4.0 + 0.5,
            ),
            yaw: 45.0,
            pitch: 0.0,
        }
    }

    fn pillar_column(&self) -> (u32, u32) {
        (self.config.size.x / 2, self.config.size.z / 2)
    }
}

/// Fully solid brick with a two-tone stone pattern.
fn solid_brick() -> Result<Brick> {
    let mut raw = [0u8; BRICK_VOXELS];
    for_each_cell(|x, y, z| {
        raw[raw_index(BRICK_EXTENT, x, y, z)] = if (x + y + z) % 2 == 0 { 1 } else { 2 };
    });
    Brick::from_parts(
        &raw,
        &[
            Material::from_rgb(120, 120, 128, 0, 230),
            Material::from_rgb(104, 104, 110, 0, 240),
        ],
    )
}

/// Brick whose twelve edges are solid, with a glowing 2x2x2 core.
fn frame_brick() -> Result<Brick> {
    let mut raw = [0u8; BRICK_VOXELS];
    for_each_cell(|x, y, z| {
        let boundary = [x, y, z].iter().filter(|&&c| c == 0 || c == 7).count();
        let core = [x, y, z].iter().all(|&c| c == 3 || c == 4);
        raw[raw_index(BRICK_EXTENT, x, y, z)] = if boundary >= 2 {
            1
        } else if core {
            2
        } else {
            0
        };
    });
    Brick::from_parts(
        &raw,
        &[
            Material::from_rgb(200, 170, 90, 0, 60),
            Material::from_rgb(255, 240, 200, 800, 255),
        ],
    )
}

fn for_each_cell(mut f: impl FnMut(u32, u32, u32)) {
    for y in 0..BRICK_EXTENT.y {
        for x in 0..BRICK_EXTENT.x {
            for z in 0..BRICK_EXTENT.z {
                f(x, y, z);
            }
        }
    }
}
