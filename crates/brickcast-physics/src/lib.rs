//! Raycasting and camera collision against packed voxel grids.
//!
//! Everything here reads the world through [`OccupancyQuery`], so the same
//! code drives a loaded scene, a procedural one, or a plain closure.

pub mod config;
pub mod controller;
pub mod raycast;
pub mod sweep;

pub use brickcast_core::OccupancyQuery;
pub use config::MovementConfig;
pub use controller::{CameraController, MoveDirection};
pub use raycast::{axis_sign, cast, RayHit};
pub use sweep::{probe_offsets, sweep};
