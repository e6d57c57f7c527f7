//! Movement tuning.

use brickcast_core::constants::VOXEL_SIZE;
use serde::{Deserialize, Serialize};

/// Smallest decrement the overlap clamp will use.
const MIN_CLAMP_STEP: f32 = 1e-4;

/// Camera movement and collision parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MovementConfig {
    /// Downward acceleration in units per second squared.
    pub gravity: f32,
    /// Vertical velocity set when jumping from the ground.
    pub jump_force: f32,
    /// Half the edge of the cube the probe rays start from.
    pub collider_half_width: f32,
    /// Edge length of one voxel in world units.
    pub voxel_size: f32,
    /// Length of the ground and ceiling contact probes.
    pub probe_distance: f32,
    /// How much the overlap clamp shortens a blocked move per retry.
    pub clamp_step: f32,
    /// How far corner probes are pulled toward their face center (0..=1).
    pub corner_blend: f32,
    /// Initial translation speed in units per second.
    pub movement_speed: f32,
    /// Degrees of rotation per unit of mouse offset.
    pub mouse_sensitivity: f32,
    /// Probe displacement below which a contact is reported.
    pub contact_epsilon: f32,
}

impl Default for MovementConfig {
    fn default() -> Self {
        Self {
            gravity: 3.0,
            jump_force: 1.2,
            collider_half_width: 0.05,
            voxel_size: VOXEL_SIZE,
            probe_distance: 0.1,
            clamp_step: 0.01,
            corner_blend: 0.8,
            movement_speed: 2.5,
            mouse_sensitivity: 0.1,
            contact_epsilon: 1e-4,
        }
    }
}

impl MovementConfig {
    /// Overlap clamp decrement, never small enough to stall the retry loop.
    #[inline]
    pub fn effective_clamp_step(&self) -> f32 {
        if self.clamp_step.is_finite() {
            self.clamp_step.max(MIN_CLAMP_STEP)
        } else {
            MIN_CLAMP_STEP
        }
    }
}
