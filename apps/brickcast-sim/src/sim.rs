//! Scripted camera simulation.

use std::fmt;

use brickcast_physics::{CameraController, MoveDirection, MovementConfig};
use brickcast_voxel::Scene;
use glam::{IVec3, Vec3};
use tracing::{debug, info};

/// Simulation parameters (from CLI or defaults).
#[derive(Debug, Clone, PartialEq)]
pub struct SimParams {
    pub frames: u32,
    pub dt: f32,
    pub fly: bool,
    pub walk: bool,
    pub jump_every: Option<u32>,
    pub arena_size: u32,
}

impl Default for SimParams {
    fn default() -> Self {
        Self {
            frames: 600,
            dt: 1.0 / 60.0,
            fly: false,
            walk: false,
            jump_every: None,
            arena_size: 8,
        }
    }
}

impl SimParams {
    /// Parse simulation parameters from command line arguments.
    pub fn from_args() -> Self {
        Self::parse(std::env::args().skip(1))
    }

    /// Parse from an argument list without the program name. Unknown flags
    /// and unparsable values are ignored.
    pub fn parse(args: impl IntoIterator<Item = String>) -> Self {
        let mut params = Self::default();
        let args: Vec<String> = args.into_iter().collect();

        let mut i = 0;
        while i < args.len() {
            let value = args.get(i + 1);
            match args[i].as_str() {
                "--frames" => {
                    if let Some(v) = value.and_then(|v| v.parse().ok()) {
                        params.frames = v;
                        i += 1;
                    }
                }
                "--dt" => {
                    if let Some(v) = value.and_then(|v| v.parse().ok()) {
                        params.dt = v;
                        i += 1;
                    }
                }
                "--jump-every" => {
                    if let Some(v) = value.and_then(|v| v.parse().ok()) {
                        params.jump_every = Some(v).filter(|&n| n > 0);
                        i += 1;
                    }
                }
                "--size" => {
                    if let Some(v) = value.and_then(|v| v.parse().ok()) {
                        params.arena_size = v;
                        i += 1;
                    }
                }
                "--fly" => params.fly = true,
                "--walk" => params.walk = true,
                _ => {}
            }
            i += 1;
        }

        params
    }
}

/// Final camera state after a run.
#[derive(Debug, Clone, Copy)]
pub struct Summary {
    pub frames: u32,
    pub position: Vec3,
    pub y_velocity: f32,
    pub grounded: bool,
    pub head_blocked: bool,
    pub landings: u32,
}

impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "frames={} position=({:.3}, {:.3}, {:.3}) y_velocity={:.3} grounded={} head_blocked={} landings={}",
            self.frames,
            self.position.x,
            self.position.y,
            self.position.z,
            self.y_velocity,
            self.grounded,
            self.head_blocked,
            self.landings,
        )
    }
}

/// Camera driven by a fixed input script over a scene.
pub struct Simulation {
    scene: Scene,
    camera: CameraController,
    grid: IVec3,
    params: SimParams,
    landings: u32,
}

impl Simulation {
    pub fn new(scene: Scene, params: SimParams) -> Self {
        let mut camera =
            CameraController::from_pose(scene.brick_map().camera, MovementConfig::default());
        camera.no_clip = params.fly;
        let grid = scene.voxel_grid_size();
        Self {
            scene,
            camera,
            grid,
            params,
            landings: 0,
        }
    }

    pub fn camera(&self) -> &CameraController {
        &self.camera
    }

    /// Advance one frame: scripted input, then gravity.
    pub fn step(&mut self, frame: u32) {
        let dt = self.params.dt;
        let was_grounded = self.camera.is_grounded();
        let was_blocked = self.camera.is_head_blocked();

        if self.params.jump_every.and_then(|n| frame.checked_rem(n)) == Some(0) {
            self.camera
                .process_keyboard(MoveDirection::Up, dt, &self.scene, self.grid);
        }
        if self.params.walk {
            self.camera
                .process_keyboard(MoveDirection::Forward, dt, &self.scene, self.grid);
            // Turn slowly so the walk sweeps along walls and around the pillar.
            self.camera.process_mouse_movement(2.0, 0.0, true);
        }
        self.camera.update(dt, &self.scene, self.grid);

        if self.camera.is_grounded() != was_grounded {
            if self.camera.is_grounded() {
                self.landings += 1;
            }
            debug!(
                frame,
                grounded = self.camera.is_grounded(),
                y = self.camera.position.y,
                "ground contact changed"
            );
        }
        if self.camera.is_head_blocked() && !was_blocked {
            debug!(frame, y = self.camera.position.y, "head bump");
        }
    }

    /// Run `frames` steps and report the final state.
    pub fn run(&mut self, frames: u32) -> Summary {
        info!(
            frames,
            fly = self.camera.no_clip,
            start = %self.camera.position,
            "simulation started"
        );
        for frame in 0..frames {
            self.step(frame);
        }
        Summary {
            frames,
            position: self.camera.position,
            y_velocity: self.camera.y_velocity,
            grounded: self.camera.is_grounded(),
            head_blocked: self.camera.is_head_blocked(),
            landings: self.landings,
        }
    }
}
