//! Brickcast headless simulation.
//!
//! Generates a small brick arena, drops a camera into it and runs the
//! movement controller for a fixed number of frames.
//!
//! ## Usage
//!
//! ```bash
//! # Fall onto the floor and stand still
//! cargo run -p brickcast-sim
//!
//! # Walk in circles, jumping every second
//! cargo run -p brickcast-sim -- --walk --jump-every 60 --frames 1200
//! ```
//!
//! ## Environment Variables
//!
//! - `RUST_LOG`: Set log level (e.g., info, debug, trace)

mod sim;

use anyhow::{ensure, Context};
use brickcast_voxel::PackedCells;
use brickcast_world::{ArenaConfig, ArenaGenerator};
use glam::UVec3;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::sim::{SimParams, Simulation};

/// Arena height in bricks.
const ARENA_HEIGHT: u32 = 8;

fn main() -> anyhow::Result<()> {
    if std::env::args().any(|arg| arg == "-h" || arg == "--help") {
        print_help();
        return Ok(());
    }

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let params = SimParams::from_args();
    ensure!(
        params.dt.is_finite() && params.dt > 0.0,
        "--dt must be a positive number of seconds"
    );
    ensure!(params.arena_size >= 3, "--size must be at least 3 bricks");

    let scene = ArenaGenerator::new(ArenaConfig {
        size: UVec3::new(params.arena_size, ARENA_HEIGHT, params.arena_size),
        ..Default::default()
    })
    .generate()
    .context("failed to generate arena")?;

    info!(
        bricks = scene.bricks().len(),
        map_bytes = scene.brick_map().cells().as_bytes().len(),
        brick_words = scene.brick_words().len(),
        materials = scene.material_buffer().len(),
        "arena ready"
    );

    let frames = params.frames;
    let mut sim = Simulation::new(scene, params);
    let summary = sim.run(frames);

    let pose = sim.camera().pose();
    info!(yaw = pose.yaw, pitch = pose.pitch, "final heading");
    println!("{summary}");

    Ok(())
}

fn print_help() {
    eprintln!(
        "Brickcast headless camera simulation

USAGE:
    cargo run -p brickcast-sim -- [OPTIONS]

OPTIONS:
    --frames <N>        Number of frames to simulate (default: 600)
    --dt <SECONDS>      Frame time step (default: 0.016667)
    --fly               Start in no-clip mode (no gravity or collision)
    --walk              Walk forward while slowly turning
    --jump-every <N>    Jump every N frames when on the ground
    --size <N>          Arena width and depth in bricks (default: 8)
    -h, --help          Print this help message"
    );
}
