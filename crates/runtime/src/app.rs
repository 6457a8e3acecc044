//! # Ball Drop Drivers
//!
//! Two ways to drive the [`FrameSynchronizer`](crate::sync::FrameSynchronizer):
//!
//! - [`run_windowed`] hands the scene to [`render::run`] and performs one
//!   synchronizer frame in the pre-render hook, right before every draw.
//! - [`run_headless`] calls the synchronizer in a plain loop against the CPU
//!   scene graph. Nothing is drawn, but every frame goes through exactly the
//!   same steps, which makes it suitable for CI and profiling.

use anyhow::Result;
use glam::Vec3;
use render::WindowConfig;

use crate::config::SceneConfig;
use crate::setup::{self, Demo};

/// Headless progress is logged every this many frames
const LOG_INTERVAL: u64 = 100;

/// Open a window and run the demo until it is closed.
///
/// # Errors
///
/// Returns setup failures, window or GPU initialization failures, and the
/// first synchronizer error, which also stops the render loop.
pub fn run_windowed(config: &SceneConfig) -> Result<()> {
    let Demo {
        mut world,
        scene,
        mut synchronizer,
    } = setup::build_demo(config)?;

    tracing::info!("Starting render loop...");
    render::run(&WindowConfig::default(), scene, move |scene| {
        synchronizer.on_before_render(&mut world, scene)?;
        Ok(())
    })
}

/// Final state of a headless run
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HeadlessReport {
    pub frames: u64,
    pub resets: u64,
    /// Counter value after the last frame
    pub frame_counter: u32,
    /// Visual position of the sphere after the last frame
    pub sphere_position: Vec3,
    pub physics_steps: u64,
}

/// Run `frames` synchronizer frames without opening a window.
///
/// # Errors
///
/// Returns setup failures and the first synchronizer error.
pub fn run_headless(config: &SceneConfig, frames: u64) -> Result<HeadlessReport> {
    let Demo {
        mut world,
        mut scene,
        mut synchronizer,
    } = setup::build_demo(config)?;

    tracing::info!("Starting headless loop for {} frames...", frames);
    for i in 0..frames {
        if let Err(e) = synchronizer.on_before_render(&mut world, &mut scene) {
            tracing::error!("Synchronizer failed on frame {}: {e}", i + 1);
            return Err(e.into());
        }
        if (i + 1) % LOG_INTERVAL == 0 {
            tracing::info!(
                "Frame {} complete. Sphere_y: {:.3}, resets: {}",
                i + 1,
                scene.mesh(synchronizer.mesh())?.transform.position.y,
                synchronizer.resets()
            );
        }
    }

    let report = HeadlessReport {
        frames,
        resets: synchronizer.resets(),
        frame_counter: synchronizer.frame(),
        sphere_position: scene.mesh(synchronizer.mesh())?.transform.position,
        physics_steps: world.steps(),
    };
    tracing::info!("Headless loop finished: {report:?}");
    Ok(report)
}
