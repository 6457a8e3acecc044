#![deny(clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions, clippy::must_use_candidate)]
//! # Ball Drop Runtime
//!
//! Couples a rapier physics world to the scene graph: a dynamic sphere falls
//! onto a tilted ground box, its visual mesh follows the rigid body every
//! frame, and the physics debug wireframe is drawn on top as a line overlay.
//! The sphere is put back at its spawn point every 400 frames.
//!
//! The per-frame logic lives in [`sync`]; [`setup`] builds the world and
//! scene once from a [`config::SceneConfig`]; [`app`] provides the windowed
//! and headless drivers used by the `ball_drop` binary.

pub mod app;
pub mod config;
pub mod setup;
pub mod sync;

pub use app::{run_headless, run_windowed, HeadlessReport};
pub use config::SceneConfig;
pub use setup::{build_demo, build_scene, Demo};
pub use sync::{
    decode_debug_buffers, DebugBufferError, DemoSynchronizer, FrameSynchronizer, OverlayPort,
    SimulationPort, SyncError,
};
