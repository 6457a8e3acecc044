#![deny(clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions, clippy::must_use_candidate)]
//! # Physics World Facade
//!
//! A thin, handle-based layer over [`rapier3d`] for the ball-drop demo.
//!
//! The crate does not implement any physics itself. It owns the rapier sets
//! and pipelines, hides rapier's `nalgebra` types behind `glam`, and exposes
//! exactly what a render loop needs: creation descriptors, transform
//! getters/setters, a fixed-timestep [`PhysicsWorld::step`], and flat
//! debug-line buffers from [`PhysicsWorld::debug_render`].
//!
//! ```rust,ignore
//! use glam::Vec3;
//! use physics::{ColliderDesc, PhysicsWorld, RigidBodyDesc};
//!
//! let mut world = PhysicsWorld::new(Vec3::new(0.0, -9.81, 0.0));
//! world.create_collider(&ColliderDesc::cuboid(3.0, 0.05, 3.0), None)?;
//! let body = world.create_rigid_body(&RigidBodyDesc::dynamic().with_translation(2.5, 5.0, 0.0));
//! world.create_collider(&ColliderDesc::ball(1.0), Some(body))?;
//! world.step();
//! ```

pub mod builder;
pub mod debug;
pub mod error;
pub mod transform;
pub mod world;

pub use builder::{BodyKind, BodyPose, ColliderDesc, RigidBodyDesc, Shape};
pub use debug::{DebugRenderBuffers, COLOR_STRIDE, POSITION_STRIDE};
pub use error::PhysicsError;
pub use world::{BodyHandle, ColliderHandle, PhysicsWorld};
