//! # Frame Synchronizer
//!
//! Keeps the rendered sphere in step with its rigid body and mirrors the
//! physics debug wireframe into a line-system overlay. One call to
//! [`FrameSynchronizer::on_before_render`] is one frame:
//!
//! 1. read the body translation and collider rotation
//! 2. write both onto the visual mesh
//! 3. render the physics debug buffers and decode them
//! 4. create the overlay on the first frame, update it in place afterwards
//! 5. step the physics world once
//! 6. reset the body when the frame counter reaches the interval, otherwise
//!    advance the counter
//!
//! The synchronizer talks to physics and rendering only through
//! [`SimulationPort`] and [`OverlayPort`], implemented here for
//! [`PhysicsWorld`] and [`Scene`].

use std::fmt::Debug;

use glam::{Quat, Vec3, Vec4};
use physics::{
    BodyHandle, BodyPose, ColliderHandle, DebugRenderBuffers, PhysicsError, PhysicsWorld,
    COLOR_STRIDE, POSITION_STRIDE,
};
use render::{LineSystemOptions, MeshId, Scene, SceneError};
use thiserror::Error;

/// Name given to the debug overlay mesh
pub const OVERLAY_NAME: &str = "linesystem";

/// Frames between two resets in the stock demo
pub const DEFAULT_RESET_INTERVAL: u32 = 400;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum DebugBufferError {
    #[error("{buffer} buffer has {len} floats, not a multiple of {stride}")]
    Misaligned {
        buffer: &'static str,
        len: usize,
        stride: usize,
    },
    #[error("debug buffers decode to {points} points but {colors} colors")]
    CountMismatch { points: usize, colors: usize },
}

/// Failure of a single frame. All variants are fatal for the session.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SyncError {
    #[error(transparent)]
    Physics(#[from] PhysicsError),
    #[error(transparent)]
    Scene(#[from] SceneError),
    #[error("malformed debug render output: {0}")]
    DebugBuffer(#[from] DebugBufferError),
}

/// What the synchronizer needs from the physics side
pub trait SimulationPort {
    type Body: Copy + Debug;
    type Collider: Copy + Debug;

    /// # Errors
    ///
    /// Fails if `body` does not belong to this simulation.
    fn body_translation(&self, body: Self::Body) -> Result<Vec3, SyncError>;

    /// # Errors
    ///
    /// Fails if `collider` does not belong to this simulation.
    fn collider_rotation(&self, collider: Self::Collider) -> Result<Quat, SyncError>;

    fn debug_render(&mut self) -> DebugRenderBuffers;

    /// Advance by one fixed timestep
    fn step(&mut self);

    /// Overwrite the full kinematic state of `body`
    ///
    /// # Errors
    ///
    /// Fails if `body` does not belong to this simulation.
    fn reset_body(&mut self, body: Self::Body, pose: &BodyPose) -> Result<(), SyncError>;
}

/// What the synchronizer needs from the render side
pub trait OverlayPort {
    type Mesh: Copy + Debug + PartialEq;

    /// Overwrite the absolute position and rotation of `mesh`
    ///
    /// # Errors
    ///
    /// Fails if `mesh` is unknown.
    fn set_pose(&mut self, mesh: Self::Mesh, position: Vec3, rotation: Quat)
        -> Result<(), SyncError>;

    /// # Errors
    ///
    /// Fails if a line has a different number of points and colors.
    fn create_line_system(
        &mut self,
        name: &str,
        options: LineSystemOptions,
    ) -> Result<Self::Mesh, SyncError>;

    /// Replace points and colors of an updatable line system in place
    ///
    /// # Errors
    ///
    /// Fails if `mesh` is unknown, not an updatable line system, or the new
    /// geometry has mismatched point and color counts.
    fn update_line_system(
        &mut self,
        mesh: Self::Mesh,
        lines: Vec<Vec<Vec3>>,
        colors: Vec<Vec<Vec4>>,
    ) -> Result<(), SyncError>;
}

impl SimulationPort for PhysicsWorld {
    type Body = BodyHandle;
    type Collider = ColliderHandle;

    fn body_translation(&self, body: BodyHandle) -> Result<Vec3, SyncError> {
        Ok(self.translation(body)?)
    }

    fn collider_rotation(&self, collider: ColliderHandle) -> Result<Quat, SyncError> {
        Ok(PhysicsWorld::collider_rotation(self, collider)?)
    }

    fn debug_render(&mut self) -> DebugRenderBuffers {
        PhysicsWorld::debug_render(self)
    }

    fn step(&mut self) {
        PhysicsWorld::step(self);
    }

    fn reset_body(&mut self, body: BodyHandle, pose: &BodyPose) -> Result<(), SyncError> {
        Ok(PhysicsWorld::reset_body(self, body, pose)?)
    }
}

impl OverlayPort for Scene {
    type Mesh = MeshId;

    fn set_pose(&mut self, mesh: MeshId, position: Vec3, rotation: Quat) -> Result<(), SyncError> {
        self.set_absolute_position(mesh, position)?;
        self.set_rotation_quaternion(mesh, rotation)?;
        Ok(())
    }

    fn create_line_system(
        &mut self,
        name: &str,
        options: LineSystemOptions,
    ) -> Result<MeshId, SyncError> {
        Ok(Scene::create_line_system(self, name, options)?)
    }

    fn update_line_system(
        &mut self,
        mesh: MeshId,
        lines: Vec<Vec<Vec3>>,
        colors: Vec<Vec<Vec4>>,
    ) -> Result<(), SyncError> {
        Ok(Scene::update_line_system(self, mesh, lines, colors)?)
    }
}

/// Split flat debug buffers into points (stride 3) and RGBA colors
/// (stride 4), preserving order.
///
/// # Errors
///
/// Returns [`DebugBufferError`] when a buffer length is not a multiple of its
/// stride or the two buffers describe a different number of vertices.
pub fn decode_debug_buffers(
    buffers: &DebugRenderBuffers,
) -> Result<(Vec<Vec3>, Vec<Vec4>), DebugBufferError> {
    if !buffers.vertices.len().is_multiple_of(POSITION_STRIDE) {
        return Err(DebugBufferError::Misaligned {
            buffer: "vertex",
            len: buffers.vertices.len(),
            stride: POSITION_STRIDE,
        });
    }
    if !buffers.colors.len().is_multiple_of(COLOR_STRIDE) {
        return Err(DebugBufferError::Misaligned {
            buffer: "color",
            len: buffers.colors.len(),
            stride: COLOR_STRIDE,
        });
    }

    let points: Vec<Vec3> = buffers
        .vertices
        .chunks_exact(POSITION_STRIDE)
        .map(Vec3::from_slice)
        .collect();
    let colors: Vec<Vec4> = buffers
        .colors
        .chunks_exact(COLOR_STRIDE)
        .map(Vec4::from_slice)
        .collect();

    if points.len() != colors.len() {
        return Err(DebugBufferError::CountMismatch {
            points: points.len(),
            colors: colors.len(),
        });
    }
    Ok((points, colors))
}

/// Per-session synchronizer state
#[derive(Debug)]
pub struct FrameSynchronizer<B, C, M> {
    body: B,
    collider: C,
    mesh: M,
    overlay: Option<M>,
    frame: u32,
    reset_interval: u32,
    reset_pose: BodyPose,
    resets: u64,
}

/// Synchronizer wired to the real physics world and scene graph
pub type DemoSynchronizer = FrameSynchronizer<BodyHandle, ColliderHandle, MeshId>;

impl<B, C, M> FrameSynchronizer<B, C, M>
where
    B: Copy + Debug,
    C: Copy + Debug,
    M: Copy + Debug + PartialEq,
{
    /// `reset_pose` is applied to `body` every `reset_interval` frames
    pub fn new(body: B, collider: C, mesh: M, reset_pose: BodyPose, reset_interval: u32) -> Self {
        Self {
            body,
            collider,
            mesh,
            overlay: None,
            frame: 0,
            reset_interval,
            reset_pose,
            resets: 0,
        }
    }

    pub fn body(&self) -> B {
        self.body
    }

    pub fn collider(&self) -> C {
        self.collider
    }

    /// Visual proxy driven by the body
    pub fn mesh(&self) -> M {
        self.mesh
    }

    /// Debug overlay, once the first frame has created it
    pub fn overlay(&self) -> Option<M> {
        self.overlay
    }

    /// Frames since the last reset, always in `0..=reset_interval`
    pub fn frame(&self) -> u32 {
        self.frame
    }

    pub fn reset_interval(&self) -> u32 {
        self.reset_interval
    }

    /// Number of periodic resets performed so far
    pub fn resets(&self) -> u64 {
        self.resets
    }

    /// Run one frame. Must be called right before the scene is drawn.
    ///
    /// # Errors
    ///
    /// Any [`SyncError`] is fatal. The frame counter is left unchanged when
    /// a frame fails.
    pub fn on_before_render<S, O>(&mut self, sim: &mut S, overlay: &mut O) -> Result<(), SyncError>
    where
        S: SimulationPort<Body = B, Collider = C>,
        O: OverlayPort<Mesh = M>,
    {
        let position = sim.body_translation(self.body)?;
        let rotation = sim.collider_rotation(self.collider)?;
        overlay.set_pose(self.mesh, position, rotation)?;

        let (points, colors) = decode_debug_buffers(&sim.debug_render())?;
        if let Some(id) = self.overlay {
            overlay.update_line_system(id, vec![points], vec![colors])?;
        } else {
            let count = points.len();
            let id = overlay.create_line_system(
                OVERLAY_NAME,
                LineSystemOptions {
                    lines: vec![points],
                    colors: vec![colors],
                    updatable: true,
                },
            )?;
            tracing::debug!(?id, points = count, "debug overlay created");
            self.overlay = Some(id);
        }

        sim.step();

        if self.frame >= self.reset_interval {
            sim.reset_body(self.body, &self.reset_pose)?;
            self.frame = 0;
            self.resets += 1;
            tracing::debug!(
                resets = self.resets,
                last_position = ?position,
                "body reset to spawn pose"
            );
        } else {
            self.frame += 1;
        }
        Ok(())
    }
}
