//! # Physics World
//!
//! Owns every rapier set and pipeline needed to simulate a scene and exposes a
//! small handle-based API on top of them. The timestep is fixed and owned by
//! the world; callers advance it with [`PhysicsWorld::step`].

use glam::{Quat, Vec3};
use rapier3d::prelude::{
    CCDSolver, ColliderSet, DebugRenderMode, DebugRenderPipeline, DebugRenderStyle,
    DefaultBroadPhase, ImpulseJointSet, IntegrationParameters, IslandManager,
    MultibodyJointSet, NarrowPhase, PhysicsPipeline, QueryPipeline, Real, RigidBody,
    RigidBodySet, Vector,
};

use crate::builder::{BodyPose, ColliderDesc, RigidBodyDesc};
use crate::debug::DebugRenderBuffers;
use crate::error::PhysicsError;
use crate::transform::{from_rotation, from_vector, to_rotation, to_vector};

/// Opaque reference to a rigid body owned by a [`PhysicsWorld`]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct BodyHandle(rapier3d::prelude::RigidBodyHandle);

/// Opaque reference to a collider owned by a [`PhysicsWorld`]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ColliderHandle(rapier3d::prelude::ColliderHandle);

/// Main physics container
pub struct PhysicsWorld {
    gravity: Vector<Real>,
    integration_parameters: IntegrationParameters,
    pipeline: PhysicsPipeline,
    islands: IslandManager,
    broad_phase: DefaultBroadPhase,
    narrow_phase: NarrowPhase,
    bodies: RigidBodySet,
    colliders: ColliderSet,
    impulse_joints: ImpulseJointSet,
    multibody_joints: MultibodyJointSet,
    ccd_solver: CCDSolver,
    query_pipeline: QueryPipeline,
    debug_pipeline: DebugRenderPipeline,
    steps: u64,
}

impl PhysicsWorld {
    /// Create an empty world with the given gravity vector
    pub fn new(gravity: Vec3) -> Self {
        Self {
            gravity: to_vector(gravity),
            integration_parameters: IntegrationParameters::default(),
            pipeline: PhysicsPipeline::new(),
            islands: IslandManager::new(),
            broad_phase: DefaultBroadPhase::new(),
            narrow_phase: NarrowPhase::new(),
            bodies: RigidBodySet::new(),
            colliders: ColliderSet::new(),
            impulse_joints: ImpulseJointSet::new(),
            multibody_joints: MultibodyJointSet::new(),
            ccd_solver: CCDSolver::new(),
            query_pipeline: QueryPipeline::new(),
            debug_pipeline: DebugRenderPipeline::new(
                DebugRenderStyle::default(),
                DebugRenderMode::default(),
            ),
            steps: 0,
        }
    }

    pub fn gravity(&self) -> Vec3 {
        from_vector(&self.gravity)
    }

    /// Fixed timestep used by [`step`](Self::step), in seconds
    pub fn timestep(&self) -> f32 {
        self.integration_parameters.dt
    }

    /// Number of steps taken since creation
    pub fn steps(&self) -> u64 {
        self.steps
    }

    pub fn body_count(&self) -> usize {
        self.bodies.len()
    }

    pub fn collider_count(&self) -> usize {
        self.colliders.len()
    }

    pub fn create_rigid_body(&mut self, desc: &RigidBodyDesc) -> BodyHandle {
        let handle = self.bodies.insert(desc.to_builder().build());
        tracing::debug!(?desc, "created rigid body");
        BodyHandle(handle)
    }

    /// Insert a collider, attached to `parent` when given, static otherwise
    ///
    /// # Errors
    ///
    /// [`PhysicsError::UnknownBody`] if `parent` is not in this world.
    pub fn create_collider(
        &mut self,
        desc: &ColliderDesc,
        parent: Option<BodyHandle>,
    ) -> Result<ColliderHandle, PhysicsError> {
        let collider = desc.to_builder().build();
        let handle = match parent {
            Some(body) => {
                if !self.bodies.contains(body.0) {
                    return Err(PhysicsError::UnknownBody(body));
                }
                self.colliders
                    .insert_with_parent(collider, body.0, &mut self.bodies)
            }
            None => self.colliders.insert(collider),
        };
        tracing::debug!(?desc, attached = parent.is_some(), "created collider");
        Ok(ColliderHandle(handle))
    }

    fn body(&self, handle: BodyHandle) -> Result<&RigidBody, PhysicsError> {
        self.bodies
            .get(handle.0)
            .ok_or(PhysicsError::UnknownBody(handle))
    }

    fn body_mut(&mut self, handle: BodyHandle) -> Result<&mut RigidBody, PhysicsError> {
        self.bodies
            .get_mut(handle.0)
            .ok_or(PhysicsError::UnknownBody(handle))
    }

    /// Current world-space translation of a body
    ///
    /// # Errors
    ///
    /// [`PhysicsError::UnknownBody`] if `handle` is not in this world.
    pub fn translation(&self, handle: BodyHandle) -> Result<Vec3, PhysicsError> {
        Ok(from_vector(self.body(handle)?.translation()))
    }

    /// Current world-space rotation of a body
    ///
    /// # Errors
    ///
    /// [`PhysicsError::UnknownBody`] if `handle` is not in this world.
    pub fn rotation(&self, handle: BodyHandle) -> Result<Quat, PhysicsError> {
        Ok(from_rotation(self.body(handle)?.rotation()))
    }

    /// # Errors
    ///
    /// [`PhysicsError::UnknownBody`] if `handle` is not in this world.
    pub fn linvel(&self, handle: BodyHandle) -> Result<Vec3, PhysicsError> {
        Ok(from_vector(self.body(handle)?.linvel()))
    }

    /// # Errors
    ///
    /// [`PhysicsError::UnknownBody`] if `handle` is not in this world.
    pub fn angvel(&self, handle: BodyHandle) -> Result<Vec3, PhysicsError> {
        Ok(from_vector(self.body(handle)?.angvel()))
    }

    /// Current world-space rotation of a collider
    ///
    /// # Errors
    ///
    /// [`PhysicsError::UnknownCollider`] if `handle` is not in this world.
    pub fn collider_rotation(&self, handle: ColliderHandle) -> Result<Quat, PhysicsError> {
        self.colliders
            .get(handle.0)
            .map(|c| from_rotation(c.rotation()))
            .ok_or(PhysicsError::UnknownCollider(handle))
    }

    /// # Errors
    ///
    /// [`PhysicsError::UnknownCollider`] if `handle` is not in this world.
    pub fn collider_translation(&self, handle: ColliderHandle) -> Result<Vec3, PhysicsError> {
        self.colliders
            .get(handle.0)
            .map(|c| from_vector(c.translation()))
            .ok_or(PhysicsError::UnknownCollider(handle))
    }

    /// Teleport a body and wake it up
    ///
    /// # Errors
    ///
    /// [`PhysicsError::UnknownBody`] if `handle` is not in this world.
    pub fn set_translation(&mut self, handle: BodyHandle, t: Vec3) -> Result<(), PhysicsError> {
        self.body_mut(handle)?.set_translation(to_vector(t), true);
        Ok(())
    }

    /// # Errors
    ///
    /// [`PhysicsError::UnknownBody`] if `handle` is not in this world.
    pub fn set_rotation(&mut self, handle: BodyHandle, r: Quat) -> Result<(), PhysicsError> {
        self.body_mut(handle)?.set_rotation(to_rotation(r), true);
        Ok(())
    }

    /// # Errors
    ///
    /// [`PhysicsError::UnknownBody`] if `handle` is not in this world.
    pub fn set_linvel(&mut self, handle: BodyHandle, v: Vec3) -> Result<(), PhysicsError> {
        self.body_mut(handle)?.set_linvel(to_vector(v), true);
        Ok(())
    }

    /// # Errors
    ///
    /// [`PhysicsError::UnknownBody`] if `handle` is not in this world.
    pub fn set_angvel(&mut self, handle: BodyHandle, v: Vec3) -> Result<(), PhysicsError> {
        self.body_mut(handle)?.set_angvel(to_vector(v), true);
        Ok(())
    }

    /// Overwrite translation, rotation and both velocities, waking the body
    ///
    /// # Errors
    ///
    /// [`PhysicsError::UnknownBody`] if `handle` is not in this world.
    pub fn reset_body(&mut self, handle: BodyHandle, pose: &BodyPose) -> Result<(), PhysicsError> {
        let body = self.body_mut(handle)?;
        body.set_translation(to_vector(pose.translation), true);
        body.set_rotation(to_rotation(pose.rotation), true);
        body.set_linvel(to_vector(pose.linvel), true);
        body.set_angvel(to_vector(pose.angvel), true);
        Ok(())
    }

    /// Wireframe of every collider shape in its current pose
    pub fn debug_render(&mut self) -> DebugRenderBuffers {
        let mut buffers = DebugRenderBuffers::default();
        self.debug_pipeline.render(
            &mut buffers,
            &self.bodies,
            &self.colliders,
            &self.impulse_joints,
            &self.multibody_joints,
            &self.narrow_phase,
        );
        buffers
    }

    /// Advance the simulation by one fixed timestep
    pub fn step(&mut self) {
        self.pipeline.step(
            &self.gravity,
            &self.integration_parameters,
            &mut self.islands,
            &mut self.broad_phase,
            &mut self.narrow_phase,
            &mut self.bodies,
            &mut self.colliders,
            &mut self.impulse_joints,
            &mut self.multibody_joints,
            &mut self.ccd_solver,
            Some(&mut self.query_pipeline),
            &(),
            &(),
        );
        self.steps += 1;
    }
}

impl Default for PhysicsWorld {
    fn default() -> Self {
        Self::new(Vec3::new(0.0, -9.81, 0.0))
    }
}
