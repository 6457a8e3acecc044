//! # Body and Collider Descriptors
//!
//! Descriptors are plain values describing what to insert into a
//! [`PhysicsWorld`](crate::PhysicsWorld). They are converted into rapier
//! builders only when the world creates the object, so callers never touch
//! rapier types directly.

use glam::{Quat, Vec3};
use rapier3d::prelude::{ColliderBuilder, Isometry, RigidBodyBuilder};
use rapier3d::na::Translation3;

use crate::transform::{to_rotation, to_vector};

/// Collision shape of a collider
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Shape {
    /// Box given by its half extents
    Cuboid { half_extents: Vec3 },
    /// Sphere given by its radius
    Ball { radius: f32 },
}

/// Description of a collider, optionally attached to a rigid body later on
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ColliderDesc {
    pub shape: Shape,
    /// Rotation relative to the parent body (or world when unattached)
    pub rotation: Quat,
    pub density: f32,
    pub restitution: f32,
}

impl ColliderDesc {
    fn with_shape(shape: Shape) -> Self {
        Self {
            shape,
            rotation: Quat::IDENTITY,
            density: 1.0,
            restitution: 0.0,
        }
    }

    #[must_use]
    pub fn cuboid(hx: f32, hy: f32, hz: f32) -> Self {
        Self::with_shape(Shape::Cuboid {
            half_extents: Vec3::new(hx, hy, hz),
        })
    }

    #[must_use]
    pub fn ball(radius: f32) -> Self {
        Self::with_shape(Shape::Ball { radius })
    }

    #[must_use]
    pub fn with_rotation(mut self, rotation: Quat) -> Self {
        self.rotation = rotation;
        self
    }

    #[must_use]
    pub fn with_density(mut self, density: f32) -> Self {
        self.density = density;
        self
    }

    #[must_use]
    pub fn with_restitution(mut self, restitution: f32) -> Self {
        self.restitution = restitution;
        self
    }

    pub(crate) fn to_builder(self) -> ColliderBuilder {
        let builder = match self.shape {
            Shape::Cuboid { half_extents } => {
                ColliderBuilder::cuboid(half_extents.x, half_extents.y, half_extents.z)
            }
            Shape::Ball { radius } => ColliderBuilder::ball(radius),
        };
        builder
            .position(Isometry::from_parts(
                Translation3::identity(),
                to_rotation(self.rotation),
            ))
            .density(self.density)
            .restitution(self.restitution)
    }
}

/// Kind of rigid body
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BodyKind {
    Dynamic,
    Fixed,
}

/// Description of a rigid body
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RigidBodyDesc {
    pub kind: BodyKind,
    pub translation: Vec3,
    pub rotation: Quat,
}

impl RigidBodyDesc {
    #[must_use]
    pub fn dynamic() -> Self {
        Self {
            kind: BodyKind::Dynamic,
            translation: Vec3::ZERO,
            rotation: Quat::IDENTITY,
        }
    }

    #[must_use]
    pub fn fixed() -> Self {
        Self {
            kind: BodyKind::Fixed,
            ..Self::dynamic()
        }
    }

    #[must_use]
    pub fn with_translation(mut self, x: f32, y: f32, z: f32) -> Self {
        self.translation = Vec3::new(x, y, z);
        self
    }

    #[must_use]
    pub fn with_rotation(mut self, rotation: Quat) -> Self {
        self.rotation = rotation;
        self
    }

    pub(crate) fn to_builder(self) -> RigidBodyBuilder {
        let builder = match self.kind {
            BodyKind::Dynamic => RigidBodyBuilder::dynamic(),
            BodyKind::Fixed => RigidBodyBuilder::fixed(),
        };
        builder.position(Isometry::from_parts(
            Translation3::from(to_vector(self.translation)),
            to_rotation(self.rotation),
        ))
    }
}

/// Full kinematic state a body can be reset to
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BodyPose {
    pub translation: Vec3,
    pub rotation: Quat,
    pub linvel: Vec3,
    pub angvel: Vec3,
}

impl BodyPose {
    /// At rest at `translation` with identity rotation
    #[must_use]
    pub fn at_rest(translation: Vec3) -> Self {
        Self {
            translation,
            rotation: Quat::IDENTITY,
            linvel: Vec3::ZERO,
            angvel: Vec3::ZERO,
        }
    }
}
