use thiserror::Error;

use crate::{BodyHandle, ColliderHandle};

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum PhysicsError {
    #[error("no rigid body for handle {0:?}")]
    UnknownBody(BodyHandle),
    #[error("no collider for handle {0:?}")]
    UnknownCollider(ColliderHandle),
}
