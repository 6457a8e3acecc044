use thiserror::Error;

use crate::scene::MeshId;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SceneError {
    #[error("no mesh with id {0:?}")]
    UnknownMesh(MeshId),
    #[error("mesh {0:?} is not a line system")]
    NotALineSystem(MeshId),
    #[error("line system {0:?} was not created updatable")]
    NotUpdatable(MeshId),
    #[error("line {line} has {points} points but {colors} colors")]
    LineColorMismatch {
        line: usize,
        points: usize,
        colors: usize,
    },
    #[error("{lines} lines but {colors} color lists")]
    LineCountMismatch { lines: usize, colors: usize },
}
