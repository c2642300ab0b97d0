use thiserror::Error;

use crate::scene::NodeId;

#[derive(Error, Debug)]
pub enum SceneError {
    #[error("singular matrix is not invertible")]
    SingularMatrix,

    #[error("node {0} does not exist")]
    InvalidNode(NodeId),

    #[error("node {0} is not a group node")]
    NotAGroup(NodeId),

    #[error("{0} list must contain at least one entry")]
    EmptyAppearance(&'static str),

    #[error("scene graph contains no camera node")]
    MissingCamera,

    #[error("invalid scene description: {0}")]
    InvalidScene(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, SceneError>;
