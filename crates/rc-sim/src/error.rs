use rc_core::{CoreError, EdgeKey, NodeId};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("No network loaded")]
    NoTopologyLoaded,

    #[error("cannot close {edge}: node {node} is not in the network")]
    InvalidEdgeReference { edge: EdgeKey, node: NodeId },

    #[error("session configuration error: {0}")]
    Config(String),

    #[error(transparent)]
    Core(#[from] CoreError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

pub type SessionResult<T> = Result<T, SessionError>;
