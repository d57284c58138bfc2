//! Network-subsystem error type.

use thiserror::Error;

use rc_core::NodeId;

/// Errors produced by `rc-network`.
#[derive(Debug, Error)]
pub enum NetworkError {
    #[error("node {0} not found in network")]
    NodeNotFound(NodeId),

    #[error("invalid topology: {0}")]
    InvalidTopology(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("topology JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type NetworkResult<T> = Result<T, NetworkError>;
