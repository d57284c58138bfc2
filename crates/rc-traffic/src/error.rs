//! Traffic-subsystem error type.

use thiserror::Error;

use rc_core::NodeId;

/// Errors produced by `rc-traffic`.
///
/// Centrality failures never appear here: they degrade to the uniform
/// fallback inside the assignment engine.
#[derive(Debug, Error)]
pub enum TrafficError {
    #[error("closure references unknown node {0}")]
    UnknownNode(NodeId),
}

pub type TrafficResult<T> = Result<T, TrafficError>;
