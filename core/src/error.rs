use thiserror::Error;

use crate::graph::NodeId;

pub type Result<T> = std::result::Result<T, GraphError>;

/// Failures raised by graph mutation, traversal starts and algorithm queries.
///
/// Every variant is reported at the offending call; nothing is partially
/// applied before an error is returned.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GraphError {
    #[error("node {0} not found in graph")]
    UnknownNode(NodeId),

    #[error("node {0} already exists")]
    DuplicateId(NodeId),

    #[error("self-loop on node {0} is not allowed")]
    SelfLoop(NodeId),

    #[error("{0}: no result available, run the algorithm first")]
    InvalidState(&'static str),
}
