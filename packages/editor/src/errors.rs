//! Error types for the editor

use pagesmith_model::NodeId;
use thiserror::Error;

/// Why a structural mutation left the tree unchanged
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MutationError {
    #[error("Node not found: {0}")]
    NodeNotFound(NodeId),

    #[error("Parent not found: {0}")]
    ParentNotFound(NodeId),

    #[error("Node {0} cannot hold children")]
    NotAContainer(NodeId),

    #[error("Duplicate node id: {0}")]
    DuplicateId(NodeId),

    #[error("Would create cycle: {0} cannot move into its own subtree")]
    CycleDetected(NodeId),
}

#[derive(Error, Debug)]
pub enum EditorError {
    #[error("Invalid page JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Mutation error: {0}")]
    Mutation(#[from] MutationError),
}
