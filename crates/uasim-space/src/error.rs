//! Error types for the address space.

use uasim_types::{NodeId, StatusCode};

/// Structural errors raised while building the address space.
///
/// These only occur during the build phase and are fatal to the namespace
/// being built.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SpaceError {
    /// A node with this id is already present.
    #[error("duplicate node id: {0}")]
    DuplicateNodeId(NodeId),

    /// A referenced node does not exist.
    #[error("node not found: {0}")]
    NodeNotFound(NodeId),

    #[error("node {0} is not a variable")]
    NotAVariable(NodeId),

    #[error("node {0} is not an object type")]
    NotAnObjectType(NodeId),

    #[error("node {0} is not a method")]
    NotAMethod(NodeId),
}

/// Convenience alias for address-space results.
pub type SpaceResult<T> = Result<T, SpaceError>;

/// Failure reported by a delegate link or method handler.
///
/// Carries the status code the dispatcher should report for the item.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{status}: {reason}")]
pub struct DelegateError {
    pub status: StatusCode,
    pub reason: String,
}

impl DelegateError {
    pub fn new(status: StatusCode, reason: impl Into<String>) -> Self {
        Self {
            status,
            reason: reason.into(),
        }
    }
}

pub type DelegateResult<T> = Result<T, DelegateError>;
