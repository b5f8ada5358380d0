//! Error type shared by every stage of a run

use crate::model::CanonicalId;

/// Errors raised while building, layering or renaming a graph.
#[derive(Debug, thiserror::Error)]
pub enum StrataError {
    #[error("Malformed display name `{name}`: expected <letters><digits>")]
    Format { name: String },

    #[error("Node already registered: {0}")]
    DuplicateNode(CanonicalId),

    #[error("Node not found: {0}")]
    UnknownNode(CanonicalId),

    #[error("Canonical id {0} contains the reserved alias separator '#'")]
    ReservedSeparator(CanonicalId),

    #[error("Self-loop on node {0} is not allowed")]
    SelfLoop(CanonicalId),

    /// Internal invariant violation. Never expected in a correct run.
    #[error("Consistency violation: {0}")]
    Consistency(String),

    #[error("Invalid snapshot: {0}")]
    Snapshot(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

impl StrataError {
    pub fn format(name: impl Into<String>) -> Self {
        StrataError::Format { name: name.into() }
    }
}

pub type Result<T> = std::result::Result<T, StrataError>;
