//! Errors raised while writing, reading or restoring a checkpoint.

use thiserror::Error;

/// Why a checkpoint could not be produced or turned back into a store.
///
/// Record-level variants name the offending entity by its display id.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CheckpointError {
    #[error("Failed to encode checkpoint: {0}")]
    Encode(String),

    #[error("Failed to decode checkpoint: {0}")]
    Decode(String),

    #[error("Checkpoint format version {found} is not supported (expected {supported})")]
    UnsupportedVersion { found: u32, supported: u32 },

    #[error("Entity '{id}' appears more than once in the checkpoint")]
    DuplicateId { id: String },

    #[error("Entity '{id}' is in undeclared state '{state}'")]
    UndeclaredState { id: String, state: String },

    /// Stored versions start at 1; a record at 0 could never have been saved.
    #[error("Entity '{id}' has version 0")]
    InvalidVersion { id: String },
}
