//! Storage error types.

use std::time::Duration;
use thiserror::Error;

/// Errors reported by an [`EntityStore`](super::EntityStore).
///
/// The library never retries on these; retry policy belongs to the caller
/// or to the store itself.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum StorageError {
    /// Insert of an id that is already stored
    #[error("Entity '{id}' already exists")]
    AlreadyExists { id: String },

    /// The stored version is not the one the writer loaded
    #[error("Entity '{id}' changed concurrently (expected version {expected}, found {found:?})")]
    VersionConflict {
        id: String,
        expected: u64,
        found: Option<u64>,
    },

    /// The store did not answer within the caller-supplied limit
    #[error("Storage call timed out after {0:?}")]
    Timeout(Duration),

    /// A writer panicked while holding the store lock
    #[error("Storage lock poisoned")]
    Poisoned,

    /// Failure reported by a backing store
    #[error("Storage backend failed: {0}")]
    Backend(String),
}
