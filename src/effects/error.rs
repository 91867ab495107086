//! Errors surfaced by lifecycle orchestration.

use crate::core::TransitionError;
use crate::store::StorageError;
use thiserror::Error;

/// Everything that can stop a load/apply/save cycle.
///
/// Transition and storage errors are wrapped without modification so the
/// caller sees exactly what the engine or the store reported.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum MachineError {
    #[error("Entity '{id}' not found")]
    NotFound { id: String },

    #[error(transparent)]
    Transition(#[from] TransitionError),

    #[error(transparent)]
    Storage(#[from] StorageError),
}
