//! Errors raised when an event is evaluated against a state.

use thiserror::Error;

/// Rejection of an event by the transition table.
///
/// Both variants name the offending `(state, event)` pair. A rejected
/// transition never changes state and is not transient, so retrying the
/// same input yields the same error.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransitionError {
    #[error("State '{state}' is terminal; event '{event}' rejected")]
    TerminalState { state: String, event: String },

    #[error("No transition from state '{state}' on event '{event}'")]
    IllegalTransition { state: String, event: String },
}

impl TransitionError {
    /// The rejected `(state, event)` pair, by name.
    pub fn pair(&self) -> (&str, &str) {
        match self {
            Self::TerminalState { state, event } | Self::IllegalTransition { state, event } => {
                (state, event)
            }
        }
    }
}
