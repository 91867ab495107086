//! Configuration errors for machine definitions.

use thiserror::Error;

/// A single problem found while validating a machine definition.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DefinitionViolation {
    #[error("Initial state '{state}' is not a declared state")]
    UndeclaredInitial { state: String },

    #[error("Terminal state '{state}' is not a declared state")]
    UndeclaredTerminal { state: String },

    #[error("Transition '{source_state}' x '{event}' has undeclared source state")]
    UndeclaredSource { source_state: String, event: String },

    #[error("Transition '{source_state}' x '{event}' targets undeclared state '{target}'")]
    UndeclaredTarget {
        source_state: String,
        event: String,
        target: String,
    },

    #[error("Transition '{source_state}' x '{event}' uses undeclared event")]
    UndeclaredEvent { source_state: String, event: String },

    #[error("Transition '{source_state}' x '{event}' is declared more than once")]
    DuplicateTransition { source_state: String, event: String },
}

/// Errors that can occur when building a machine definition.
///
/// These are startup failures; a definition that fails to build cannot be
/// repaired at runtime.
#[derive(Debug, Error)]
pub enum ConfigurationError {
    #[error("Initial state not specified. Call .initial(state) before .build()")]
    MissingInitialState,

    #[error("Machine definition is invalid: {}", summarize(.0))]
    Invalid(Vec<DefinitionViolation>),

    #[error("Definition document could not be parsed: {0}")]
    Malformed(String),
}

impl ConfigurationError {
    /// Violations found by validation; empty for the other variants.
    pub fn violations(&self) -> &[DefinitionViolation] {
        match self {
            Self::Invalid(violations) => violations,
            _ => &[],
        }
    }
}

fn summarize(violations: &[DefinitionViolation]) -> String {
    violations
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}
