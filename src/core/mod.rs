//! Core state machine types and logic.
//!
//! This module contains the pure core of the library:
//! - State and event identifiers via the `State` and `Event` traits
//! - Immutable machine definitions and the `apply` transition function
//! - Immutable history tracking
//!
//! Nothing in this module performs I/O. Loading and saving entities is the
//! job of [`crate::effects::Lifecycle`].

mod definition;
mod error;
mod history;
mod state;

pub use definition::{MachineDefinition, Transition};
pub use error::TransitionError;
pub use history::{StateHistory, StateTransition};
pub use state::{Event, State};
