//! State and event traits for transition tables.
//!
//! Both are closed sets of plain identifiers. They must be hashable because
//! transitions are keyed by `(state, event)`, and serializable so that
//! definitions and entities can be written to checkpoints and documents.

use serde::{Deserialize, Serialize};
use std::fmt::Debug;
use std::hash::Hash;

/// Trait for state machine states.
///
/// All methods are pure. Whether a state is initial or terminal is a
/// property of the machine definition, not of the state value, so the same
/// state type can be reused by several definitions.
///
/// # Example
///
/// ```rust
/// use statekeeper::core::State;
/// use serde::{Deserialize, Serialize};
///
/// #[derive(Clone, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
/// enum OrderState {
///     Submitted,
///     Paid,
/// }
///
/// impl State for OrderState {
///     fn name(&self) -> &str {
///         match self {
///             Self::Submitted => "Submitted",
///             Self::Paid => "Paid",
///         }
///     }
/// }
///
/// assert_eq!(OrderState::Paid.name(), "Paid");
/// ```
pub trait State:
    Clone + Eq + Hash + Debug + Serialize + for<'de> Deserialize<'de> + Send + Sync + 'static
{
    /// Get the state's name for display/logging.
    fn name(&self) -> &str;
}

/// Trait for events that drive transitions.
///
/// Events carry no payload; they only select a row of the transition table.
pub trait Event:
    Clone + Eq + Hash + Debug + Serialize + for<'de> Deserialize<'de> + Send + Sync + 'static
{
    /// Get the event's name for display/logging.
    fn name(&self) -> &str;
}
