//! State transition history tracking.
//!
//! Provides immutable tracking of applied transitions, used by
//! [`MachineDefinition::replay`](super::MachineDefinition::replay) and by
//! transition observers that want an audit trail.

use super::state::{Event, State};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Record of a single applied transition.
///
/// # Example
///
/// ```rust
/// use statekeeper::core::StateTransition;
/// use statekeeper::{event_enum, state_enum};
/// use chrono::Utc;
///
/// state_enum! {
///     enum OrderState { Submitted, Paid }
/// }
/// event_enum! {
///     enum OrderEvent { Pay }
/// }
///
/// let transition = StateTransition {
///     from: OrderState::Submitted,
///     event: OrderEvent::Pay,
///     to: OrderState::Paid,
///     timestamp: Utc::now(),
///     version: 2,
/// };
/// assert_eq!(transition.to, OrderState::Paid);
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(bound = "")]
pub struct StateTransition<S: State, E: Event> {
    /// The state being transitioned from
    pub from: S,
    /// The event that selected the transition
    pub event: E,
    /// The state being transitioned to
    pub to: S,
    /// When the transition was applied
    pub timestamp: DateTime<Utc>,
    /// Record version after the transition (sequence number for replays)
    pub version: u64,
}

/// Ordered history of state transitions.
///
/// History is immutable - the `record` method returns a new history
/// with the transition added.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(bound = "")]
pub struct StateHistory<S: State, E: Event> {
    transitions: Vec<StateTransition<S, E>>,
}

impl<S: State, E: Event> Default for StateHistory<S, E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: State, E: Event> StateHistory<S, E> {
    /// Create a new empty history.
    pub fn new() -> Self {
        Self {
            transitions: Vec::new(),
        }
    }

    /// Record a transition, returning a new history.
    ///
    /// The existing history is left unchanged.
    pub fn record(&self, transition: StateTransition<S, E>) -> Self {
        let mut transitions = self.transitions.clone();
        transitions.push(transition);
        Self { transitions }
    }

    /// Get the path of states traversed.
    ///
    /// Returns the first `from` state, then the `to` state of each
    /// transition.
    ///
    /// # Example
    ///
    /// ```rust
    /// use statekeeper::core::{StateHistory, StateTransition};
    /// use statekeeper::{event_enum, state_enum};
    /// use chrono::Utc;
    ///
    /// state_enum! {
    ///     enum Phase { One, Two, Three }
    /// }
    /// event_enum! {
    ///     enum Step { Next }
    /// }
    ///
    /// let history = StateHistory::new()
    ///     .record(StateTransition {
    ///         from: Phase::One,
    ///         event: Step::Next,
    ///         to: Phase::Two,
    ///         timestamp: Utc::now(),
    ///         version: 1,
    ///     })
    ///     .record(StateTransition {
    ///         from: Phase::Two,
    ///         event: Step::Next,
    ///         to: Phase::Three,
    ///         timestamp: Utc::now(),
    ///         version: 2,
    ///     });
    ///
    /// assert_eq!(history.get_path(), vec![&Phase::One, &Phase::Two, &Phase::Three]);
    /// ```
    pub fn get_path(&self) -> Vec<&S> {
        let mut path = Vec::new();
        if let Some(first) = self.transitions.first() {
            path.push(&first.from);
        }
        for transition in &self.transitions {
            path.push(&transition.to);
        }
        path
    }

    /// State reached by the last recorded transition, if any.
    pub fn last_state(&self) -> Option<&S> {
        self.transitions.last().map(|t| &t.to)
    }

    /// Calculate total duration from first to last transition.
    ///
    /// Returns `None` if there are no transitions.
    pub fn duration(&self) -> Option<Duration> {
        if let (Some(first), Some(last)) = (self.transitions.first(), self.transitions.last()) {
            let duration = last.timestamp.signed_duration_since(first.timestamp);
            duration.to_std().ok()
        } else {
            None
        }
    }

    /// Get all transitions in the order they were recorded.
    pub fn transitions(&self) -> &[StateTransition<S, E>] {
        &self.transitions
    }

    pub fn len(&self) -> usize {
        self.transitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transitions.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    crate::state_enum! {
        enum TestState {
            Submitted,
            Paid,
            Fulfilled,
        }
    }

    crate::event_enum! {
        enum TestEvent {
            Pay,
            Fulfill,
        }
    }

    fn pay(version: u64) -> StateTransition<TestState, TestEvent> {
        StateTransition {
            from: TestState::Submitted,
            event: TestEvent::Pay,
            to: TestState::Paid,
            timestamp: Utc::now(),
            version,
        }
    }

    fn fulfill(version: u64) -> StateTransition<TestState, TestEvent> {
        StateTransition {
            from: TestState::Paid,
            event: TestEvent::Fulfill,
            to: TestState::Fulfilled,
            timestamp: Utc::now(),
            version,
        }
    }

    #[test]
    fn new_history_is_empty() {
        let history: StateHistory<TestState, TestEvent> = StateHistory::new();
        assert!(history.is_empty());
        assert!(history.get_path().is_empty());
        assert!(history.duration().is_none());
        assert!(history.last_state().is_none());
    }

    #[test]
    fn record_is_immutable() {
        let history = StateHistory::new();
        let new_history = history.record(pay(1));

        assert_eq!(history.len(), 0);
        assert_eq!(new_history.len(), 1);
    }

    #[test]
    fn get_path_returns_state_sequence() {
        let history = StateHistory::new().record(pay(1)).record(fulfill(2));

        let path = history.get_path();
        assert_eq!(path.len(), 3);
        assert_eq!(path[0], &TestState::Submitted);
        assert_eq!(path[1], &TestState::Paid);
        assert_eq!(path[2], &TestState::Fulfilled);
        assert_eq!(history.last_state(), Some(&TestState::Fulfilled));
    }

    #[test]
    fn duration_calculates_elapsed_time() {
        let history = StateHistory::new().record(pay(1));
        std::thread::sleep(std::time::Duration::from_millis(10));
        let history = history.record(fulfill(2));

        let duration = history.duration().unwrap();
        assert!(duration >= std::time::Duration::from_millis(10));
    }

    #[test]
    fn single_transition_has_duration_zero() {
        let history = StateHistory::new().record(pay(1));
        assert_eq!(history.duration(), Some(std::time::Duration::from_secs(0)));
    }

    #[test]
    fn history_serializes_correctly() {
        let history = StateHistory::new().record(pay(1)).record(fulfill(2));

        let json = serde_json::to_string(&history).unwrap();
        let deserialized: StateHistory<TestState, TestEvent> = serde_json::from_str(&json).unwrap();

        assert_eq!(history.transitions(), deserialized.transitions());
    }
}
