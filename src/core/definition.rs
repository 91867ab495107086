//! Immutable machine definitions and the pure transition function.

use super::error::TransitionError;
use super::history::{StateHistory, StateTransition};
use super::state::{Event, State};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

/// A single row of the transition table: `(source, event) -> target`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(bound = "")]
pub struct Transition<S: State, E: Event> {
    pub source: S,
    pub event: E,
    pub target: S,
}

impl<S: State, E: Event> Transition<S, E> {
    pub fn new(source: S, event: E, target: S) -> Self {
        Self {
            source,
            event,
            target,
        }
    }
}

/// The states, events, initial state, terminal states and transition table
/// of one machine type.
///
/// Definitions are only produced by
/// [`MachineBuilder::build`](crate::builder::MachineBuilder::build), which
/// validates them eagerly, so every value of this type is well formed:
/// the initial and terminal states are declared, every transition refers to
/// declared states and events, and no `(source, event)` key repeats.
///
/// A definition is immutable once built. Share it between threads with
/// `Arc`.
///
/// # Example
///
/// ```rust
/// use statekeeper::builder::MachineBuilder;
/// use statekeeper::core::TransitionError;
/// use statekeeper::{event_enum, state_enum};
///
/// state_enum! {
///     enum OrderState { Submitted, Paid, Fulfilled, Cancelled }
/// }
/// event_enum! {
///     enum OrderEvent { Pay, Fulfill, Cancel }
/// }
///
/// let orders = MachineBuilder::new()
///     .states(OrderState::ALL.iter().cloned())
///     .events(OrderEvent::ALL.iter().cloned())
///     .initial(OrderState::Submitted)
///     .terminals([OrderState::Fulfilled, OrderState::Cancelled])
///     .transition(OrderState::Submitted, OrderEvent::Pay, OrderState::Paid)
///     .transition(OrderState::Paid, OrderEvent::Fulfill, OrderState::Fulfilled)
///     .build()
///     .unwrap();
///
/// assert_eq!(orders.apply(&OrderState::Submitted, &OrderEvent::Pay), Ok(OrderState::Paid));
/// assert!(matches!(
///     orders.apply(&OrderState::Submitted, &OrderEvent::Fulfill),
///     Err(TransitionError::IllegalTransition { .. })
/// ));
/// ```
#[derive(Clone, Debug)]
pub struct MachineDefinition<S: State, E: Event> {
    states: HashSet<S>,
    events: HashSet<E>,
    initial: S,
    terminals: HashSet<S>,
    transitions: Vec<Transition<S, E>>,
    table: HashMap<(S, E), S>,
}

impl<S: State, E: Event> MachineDefinition<S, E> {
    /// Assemble a definition from parts the builder has already validated.
    pub(crate) fn from_validated(
        states: HashSet<S>,
        events: HashSet<E>,
        initial: S,
        terminals: HashSet<S>,
        transitions: Vec<Transition<S, E>>,
    ) -> Self {
        let table = transitions
            .iter()
            .map(|t| ((t.source.clone(), t.event.clone()), t.target.clone()))
            .collect();

        Self {
            states,
            events,
            initial,
            terminals,
            transitions,
            table,
        }
    }

    /// Evaluate `event` against `current`.
    ///
    /// Returns the target state, which the caller is responsible for
    /// persisting. Terminal states reject every event. This is a pure
    /// function of the definition and its arguments.
    pub fn apply(&self, current: &S, event: &E) -> Result<S, TransitionError> {
        if self.is_terminal(current) {
            return Err(TransitionError::TerminalState {
                state: current.name().to_string(),
                event: event.name().to_string(),
            });
        }

        self.table
            .get(&(current.clone(), event.clone()))
            .cloned()
            .ok_or_else(|| TransitionError::IllegalTransition {
                state: current.name().to_string(),
                event: event.name().to_string(),
            })
    }

    /// Apply `events` in order starting from `start`, without side effects.
    ///
    /// Stops at the first rejected event. The returned history's versions
    /// count applied transitions from 1.
    pub fn replay<I>(&self, start: S, events: I) -> Result<StateHistory<S, E>, TransitionError>
    where
        I: IntoIterator<Item = E>,
    {
        let mut history = StateHistory::new();
        let mut current = start;

        for (index, event) in events.into_iter().enumerate() {
            let next = self.apply(&current, &event)?;
            history = history.record(StateTransition {
                from: current,
                event,
                to: next.clone(),
                timestamp: Utc::now(),
                version: index as u64 + 1,
            });
            current = next;
        }

        Ok(history)
    }

    pub fn initial(&self) -> &S {
        &self.initial
    }

    pub fn is_terminal(&self, state: &S) -> bool {
        self.terminals.contains(state)
    }

    pub fn is_declared_state(&self, state: &S) -> bool {
        self.states.contains(state)
    }

    pub fn is_declared_event(&self, event: &E) -> bool {
        self.events.contains(event)
    }

    pub fn states(&self) -> impl Iterator<Item = &S> {
        self.states.iter()
    }

    pub fn events(&self) -> impl Iterator<Item = &E> {
        self.events.iter()
    }

    pub fn terminals(&self) -> impl Iterator<Item = &S> {
        self.terminals.iter()
    }

    /// Transitions in declaration order.
    pub fn transitions(&self) -> &[Transition<S, E>] {
        &self.transitions
    }

    /// Target of `(state, event)` if the table has a row for it.
    ///
    /// Unlike [`apply`](Self::apply) this does not consult terminal states.
    pub fn target(&self, state: &S, event: &E) -> Option<&S> {
        self.table.get(&(state.clone(), event.clone()))
    }

    /// Events accepted from `state`, in declaration order.
    ///
    /// Empty for terminal states.
    pub fn available_events(&self, state: &S) -> Vec<&E> {
        if self.is_terminal(state) {
            return Vec::new();
        }
        self.transitions
            .iter()
            .filter(|t| t.source == *state)
            .map(|t| &t.event)
            .collect()
    }
}
