//! Builder for constructing machine definitions.

use crate::builder::error::{ConfigurationError, DefinitionViolation};
use crate::core::{Event, MachineDefinition, State, Transition};
use std::collections::HashSet;
use stillwater::validation::Validation;
use stillwater::NonEmptyVec;
use tracing::{debug, warn};

type Check = Validation<(), NonEmptyVec<DefinitionViolation>>;

/// Builder for machine definitions with a fluent API.
///
/// Nothing is checked until [`build`](Self::build), which validates the whole
/// definition at once and reports every violation it finds.
pub struct MachineBuilder<S: State, E: Event> {
    states: Vec<S>,
    events: Vec<E>,
    initial: Option<S>,
    terminals: Vec<S>,
    transitions: Vec<Transition<S, E>>,
}

impl<S: State, E: Event> MachineBuilder<S, E> {
    /// Create a new builder.
    pub fn new() -> Self {
        Self {
            states: Vec::new(),
            events: Vec::new(),
            initial: None,
            terminals: Vec::new(),
            transitions: Vec::new(),
        }
    }

    /// Declare a state.
    pub fn state(mut self, state: S) -> Self {
        self.states.push(state);
        self
    }

    /// Declare several states.
    pub fn states<I: IntoIterator<Item = S>>(mut self, states: I) -> Self {
        self.states.extend(states);
        self
    }

    /// Declare an event.
    pub fn event(mut self, event: E) -> Self {
        self.events.push(event);
        self
    }

    /// Declare several events.
    pub fn events<I: IntoIterator<Item = E>>(mut self, events: I) -> Self {
        self.events.extend(events);
        self
    }

    /// Set the initial state (required).
    pub fn initial(mut self, state: S) -> Self {
        self.initial = Some(state);
        self
    }

    /// Mark a state as terminal.
    pub fn terminal(mut self, state: S) -> Self {
        self.terminals.push(state);
        self
    }

    /// Mark several states as terminal.
    pub fn terminals<I: IntoIterator<Item = S>>(mut self, states: I) -> Self {
        self.terminals.extend(states);
        self
    }

    /// Add a `(source, event) -> target` row.
    pub fn transition(self, source: S, event: E, target: S) -> Self {
        self.add_transition(Transition::new(source, event, target))
    }

    /// Add a pre-built transition.
    pub fn add_transition(mut self, transition: Transition<S, E>) -> Self {
        self.transitions.push(transition);
        self
    }

    /// Add multiple transitions at once.
    pub fn transitions<I: IntoIterator<Item = Transition<S, E>>>(mut self, transitions: I) -> Self {
        self.transitions.extend(transitions);
        self
    }

    /// Validate and build the definition.
    ///
    /// Fails with [`ConfigurationError::MissingInitialState`] if no initial
    /// state was set, otherwise with [`ConfigurationError::Invalid`] carrying
    /// every violation found.
    pub fn build(self) -> Result<MachineDefinition<S, E>, ConfigurationError> {
        let initial = self.initial.ok_or(ConfigurationError::MissingInitialState)?;
        let states: HashSet<S> = self.states.into_iter().collect();
        let events: HashSet<E> = self.events.into_iter().collect();
        let terminals: HashSet<S> = self.terminals.into_iter().collect();

        if let Validation::Failure(violations) =
            validate(&states, &events, &initial, &terminals, &self.transitions)
        {
            return Err(ConfigurationError::Invalid(
                violations.iter().cloned().collect(),
            ));
        }

        for transition in self
            .transitions
            .iter()
            .filter(|t| terminals.contains(&t.source))
        {
            warn!(
                state = transition.source.name(),
                event = transition.event.name(),
                "transition leaves a terminal state and can never fire"
            );
        }

        debug!(
            states = states.len(),
            events = events.len(),
            transitions = self.transitions.len(),
            initial = initial.name(),
            "machine definition built"
        );

        Ok(MachineDefinition::from_validated(
            states,
            events,
            initial,
            terminals,
            self.transitions,
        ))
    }
}

impl<S: State, E: Event> Default for MachineBuilder<S, E> {
    fn default() -> Self {
        Self::new()
    }
}

fn check(ok: bool, violation: impl FnOnce() -> DefinitionViolation) -> Check {
    if ok {
        Validation::success(())
    } else {
        Validation::fail(violation())
    }
}

/// Run every structural check, accumulating ALL violations.
fn validate<S: State, E: Event>(
    states: &HashSet<S>,
    events: &HashSet<E>,
    initial: &S,
    terminals: &HashSet<S>,
    transitions: &[Transition<S, E>],
) -> Check {
    let mut checks: Vec<Check> = Vec::new();

    checks.push(check(states.contains(initial), || {
        DefinitionViolation::UndeclaredInitial {
            state: initial.name().to_string(),
        }
    }));

    for terminal in terminals {
        checks.push(check(states.contains(terminal), || {
            DefinitionViolation::UndeclaredTerminal {
                state: terminal.name().to_string(),
            }
        }));
    }

    let mut seen = HashSet::new();
    for t in transitions {
        let source_state = t.source.name().to_string();
        let event = t.event.name().to_string();

        checks.push(check(states.contains(&t.source), || {
            DefinitionViolation::UndeclaredSource {
                source_state: source_state.clone(),
                event: event.clone(),
            }
        }));
        checks.push(check(states.contains(&t.target), || {
            DefinitionViolation::UndeclaredTarget {
                source_state: source_state.clone(),
                event: event.clone(),
                target: t.target.name().to_string(),
            }
        }));
        checks.push(check(events.contains(&t.event), || {
            DefinitionViolation::UndeclaredEvent {
                source_state: source_state.clone(),
                event: event.clone(),
            }
        }));
        checks.push(check(seen.insert((&t.source, &t.event)), || {
            DefinitionViolation::DuplicateTransition {
                source_state: source_state.clone(),
                event: event.clone(),
            }
        }));
    }

    Validation::all_vec(checks).map(|_| ())
}
