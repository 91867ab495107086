//! Property-based tests for transition tables.
//!
//! These tests use proptest to verify properties hold across
//! many randomly generated inputs.

mod common;

use common::*;
use proptest::prelude::*;
use statekeeper::builder::{ConfigurationError, DefinitionViolation, MachineBuilder};
use statekeeper::core::{Transition, TransitionError};
use statekeeper::effects::{Lifecycle, MachineError};
use statekeeper::store::{EntityStore, MemoryStore};
use statekeeper::{event_enum, state_enum};
use std::collections::HashSet;

prop_compose! {
    fn arbitrary_order_state()(index in 0..OrderState::ALL.len()) -> OrderState {
        OrderState::ALL[index]
    }
}

prop_compose! {
    fn arbitrary_order_event()(index in 0..OrderEvent::ALL.len()) -> OrderEvent {
        OrderEvent::ALL[index]
    }
}

prop_compose! {
    fn arbitrary_point_state()(index in 0..PointState::ALL.len()) -> PointState {
        PointState::ALL[index]
    }
}

prop_compose! {
    fn arbitrary_point_event()(index in 0..PointEvent::ALL.len()) -> PointEvent {
        PointEvent::ALL[index]
    }
}

state_enum! {
    enum Node { A, B, C, D }
}

event_enum! {
    enum Edge { X, Y, Z }
}

prop_compose! {
    fn arbitrary_row()(
        source in 0..Node::ALL.len(),
        event in 0..Edge::ALL.len(),
        target in 0..Node::ALL.len(),
    ) -> Transition<Node, Edge> {
        Transition::new(Node::ALL[source], Edge::ALL[event], Node::ALL[target])
    }
}

/// Path from the initial order state to `target` through legal events.
fn order_path_to(target: OrderState) -> Vec<OrderEvent> {
    match target {
        OrderState::Submitted => vec![],
        OrderState::Paid => vec![OrderEvent::Pay],
        OrderState::Fulfilled => vec![OrderEvent::Pay, OrderEvent::Fulfill],
        OrderState::Cancelled => vec![OrderEvent::Cancel],
    }
}

proptest! {
    #[test]
    fn apply_stays_within_declared_states(
        state in arbitrary_order_state(),
        event in arbitrary_order_event(),
    ) {
        let definition = order_definition();
        if let Ok(next) = definition.apply(&state, &event) {
            prop_assert!(definition.is_declared_state(&next));
        }
    }

    #[test]
    fn apply_on_any_valid_table_stays_within_declared_states(
        rows in prop::collection::vec(arbitrary_row(), 0..16),
        declared_mask in 1u8..16,
        terminal_mask in 0u8..16,
        state in 0..Node::ALL.len(),
        event in 0..Edge::ALL.len(),
    ) {
        let declared: Vec<Node> = Node::ALL
            .iter()
            .enumerate()
            .filter(|(i, _)| declared_mask & (1 << i) != 0)
            .map(|(_, n)| *n)
            .collect();
        let terminals: Vec<Node> = declared
            .iter()
            .enumerate()
            .filter(|(i, _)| terminal_mask & (1 << i) != 0)
            .map(|(_, n)| *n)
            .collect();
        let mut unique = HashSet::new();
        let rows: Vec<_> = rows
            .into_iter()
            .filter(|t| declared.contains(&t.source) && declared.contains(&t.target))
            .filter(|t| unique.insert((t.source, t.event)))
            .collect();

        let definition = MachineBuilder::new()
            .states(declared.iter().cloned())
            .events(Edge::ALL.iter().cloned())
            .initial(declared[0])
            .terminals(terminals)
            .transitions(rows)
            .build()
            .unwrap();

        let state = Node::ALL[state];
        let event = Edge::ALL[event];
        if let Ok(next) = definition.apply(&state, &event) {
            prop_assert!(definition.is_declared_state(&next), "undeclared target {:?}", next);
            prop_assert!(definition.is_declared_state(&state), "undeclared source {:?} accepted", state);
        }
    }

    #[test]
    fn apply_agrees_with_table(
        state in arbitrary_point_state(),
        event in arbitrary_point_event(),
    ) {
        let definition = point_definition();
        let result = definition.apply(&state, &event);

        if definition.is_terminal(&state) {
            prop_assert!(matches!(result, Err(TransitionError::TerminalState { .. })), "terminal state must reject");
        } else {
            match definition.target(&state, &event) {
                Some(target) => prop_assert_eq!(result, Ok(*target)),
                None => prop_assert_eq!(
                    result,
                    Err(TransitionError::IllegalTransition {
                        state: format!("{:?}", state),
                        event: format!("{:?}", event),
                    })
                ),
            }
        }
    }

    #[test]
    fn terminal_states_reject_every_event(
        state in arbitrary_order_state(),
        event in arbitrary_order_event(),
    ) {
        let definition = order_definition();
        prop_assume!(definition.is_terminal(&state));

        prop_assert!(matches!(
            definition.apply(&state, &event),
            Err(TransitionError::TerminalState { .. })
        ), "terminal state must reject");
    }

    #[test]
    fn rejection_is_idempotent(
        state in arbitrary_order_state(),
        event in arbitrary_order_event(),
    ) {
        let definition = order_definition();
        let first = definition.apply(&state, &event);
        prop_assume!(first.is_err());

        prop_assert_eq!(first, definition.apply(&state, &event));
    }

    #[test]
    fn rejected_event_never_touches_stored_entity(
        target in arbitrary_order_state(),
        event in arbitrary_order_event(),
    ) {
        let orders: Lifecycle<Order, OrderEvent> = Lifecycle::new(order_definition());
        let store = MemoryStore::new();
        orders.create_in(&store, Order::new(1)).unwrap();
        for step in order_path_to(target) {
            orders.transition_in(&store, &1, &step).unwrap();
        }
        let before = store.load(&1).unwrap().unwrap();

        let first = orders.transition_in(&store, &1, &event);
        prop_assume!(first.is_err());
        let second = orders.transition_in(&store, &1, &event);

        prop_assert!(matches!(first, Err(MachineError::Transition(_))), "expected a transition error");
        prop_assert_eq!(&first, &second);
        prop_assert_eq!(store.load(&1).unwrap().unwrap(), before);
    }

    #[test]
    fn replay_path_matches_step_by_step_apply(
        events in prop::collection::vec(arbitrary_point_event(), 0..6)
    ) {
        let definition = point_definition();

        let mut current = PointState::Provisional;
        let mut expected = Ok(());
        for event in &events {
            match definition.apply(&current, event) {
                Ok(next) => current = next,
                Err(err) => {
                    expected = Err(err);
                    break;
                }
            }
        }

        match (definition.replay(PointState::Provisional, events.clone()), expected) {
            (Ok(history), Ok(())) => {
                let last = history.last_state().copied().unwrap_or(PointState::Provisional);
                prop_assert_eq!(last, current);
                prop_assert_eq!(history.len(), events.len());
            }
            (Err(actual), Err(expected)) => prop_assert_eq!(actual, expected),
            (actual, expected) => prop_assert!(false, "replay {:?} vs apply {:?}", actual.map(|h| h.len()), expected),
        }
    }

    #[test]
    fn duplicate_keys_are_always_rejected(
        rows in prop::collection::vec(arbitrary_row(), 0..12)
    ) {
        let mut keys = HashSet::new();
        let has_duplicate = !rows.iter().all(|t| keys.insert((t.source, t.event)));

        let result = MachineBuilder::new()
            .states(Node::ALL.iter().cloned())
            .events(Edge::ALL.iter().cloned())
            .initial(Node::A)
            .transitions(rows)
            .build();

        match result {
            Ok(_) => prop_assert!(!has_duplicate, "duplicate key accepted"),
            Err(ConfigurationError::Invalid(violations)) => {
                prop_assert!(has_duplicate, "unexpected rejection");
                let only_duplicates = violations
                    .iter()
                    .all(|v| matches!(v, DefinitionViolation::DuplicateTransition { .. }));
                prop_assert!(only_duplicates, "non-duplicate violation reported");
            }
            Err(other) => prop_assert!(false, "unexpected error: {}", other),
        }
    }

    #[test]
    fn undeclared_references_are_always_rejected(
        rows in prop::collection::vec(arbitrary_row(), 1..8),
        declared_mask in 1u8..16,
    ) {
        let declared: Vec<Node> = Node::ALL
            .iter()
            .enumerate()
            .filter(|(i, _)| declared_mask & (1 << i) != 0)
            .map(|(_, n)| *n)
            .collect();
        let initial = declared[0];

        let mut unique = HashSet::new();
        let rows: Vec<_> = rows
            .into_iter()
            .filter(|t| unique.insert((t.source, t.event)))
            .collect();
        let references_undeclared = rows
            .iter()
            .any(|t| !declared.contains(&t.source) || !declared.contains(&t.target));

        let result = MachineBuilder::new()
            .states(declared.iter().cloned())
            .events(Edge::ALL.iter().cloned())
            .initial(initial)
            .transitions(rows)
            .build();

        prop_assert_eq!(result.is_err(), references_undeclared);
    }

    #[test]
    fn undeclared_initial_is_always_rejected(initial in 0..Node::ALL.len()) {
        let initial = Node::ALL[initial];
        let states: Vec<Node> = Node::ALL.iter().cloned().filter(|n| *n != initial).collect();

        let result: Result<_, _> = MachineBuilder::<Node, Edge>::new()
            .states(states)
            .initial(initial)
            .build();

        let err = result.unwrap_err();
        prop_assert_eq!(
            err.violations(),
            &[DefinitionViolation::UndeclaredInitial { state: format!("{:?}", initial) }]
        );
    }
}
