//! Point Lifecycle
//!
//! Loads the point/entitlement machine from a JSON definition document,
//! drives a few points through it, then checkpoints the store and resumes
//! from the checkpoint.
//!
//! Key concepts:
//! - Definition loaded from configuration
//! - Effects composed first and run against the store later
//! - Checkpoint and resume of stored entities
//!
//! Run with: cargo run --example point_lifecycle

use serde::{Deserialize, Serialize};
use statekeeper::checkpoint::Checkpoint;
use statekeeper::core::{Event, MachineDefinition, State, StateHistory};
use statekeeper::effects::Lifecycle;
use statekeeper::store::{Entity, MemoryStore};
use statekeeper::{event_enum, state_enum};
use std::sync::{Arc, Mutex};
use stillwater::effect::Effect;
use tracing_subscriber::EnvFilter;

state_enum! {
    enum PointState {
        Provisional,
        Active,
        Used,
        Cancelled,
        Expired,
    }
}

event_enum! {
    enum PointEvent {
        Confirm,
        Cancel,
        Consume,
        Expire,
    }
}

const POINT_MACHINE: &str = r#"{
    "states": ["Provisional", "Active", "Used", "Cancelled", "Expired"],
    "events": ["Confirm", "Cancel", "Consume", "Expire"],
    "initial": "Provisional",
    "terminals": ["Used", "Cancelled", "Expired"],
    "transitions": [
        { "source": "Provisional", "event": "Confirm", "target": "Active" },
        { "source": "Provisional", "event": "Cancel", "target": "Cancelled" },
        { "source": "Active", "event": "Consume", "target": "Used" },
        { "source": "Active", "event": "Expire", "target": "Expired" }
    ]
}"#;

#[derive(Clone, Debug, Serialize, Deserialize)]
struct Point {
    id: u32,
    amount: u32,
    state: PointState,
}

impl Entity for Point {
    type Id = u32;
    type State = PointState;

    fn id(&self) -> &u32 {
        &self.id
    }

    fn current_state(&self) -> &PointState {
        &self.state
    }

    fn set_current_state(&mut self, state: PointState) {
        self.state = state;
    }
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    println!("=== Point Lifecycle ===\n");

    let definition: MachineDefinition<PointState, PointEvent> =
        MachineDefinition::from_json(POINT_MACHINE).expect("point definition is valid");

    let audit = Arc::new(Mutex::new(StateHistory::<PointState, PointEvent>::new()));
    let sink = Arc::clone(&audit);
    let points =
        Lifecycle::<Point, PointEvent>::new(definition).on_transition(move |_id, record| {
            if let Ok(mut history) = sink.lock() {
                *history = history.record(record.clone());
            }
        });
    let store = MemoryStore::new();

    for id in [10, 11, 12] {
        let point = Point {
            id,
            amount: 500,
            state: PointState::Provisional,
        };
        points
            .create(point)
            .run(&store)
            .await
            .expect("point is created");
    }

    let plan = vec![
        (10, PointEvent::Confirm),
        (10, PointEvent::Expire),
        (10, PointEvent::Consume),
        (11, PointEvent::Confirm),
        (12, PointEvent::Cancel),
    ];
    let steps: Vec<_> = plan
        .into_iter()
        .map(|(id, event)| (id, event, points.transition::<MemoryStore<Point>>(id, event)))
        .collect();

    for (id, event, step) in steps {
        match step.run(&store).await {
            Ok(state) => println!("point {}: {} -> {}", id, event.name(), state.name()),
            Err(e) => println!("point {}: {} rejected ({})", id, event.name(), e),
        }
    }

    if let Ok(history) = audit.lock() {
        println!("\nAudit trail: {} transitions", history.len());
    }

    println!("\nCheckpoint and resume");
    let checkpoint = store.checkpoint().expect("store is readable");
    let json = checkpoint.to_json().expect("checkpoint serializes");
    let bytes = checkpoint.to_bytes().expect("checkpoint serializes");
    println!("  JSON: {} bytes, binary: {} bytes", json.len(), bytes.len());

    let restored = Checkpoint::<Point>::from_bytes(&bytes).expect("checkpoint decodes");
    let resumed =
        MemoryStore::restore(restored, points.definition()).expect("checkpoint matches definition");

    let state = points
        .transition_in(&resumed, &11, &PointEvent::Consume)
        .expect("active point can be consumed after resume");
    println!("  point 11 after resume: {}", state.name());

    println!("\n=== Example Complete ===");
}
