//! Order Lifecycle
//!
//! Walks one order through Submitted -> Paid -> Fulfilled against an
//! in-memory store, then shows that a fulfilled order rejects further
//! events.
//!
//! Key concepts:
//! - Definition declared in code with the builder
//! - Load/apply/save through `Lifecycle`
//! - Observer hook for state-change notifications
//!
//! Run with: cargo run --example order_lifecycle

use chrono::{DateTime, Utc};
use statekeeper::builder::MachineBuilder;
use statekeeper::core::{Event, State};
use statekeeper::effects::Lifecycle;
use statekeeper::store::{Entity, EntityStore, MemoryStore};
use statekeeper::{event_enum, state_enum};
use tracing_subscriber::EnvFilter;
use uuid::Uuid;

state_enum! {
    enum OrderState {
        Submitted,
        Paid,
        Fulfilled,
        Cancelled,
    }
}

event_enum! {
    enum OrderEvent {
        Pay,
        Fulfill,
        Cancel,
    }
}

#[derive(Clone, Debug)]
struct Order {
    id: u64,
    placed_at: DateTime<Utc>,
    payment_confirmation: Option<Uuid>,
    state: OrderState,
}

impl Entity for Order {
    type Id = u64;
    type State = OrderState;

    fn id(&self) -> &u64 {
        &self.id
    }

    fn current_state(&self) -> &OrderState {
        &self.state
    }

    fn set_current_state(&mut self, state: OrderState) {
        self.state = state;
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    println!("=== Order Lifecycle ===\n");

    let definition = MachineBuilder::new()
        .states(OrderState::ALL.iter().cloned())
        .events(OrderEvent::ALL.iter().cloned())
        .initial(OrderState::Submitted)
        .terminals([OrderState::Fulfilled, OrderState::Cancelled])
        .transition(OrderState::Submitted, OrderEvent::Pay, OrderState::Paid)
        .transition(OrderState::Paid, OrderEvent::Fulfill, OrderState::Fulfilled)
        .transition(OrderState::Submitted, OrderEvent::Cancel, OrderState::Cancelled)
        .transition(OrderState::Paid, OrderEvent::Cancel, OrderState::Cancelled)
        .build()
        .expect("order definition is valid");

    let orders =
        Lifecycle::<Order, OrderEvent>::new(definition).on_transition(|id, record| {
            println!(
                "  [Listener] order {}: {} -> {} (version {})",
                id,
                record.from.name(),
                record.to.name(),
                record.version
            );
        });
    let store = MemoryStore::new();

    let order = orders
        .create_in(
            &store,
            Order {
                id: 123,
                placed_at: Utc::now(),
                payment_confirmation: None,
                state: OrderState::Submitted,
            },
        )
        .expect("order is created");
    println!(
        "Created order {} at {} in state {}\n",
        order.id,
        order.placed_at.to_rfc3339(),
        order.state.name()
    );

    let confirmation = Uuid::new_v4();
    println!("Step 1: Pay (confirmation {})", confirmation);
    let pending = store
        .load(&order.id)
        .expect("store is readable")
        .expect("order exists");
    let mut confirmed = pending.value;
    confirmed.payment_confirmation = Some(confirmation);
    store
        .save(&confirmed, Some(pending.version))
        .expect("confirmation is recorded");
    let state = orders
        .transition_in(&store, &order.id, &OrderEvent::Pay)
        .expect("submitted order can be paid");
    println!("  after pay(): {}\n", state.name());

    println!("Step 2: Fulfill");
    let state = orders
        .transition_in(&store, &order.id, &OrderEvent::Fulfill)
        .expect("paid order can be fulfilled");
    println!("  after fulfill(): {}\n", state.name());

    println!("Step 3: Fulfill again");
    match orders.transition_in(&store, &order.id, &OrderEvent::Fulfill) {
        Ok(state) => println!("  unexpected transition to {}", state.name()),
        Err(e) => println!("  rejected: {}", e),
    }

    let stored = store
        .load(&order.id)
        .expect("store is readable")
        .expect("order exists");
    println!(
        "\nStored order: {:?} (version {})",
        stored.value, stored.version
    );
    if let Some(confirmation) = stored.value.payment_confirmation {
        println!("Paid with confirmation {}", confirmation);
    }

    println!("\n=== Example Complete ===");
}
