//! Order and point machines shared by the integration tests.

#![allow(dead_code)]

use statekeeper::builder::MachineBuilder;
use statekeeper::core::MachineDefinition;
use statekeeper::store::Entity;
use statekeeper::{event_enum, state_enum};

state_enum! {
    pub enum OrderState {
        Submitted,
        Paid,
        Fulfilled,
        Cancelled,
    }
}

event_enum! {
    pub enum OrderEvent {
        Pay,
        Fulfill,
        Cancel,
    }
}

state_enum! {
    pub enum PointState {
        Provisional,
        Active,
        Used,
        Cancelled,
        Expired,
    }
}

event_enum! {
    pub enum PointEvent {
        Confirm,
        Cancel,
        Consume,
        Expire,
    }
}

pub fn order_definition() -> MachineDefinition<OrderState, OrderEvent> {
    MachineBuilder::new()
        .states(OrderState::ALL.iter().cloned())
        .events(OrderEvent::ALL.iter().cloned())
        .initial(OrderState::Submitted)
        .terminals([OrderState::Fulfilled, OrderState::Cancelled])
        .transition(OrderState::Submitted, OrderEvent::Pay, OrderState::Paid)
        .transition(OrderState::Paid, OrderEvent::Fulfill, OrderState::Fulfilled)
        .transition(OrderState::Submitted, OrderEvent::Cancel, OrderState::Cancelled)
        .transition(OrderState::Paid, OrderEvent::Cancel, OrderState::Cancelled)
        .build()
        .expect("order definition is valid")
}

pub fn point_definition() -> MachineDefinition<PointState, PointEvent> {
    MachineBuilder::new()
        .states(PointState::ALL.iter().cloned())
        .events(PointEvent::ALL.iter().cloned())
        .initial(PointState::Provisional)
        .terminals([PointState::Used, PointState::Cancelled, PointState::Expired])
        .transition(PointState::Provisional, PointEvent::Confirm, PointState::Active)
        .transition(PointState::Provisional, PointEvent::Cancel, PointState::Cancelled)
        .transition(PointState::Active, PointEvent::Consume, PointState::Used)
        .transition(PointState::Active, PointEvent::Expire, PointState::Expired)
        .build()
        .expect("point definition is valid")
}

#[derive(Clone, Debug, PartialEq)]
pub struct Order {
    pub id: u64,
    pub state: OrderState,
}

impl Order {
    pub fn new(id: u64) -> Self {
        Self {
            id,
            state: OrderState::Submitted,
        }
    }
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

#[derive(Clone, Debug, PartialEq)]
pub struct Point {
    pub id: u32,
    pub state: PointState,
}

impl Point {
    pub fn new(id: u32) -> Self {
        Self {
            id,
            state: PointState::Provisional,
        }
    }
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
