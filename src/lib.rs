//! Statekeeper: declarative transition-table state machines
//!
//! Statekeeper follows a "pure core, imperative shell" layout. The core is an
//! immutable [`MachineDefinition`]: the declared states and events, the
//! initial state, the terminal states and a table of legal
//! `(state, event) -> state` transitions. Evaluating an event is a pure
//! function. Loading and saving the entities that move through the machine
//! happens in the shell, through a storage trait the caller supplies.
//!
//! # Core Concepts
//!
//! - **State / Event**: closed sets of identifiers, usually declared with
//!   [`state_enum!`] and [`event_enum!`]
//! - **Definition**: validated once by [`MachineBuilder`]; every violation is
//!   reported together
//! - **Lifecycle**: load, apply, save, with optimistic versioning and an
//!   optional transition observer
//! - **Checkpoint**: versioned snapshots of an in-memory store
//!
//! # Example
//!
//! ```rust
//! use statekeeper::{event_enum, state_enum, MachineBuilder, TransitionError};
//!
//! state_enum! {
//!     enum PointState { Provisional, Active, Used, Cancelled, Expired }
//! }
//! event_enum! {
//!     enum PointEvent { Confirm, Cancel, Consume, Expire }
//! }
//!
//! let points = MachineBuilder::new()
//!     .states(PointState::ALL.iter().cloned())
//!     .events(PointEvent::ALL.iter().cloned())
//!     .initial(PointState::Provisional)
//!     .terminals([PointState::Used, PointState::Cancelled, PointState::Expired])
//!     .transition(PointState::Provisional, PointEvent::Confirm, PointState::Active)
//!     .transition(PointState::Provisional, PointEvent::Cancel, PointState::Cancelled)
//!     .transition(PointState::Active, PointEvent::Consume, PointState::Used)
//!     .transition(PointState::Active, PointEvent::Expire, PointState::Expired)
//!     .build()
//!     .unwrap();
//!
//! let active = points.apply(&PointState::Provisional, &PointEvent::Confirm).unwrap();
//! let expired = points.apply(&active, &PointEvent::Expire).unwrap();
//! assert!(matches!(
//!     points.apply(&expired, &PointEvent::Consume),
//!     Err(TransitionError::TerminalState { .. })
//! ));
//! ```

pub mod builder;
pub mod checkpoint;
pub mod core;
pub mod effects;
pub mod store;

// Re-export commonly used types
pub use builder::{ConfigurationError, MachineBuilder};
pub use crate::core::{Event, MachineDefinition, State, StateHistory, StateTransition, TransitionError};
pub use effects::{Lifecycle, MachineError};
pub use store::{Entity, EntityStore, MemoryStore, StorageError, Versioned};
