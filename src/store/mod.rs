//! Storage interface for entities driven by a machine definition.
//!
//! The library never owns entity records. It reads and writes them through
//! an [`EntityStore`] supplied by the caller, so the backing technology can
//! be swapped freely; [`MemoryStore`] is the in-process implementation used
//! by tests and demos.

use crate::core::State;
use serde::{Deserialize, Serialize};
use std::fmt::{Debug, Display};
use std::hash::Hash;

mod error;
mod memory;

pub use error::StorageError;
pub use memory::{MemoryStore, DEFAULT_LOCK_TIMEOUT};

/// An application record whose lifecycle is governed by a machine definition.
///
/// # Example
///
/// ```rust
/// use statekeeper::state_enum;
/// use statekeeper::store::Entity;
///
/// state_enum! {
///     pub enum OrderState { Submitted, Paid }
/// }
///
/// #[derive(Clone, Debug)]
/// struct Order {
///     id: u64,
///     state: OrderState,
/// }
///
/// impl Entity for Order {
///     type Id = u64;
///     type State = OrderState;
///
///     fn id(&self) -> &u64 {
///         &self.id
///     }
///
///     fn current_state(&self) -> &OrderState {
///         &self.state
///     }
///
///     fn set_current_state(&mut self, state: OrderState) {
///         self.state = state;
///     }
/// }
/// ```
pub trait Entity: Clone + Send + Sync + 'static {
    type Id: Clone + Eq + Hash + Debug + Display + Send + Sync + 'static;
    type State: State;

    fn id(&self) -> &Self::Id;

    fn current_state(&self) -> &Self::State;

    fn set_current_state(&mut self, state: Self::State);
}

/// A stored record together with its optimistic-concurrency version.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Versioned<T> {
    pub value: T,
    pub version: u64,
}

/// Load/save access to entities of type `T`.
///
/// Every successful save bumps the record's version. Passing the version
/// that was loaded as `expected_version` makes the save conditional: the
/// store must reject it with [`StorageError::VersionConflict`] if the record
/// changed in between. `None` means "insert"; the first stored version is 1.
pub trait EntityStore<T: Entity>: Send + Sync {
    /// Fetch the record for `id`, or `None` if it does not exist.
    fn load(&self, id: &T::Id) -> Result<Option<Versioned<T>>, StorageError>;

    /// Insert or conditionally replace `entity`, returning its new version.
    fn save(&self, entity: &T, expected_version: Option<u64>) -> Result<u64, StorageError>;
}
