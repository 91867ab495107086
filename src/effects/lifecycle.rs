//! Load/apply/save orchestration over an entity store.

use crate::core::{Event, MachineDefinition, State, StateTransition};
use crate::effects::error::MachineError;
use crate::store::{Entity, EntityStore, Versioned};
use chrono::Utc;
use std::sync::Arc;
use stillwater::effect::BoxedEffect;
use stillwater::prelude::*;
use tracing::{debug, info, warn};

/// Callback invoked after each successful, persisted transition.
pub type TransitionObserver<T, E> = Arc<
    dyn Fn(&<T as Entity>::Id, &StateTransition<<T as Entity>::State, E>) + Send + Sync,
>;

/// Drives entities of type `T` through a machine definition.
///
/// The definition is the only long-lived shared object; entity state is
/// threaded through load, apply and save on every call. A `Lifecycle` is
/// cheap to clone.
///
/// # Example
///
/// ```rust
/// use statekeeper::builder::MachineBuilder;
/// use statekeeper::effects::Lifecycle;
/// use statekeeper::store::{Entity, MemoryStore};
/// use statekeeper::{event_enum, state_enum};
///
/// state_enum! {
///     pub enum OrderState { Submitted, Paid, Fulfilled }
/// }
/// event_enum! {
///     pub enum OrderEvent { Pay, Fulfill }
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
///     fn id(&self) -> &u64 { &self.id }
///     fn current_state(&self) -> &OrderState { &self.state }
///     fn set_current_state(&mut self, state: OrderState) { self.state = state; }
/// }
///
/// let definition = MachineBuilder::new()
///     .states(OrderState::ALL.iter().cloned())
///     .events(OrderEvent::ALL.iter().cloned())
///     .initial(OrderState::Submitted)
///     .terminal(OrderState::Fulfilled)
///     .transition(OrderState::Submitted, OrderEvent::Pay, OrderState::Paid)
///     .transition(OrderState::Paid, OrderEvent::Fulfill, OrderState::Fulfilled)
///     .build()
///     .unwrap();
///
/// let orders: Lifecycle<Order, OrderEvent> = Lifecycle::new(definition);
/// let store = MemoryStore::new();
///
/// orders.create_in(&store, Order { id: 1, state: OrderState::Submitted }).unwrap();
/// assert_eq!(orders.transition_in(&store, &1, &OrderEvent::Pay), Ok(OrderState::Paid));
/// ```
pub struct Lifecycle<T: Entity, E: Event> {
    definition: Arc<MachineDefinition<T::State, E>>,
    observer: Option<TransitionObserver<T, E>>,
}

impl<T: Entity, E: Event> Clone for Lifecycle<T, E> {
    fn clone(&self) -> Self {
        Self {
            definition: Arc::clone(&self.definition),
            observer: self.observer.clone(),
        }
    }
}

impl<T: Entity, E: Event> Lifecycle<T, E> {
    pub fn new(definition: MachineDefinition<T::State, E>) -> Self {
        Self::shared(Arc::new(definition))
    }

    /// Use a definition that is already shared with other lifecycles.
    pub fn shared(definition: Arc<MachineDefinition<T::State, E>>) -> Self {
        Self {
            definition,
            observer: None,
        }
    }

    /// Register a callback run synchronously after every successful save.
    ///
    /// Replaces any previously registered observer.
    pub fn on_transition<F>(mut self, observer: F) -> Self
    where
        F: Fn(&T::Id, &StateTransition<T::State, E>) + Send + Sync + 'static,
    {
        self.observer = Some(Arc::new(observer));
        self
    }

    pub fn definition(&self) -> &MachineDefinition<T::State, E> {
        &self.definition
    }

    /// Put `entity` in the initial state and insert it into `store`.
    ///
    /// Whatever state the entity carried is overwritten. Fails with
    /// [`StorageError::AlreadyExists`](crate::store::StorageError::AlreadyExists)
    /// if the id is taken.
    pub fn create_in<St>(&self, store: &St, mut entity: T) -> Result<T, MachineError>
    where
        St: EntityStore<T>,
    {
        entity.set_current_state(self.definition.initial().clone());
        store.save(&entity, None)?;
        info!(
            entity = %entity.id(),
            state = entity.current_state().name(),
            "entity created"
        );
        Ok(entity)
    }

    /// Load `id`, apply `event`, and save the new state before returning it.
    ///
    /// On any failure the stored entity is left exactly as it was and the
    /// error is returned unchanged. The save is conditional on the version
    /// that was loaded, so a concurrent writer makes this call fail with
    /// [`StorageError::VersionConflict`](crate::store::StorageError::VersionConflict)
    /// rather than overwrite the other writer's state.
    pub fn transition_in<St>(
        &self,
        store: &St,
        id: &T::Id,
        event: &E,
    ) -> Result<T::State, MachineError>
    where
        St: EntityStore<T>,
    {
        let Versioned {
            value: mut entity,
            version,
        } = self.load(store, id)?;
        let from = entity.current_state().clone();

        let to = match self.definition.apply(&from, event) {
            Ok(to) => to,
            Err(err) => {
                warn!(entity = %id, version, error = %err, "event rejected");
                return Err(err.into());
            }
        };

        entity.set_current_state(to.clone());
        let saved_version = store.save(&entity, Some(version))?;

        let record = StateTransition {
            from,
            event: event.clone(),
            to: to.clone(),
            timestamp: Utc::now(),
            version: saved_version,
        };
        info!(
            entity = %id,
            from = record.from.name(),
            event = record.event.name(),
            to = record.to.name(),
            version = saved_version,
            "state changed"
        );
        if let Some(observer) = &self.observer {
            observer(id, &record);
        }

        Ok(to)
    }

    /// Current state of `id`.
    pub fn state_of<St>(&self, store: &St, id: &T::Id) -> Result<T::State, MachineError>
    where
        St: EntityStore<T>,
    {
        Ok(self.load(store, id)?.value.current_state().clone())
    }

    /// Events `id` would currently accept, in declaration order.
    pub fn available_events_for<St>(&self, store: &St, id: &T::Id) -> Result<Vec<E>, MachineError>
    where
        St: EntityStore<T>,
    {
        let state = self.state_of(store, id)?;
        Ok(self
            .definition
            .available_events(&state)
            .into_iter()
            .cloned()
            .collect())
    }

    /// Deferred [`create_in`](Self::create_in), run against a store
    /// environment.
    pub fn create<St>(&self, entity: T) -> BoxedEffect<T, MachineError, St>
    where
        St: EntityStore<T> + Clone + 'static,
    {
        let lifecycle = self.clone();
        from_fn(move |store: &St| lifecycle.create_in(store, entity.clone())).boxed()
    }

    /// Deferred [`transition_in`](Self::transition_in), run against a store
    /// environment.
    pub fn transition<St>(&self, id: T::Id, event: E) -> BoxedEffect<T::State, MachineError, St>
    where
        St: EntityStore<T> + Clone + 'static,
    {
        let lifecycle = self.clone();
        from_fn(move |store: &St| lifecycle.transition_in(store, &id, &event)).boxed()
    }

    fn load<St>(&self, store: &St, id: &T::Id) -> Result<Versioned<T>, MachineError>
    where
        St: EntityStore<T>,
    {
        let record = store
            .load(id)?
            .ok_or_else(|| MachineError::NotFound { id: id.to_string() })?;
        debug!(
            entity = %id,
            state = record.value.current_state().name(),
            version = record.version,
            "entity loaded"
        );
        Ok(record)
    }
}
