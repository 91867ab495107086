//! In-memory entity store.

use super::{Entity, EntityStore, StorageError, Versioned};
use std::collections::HashMap;
use std::sync::{Arc, RwLock, TryLockError, TryLockResult};
use std::time::{Duration, Instant};

const LOCK_POLL_INTERVAL: Duration = Duration::from_micros(200);

/// Lock timeout of a store built with [`MemoryStore::new`].
pub const DEFAULT_LOCK_TIMEOUT: Duration = Duration::from_secs(5);

/// Thread-safe map of entities with optimistic versioning.
///
/// Cloning the store clones the handle; all clones see the same records.
/// No storage call waits on a contended lock for longer than the store's
/// lock timeout ([`DEFAULT_LOCK_TIMEOUT`] unless changed with
/// [`with_lock_timeout`](Self::with_lock_timeout)); past it the call fails
/// with [`StorageError::Timeout`].
#[derive(Clone)]
pub struct MemoryStore<T: Entity> {
    records: Arc<RwLock<HashMap<T::Id, Versioned<T>>>>,
    lock_timeout: Duration,
}

impl<T: Entity> MemoryStore<T> {
    /// Empty store whose calls give up after [`DEFAULT_LOCK_TIMEOUT`].
    pub fn new() -> Self {
        Self::from_records(HashMap::new())
    }

    /// Bound every storage call by `timeout` instead of the default.
    pub fn with_lock_timeout(mut self, timeout: Duration) -> Self {
        self.lock_timeout = timeout;
        self
    }

    pub fn lock_timeout(&self) -> Duration {
        self.lock_timeout
    }

    pub(crate) fn from_records(records: HashMap<T::Id, Versioned<T>>) -> Self {
        Self {
            records: Arc::new(RwLock::new(records)),
            lock_timeout: DEFAULT_LOCK_TIMEOUT,
        }
    }

    pub fn len(&self) -> Result<usize, StorageError> {
        Ok(self.read()?.len())
    }

    pub fn is_empty(&self) -> Result<bool, StorageError> {
        Ok(self.read()?.is_empty())
    }

    /// Every stored record, in no particular order.
    pub fn records(&self) -> Result<Vec<Versioned<T>>, StorageError> {
        Ok(self.read()?.values().cloned().collect())
    }

    fn read(
        &self,
    ) -> Result<std::sync::RwLockReadGuard<'_, HashMap<T::Id, Versioned<T>>>, StorageError> {
        acquire(self.lock_timeout, || self.records.try_read())
    }

    fn write(
        &self,
    ) -> Result<std::sync::RwLockWriteGuard<'_, HashMap<T::Id, Versioned<T>>>, StorageError> {
        acquire(self.lock_timeout, || self.records.try_write())
    }
}

impl<T: Entity> Default for MemoryStore<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Entity> EntityStore<T> for MemoryStore<T> {
    fn load(&self, id: &T::Id) -> Result<Option<Versioned<T>>, StorageError> {
        Ok(self.read()?.get(id).cloned())
    }

    fn save(&self, entity: &T, expected_version: Option<u64>) -> Result<u64, StorageError> {
        let mut records = self.write()?;
        let id = entity.id();
        let found = records.get(id).map(|r| r.version);

        let version = match (expected_version, found) {
            (None, None) => 1,
            (None, Some(_)) => {
                return Err(StorageError::AlreadyExists { id: id.to_string() });
            }
            (Some(expected), Some(current)) if expected == current => current + 1,
            (Some(expected), found) => {
                return Err(StorageError::VersionConflict {
                    id: id.to_string(),
                    expected,
                    found,
                });
            }
        };

        records.insert(
            id.clone(),
            Versioned {
                value: entity.clone(),
                version,
            },
        );
        Ok(version)
    }
}

/// Take a lock, polling until `timeout` elapses.
fn acquire<G>(
    timeout: Duration,
    try_lock: impl Fn() -> TryLockResult<G>,
) -> Result<G, StorageError> {
    let deadline = Instant::now() + timeout;
    loop {
        match try_lock() {
            Ok(guard) => return Ok(guard),
            Err(TryLockError::Poisoned(_)) => return Err(StorageError::Poisoned),
            Err(TryLockError::WouldBlock) if Instant::now() >= deadline => {
                return Err(StorageError::Timeout(timeout));
            }
            Err(TryLockError::WouldBlock) => std::thread::sleep(LOCK_POLL_INTERVAL),
        }
    }
}
