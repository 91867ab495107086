//! Checkpoint and resume for in-memory stores.
//!
//! A checkpoint is a versioned snapshot of every record in a
//! [`MemoryStore`], serializable to JSON or to a compact binary form, so a
//! process can persist its entities and pick them up again after a restart.

use crate::core::{Event, MachineDefinition, State};
use crate::store::{Entity, MemoryStore, StorageError, Versioned};
use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use tracing::info;
use uuid::Uuid;

pub mod error;

pub use error::CheckpointError;

/// Version identifier for checkpoint format
pub const CHECKPOINT_VERSION: u32 = 1;

/// Serializable snapshot of stored entities.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(bound(serialize = "T: Serialize", deserialize = "T: DeserializeOwned"))]
pub struct Checkpoint<T> {
    /// Checkpoint format version
    pub version: u32,

    /// Unique checkpoint identifier
    pub id: String,

    /// When checkpoint was created
    pub timestamp: DateTime<Utc>,

    /// Every stored record with its version
    pub records: Vec<Versioned<T>>,
}

impl<T> Checkpoint<T> {
    pub fn new(records: Vec<Versioned<T>>) -> Self {
        Self {
            version: CHECKPOINT_VERSION,
            id: Uuid::new_v4().to_string(),
            timestamp: Utc::now(),
            records,
        }
    }

    fn check_version(self) -> Result<Self, CheckpointError> {
        if self.version != CHECKPOINT_VERSION {
            return Err(CheckpointError::UnsupportedVersion {
                found: self.version,
                supported: CHECKPOINT_VERSION,
            });
        }
        Ok(self)
    }
}

impl<T: Serialize + DeserializeOwned> Checkpoint<T> {
    pub fn to_json(&self) -> Result<String, CheckpointError> {
        serde_json::to_string_pretty(self).map_err(|e| CheckpointError::Encode(e.to_string()))
    }

    /// Decode a JSON checkpoint, rejecting unknown format versions.
    pub fn from_json(json: &str) -> Result<Self, CheckpointError> {
        let checkpoint: Self =
            serde_json::from_str(json).map_err(|e| CheckpointError::Decode(e.to_string()))?;
        checkpoint.check_version()
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>, CheckpointError> {
        bincode::serialize(self).map_err(|e| CheckpointError::Encode(e.to_string()))
    }

    /// Decode a binary checkpoint, rejecting unknown format versions.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, CheckpointError> {
        let checkpoint: Self =
            bincode::deserialize(bytes).map_err(|e| CheckpointError::Decode(e.to_string()))?;
        checkpoint.check_version()
    }
}

impl<T: Entity> Checkpoint<T> {
    /// Check every record against `definition`: ids are unique, versions
    /// start at 1 and states are declared.
    pub fn validate<E: Event>(
        &self,
        definition: &MachineDefinition<T::State, E>,
    ) -> Result<(), CheckpointError> {
        let mut seen = HashSet::new();
        for record in &self.records {
            check_record(record, &mut seen)?;
            let state = record.value.current_state();
            if !definition.is_declared_state(state) {
                return Err(CheckpointError::UndeclaredState {
                    id: record.value.id().to_string(),
                    state: state.name().to_string(),
                });
            }
        }
        Ok(())
    }
}

/// Structural checks shared by [`Checkpoint::validate`] and
/// [`MemoryStore::from_checkpoint`].
fn check_record<'a, T: Entity>(
    record: &'a Versioned<T>,
    seen: &mut HashSet<&'a T::Id>,
) -> Result<(), CheckpointError> {
    let id = record.value.id();
    if !seen.insert(id) {
        return Err(CheckpointError::DuplicateId { id: id.to_string() });
    }
    if record.version == 0 {
        return Err(CheckpointError::InvalidVersion { id: id.to_string() });
    }
    Ok(())
}

impl<T: Entity> MemoryStore<T> {
    /// Snapshot every record currently in the store.
    pub fn checkpoint(&self) -> Result<Checkpoint<T>, StorageError> {
        let checkpoint = Checkpoint::new(self.records()?);
        info!(
            checkpoint = %checkpoint.id,
            records = checkpoint.records.len(),
            "store checkpoint taken"
        );
        Ok(checkpoint)
    }

    /// Rebuild a store from a checkpoint, keeping record versions.
    ///
    /// Only the checkpoint's own structure is checked (unique ids, versions
    /// from 1). States are not checked against any definition: call
    /// [`Checkpoint::validate`] first, or use [`restore`](Self::restore).
    pub fn from_checkpoint(checkpoint: Checkpoint<T>) -> Result<Self, CheckpointError> {
        let mut seen = HashSet::new();
        for record in &checkpoint.records {
            check_record(record, &mut seen)?;
        }

        let records: HashMap<_, _> = checkpoint
            .records
            .into_iter()
            .map(|record| (record.value.id().clone(), record))
            .collect();
        info!(
            checkpoint = %checkpoint.id,
            records = records.len(),
            "store restored from checkpoint"
        );
        Ok(Self::from_records(records))
    }

    /// Validate `checkpoint` against `definition` and rebuild a store from it.
    pub fn restore<E: Event>(
        checkpoint: Checkpoint<T>,
        definition: &MachineDefinition<T::State, E>,
    ) -> Result<Self, CheckpointError> {
        checkpoint.validate(definition)?;
        Self::from_checkpoint(checkpoint)
    }
}
