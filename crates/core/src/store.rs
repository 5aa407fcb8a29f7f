// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Durable local store over named collections.
//!
//! The store is a best-effort layer: the plain methods (`save`, `load`,
//! `add_to_sync_queue`, ...) never return errors. Failures are logged and
//! reported as `false`, `None` or an empty result. Each of them has a
//! `try_*` twin that returns the underlying [`Error`] for callers that want
//! the cause.
//!
//! Corrupt data is treated as absent.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, warn};

use crate::backend::{MemoryBackend, StorageBackend};
use crate::clock::{Clock, SystemClock};
use crate::collection::Collection;
use crate::error::{Error, Result};
use crate::record::{generate_op_id, OpId, OpKind, OperationRecord};

/// Key written and removed by [`LocalStore::is_supported`].
const PROBE_KEY: &str = "__fieldq_probe__";

/// Default cap on pending operations.
pub const DEFAULT_MAX_PENDING: usize = 10_000;

/// Bookkeeping persisted under the `settings` key.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoreSettings {
    /// Next operation sequence number. Never decreases.
    #[serde(default)]
    pub next_sequence: u64,
    /// Completion time of the last fully successful sync pass.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_sync_time: Option<DateTime<Utc>>,
}

/// Typed access to persisted collections and the sync queue.
pub struct LocalStore {
    backend: Box<dyn StorageBackend>,
    clock: Arc<dyn Clock>,
    max_pending: Option<usize>,
}

impl LocalStore {
    /// Creates a store over `backend` using the system clock and the default
    /// pending cap.
    pub fn new(backend: impl StorageBackend + 'static) -> Self {
        LocalStore {
            backend: Box::new(backend),
            clock: Arc::new(SystemClock),
            max_pending: Some(DEFAULT_MAX_PENDING),
        }
    }

    /// Creates a store over a fresh [`MemoryBackend`].
    pub fn in_memory() -> Self {
        Self::new(MemoryBackend::new())
    }

    /// Replaces the clock used for record timestamps.
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Sets the pending cap. `None` disables it.
    pub fn with_max_pending(mut self, max: Option<usize>) -> Self {
        self.max_pending = max;
        self
    }

    /// The clock this store stamps records with.
    pub fn clock(&self) -> &Arc<dyn Clock> {
        &self.clock
    }

    /// Direct access to the backend.
    pub fn backend(&self) -> &dyn StorageBackend {
        self.backend.as_ref()
    }

    /// Checks that the backend accepts a write and a delete.
    pub fn is_supported(&self) -> bool {
        let probe = || -> Result<()> {
            self.backend.set(PROBE_KEY, "probe")?;
            self.backend.remove(PROBE_KEY)
        };
        match probe() {
            Ok(()) => true,
            Err(e) => {
                warn!(error = %e, "local storage is not available");
                false
            }
        }
    }

    // ─────────────────────────────────────────────────────────────────────
    // Generic values
    // ─────────────────────────────────────────────────────────────────────

    pub fn try_save<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> Result<()> {
        let json = serde_json::to_string(value)?;
        self.backend.set(key, &json)
    }

    /// Serializes and persists `value`. Returns false on failure.
    pub fn save<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> bool {
        match self.try_save(key, value) {
            Ok(()) => true,
            Err(e) => {
                warn!(key, error = %e, "failed to save");
                false
            }
        }
    }

    pub fn try_load<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>> {
        match self.backend.get(key)? {
            None => Ok(None),
            Some(raw) => serde_json::from_str(&raw)
                .map(Some)
                .map_err(|e| Error::CorruptedData {
                    key: key.to_string(),
                    reason: e.to_string(),
                }),
        }
    }

    /// Loads a previously saved value; absent or unreadable data yields `None`.
    pub fn load<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        match self.try_load(key) {
            Ok(value) => value,
            Err(e) => {
                warn!(key, error = %e, "failed to load");
                None
            }
        }
    }

    // ─────────────────────────────────────────────────────────────────────
    // Sync queue
    // ─────────────────────────────────────────────────────────────────────

    pub fn try_add_to_sync_queue(&self, kind: OpKind, payload: Value) -> Result<OperationRecord> {
        let timestamp = self.clock.now();
        let sequence = self.allocate_sequence()?;
        let record = OperationRecord::new(
            generate_op_id(&kind, &timestamp, sequence),
            kind,
            payload,
            timestamp,
        );

        let max_pending = self.max_pending;
        let key = Collection::SyncQueue.key();
        self.backend.update(key, &mut |current| {
            let mut queue: Vec<OperationRecord> = decode_existing(key, current.as_deref())?;
            if let Some(max) = max_pending {
                if queue.iter().filter(|r| r.is_pending()).count() >= max {
                    return Err(Error::QueueFull { max });
                }
            }
            queue.push(record.clone());
            Ok(Some(serde_json::to_string(&queue)?))
        })?;

        debug!(id = %record.id, operation = %record.operation, "queued operation");
        Ok(record)
    }

    /// Appends a new pending record. `None` means nothing was queued.
    pub fn add_to_sync_queue(&self, kind: OpKind, payload: Value) -> Option<OperationRecord> {
        match self.try_add_to_sync_queue(kind, payload) {
            Ok(record) => Some(record),
            Err(e) => {
                warn!(error = %e, "failed to queue operation");
                None
            }
        }
    }

    /// Takes a record back out of the queue, whatever its status.
    ///
    /// Returns true if the record was present.
    pub fn try_remove_from_sync_queue(&self, id: &OpId) -> Result<bool> {
        let key = Collection::SyncQueue.key();
        let mut removed = false;
        self.backend.update(key, &mut |current| {
            let mut queue: Vec<OperationRecord> = decode_existing(key, current.as_deref())?;
            let before = queue.len();
            queue.retain(|r| &r.id != id);
            removed = queue.len() < before;
            if removed {
                Ok(Some(serde_json::to_string(&queue)?))
            } else {
                Ok(None)
            }
        })?;
        Ok(removed)
    }

    /// Every record in the queue, pending and completed, in enqueue order.
    pub fn all_syncs(&self) -> Vec<OperationRecord> {
        self.load(Collection::SyncQueue.key()).unwrap_or_default()
    }

    /// Pending records in enqueue order.
    pub fn get_pending_syncs(&self) -> Vec<OperationRecord> {
        self.all_syncs()
            .into_iter()
            .filter(OperationRecord::is_pending)
            .collect()
    }

    pub fn try_mark_sync_completed(&self, id: &OpId) -> Result<bool> {
        let now = self.clock.now();
        let key = Collection::SyncQueue.key();
        let mut marked = false;
        self.backend.update(key, &mut |current| {
            let mut queue: Vec<OperationRecord> = decode_existing(key, current.as_deref())?;
            marked = queue
                .iter_mut()
                .find(|r| &r.id == id)
                .is_some_and(|r| r.mark_completed(now));
            if marked {
                Ok(Some(serde_json::to_string(&queue)?))
            } else {
                Ok(None)
            }
        })?;
        Ok(marked)
    }

    /// Marks a record completed. Unknown ids are ignored.
    ///
    /// Returns true if a pending record was marked.
    pub fn mark_sync_completed(&self, id: &OpId) -> bool {
        match self.try_mark_sync_completed(id) {
            Ok(marked) => {
                if !marked {
                    debug!(%id, "no pending record to mark completed");
                }
                marked
            }
            Err(e) => {
                warn!(%id, error = %e, "failed to mark operation completed");
                false
            }
        }
    }

    pub fn try_clear_completed_syncs(&self) -> Result<usize> {
        let key = Collection::SyncQueue.key();
        let mut removed = 0;
        self.backend.update(key, &mut |current| {
            let queue: Vec<OperationRecord> = decode_existing(key, current.as_deref())?;
            let before = queue.len();
            let pending: Vec<_> = queue.into_iter().filter(|r| r.is_pending()).collect();
            removed = before - pending.len();
            if removed == 0 {
                return Ok(None);
            }
            Ok(Some(serde_json::to_string(&pending)?))
        })?;
        Ok(removed)
    }

    /// Drops completed records from the queue. Returns how many were dropped.
    pub fn clear_completed_syncs(&self) -> usize {
        match self.try_clear_completed_syncs() {
            Ok(removed) => {
                if removed > 0 {
                    debug!(removed, "purged completed operations");
                }
                removed
            }
            Err(e) => {
                warn!(error = %e, "failed to purge completed operations");
                0
            }
        }
    }

    /// Approximate bytes used by all named collections.
    pub fn get_storage_usage(&self) -> u64 {
        Collection::ALL
            .iter()
            .map(|c| match self.backend.get(c.key()) {
                Ok(Some(raw)) => raw.len() as u64,
                Ok(None) => 0,
                Err(e) => {
                    warn!(key = c.key(), error = %e, "failed to measure collection");
                    0
                }
            })
            .sum()
    }

    // ─────────────────────────────────────────────────────────────────────
    // Entity collections
    // ─────────────────────────────────────────────────────────────────────

    /// Entities stored in `collection`; empty when absent or unreadable.
    pub fn load_collection(&self, collection: Collection) -> Vec<Value> {
        self.load(collection.key()).unwrap_or_default()
    }

    pub fn try_append_entity(&self, collection: Collection, entity: Value) -> Result<()> {
        if !collection.is_entity() {
            return Err(Error::UnknownCollection(collection.key().to_string()));
        }
        let key = collection.key();
        self.backend.update(key, &mut |current| {
            let mut entities: Vec<Value> = decode_existing(key, current.as_deref())?;
            entities.push(entity.clone());
            Ok(Some(serde_json::to_string(&entities)?))
        })
    }

    /// Appends an entity to a collection. Returns false on failure.
    pub fn append_entity(&self, collection: Collection, entity: Value) -> bool {
        match self.try_append_entity(collection, entity) {
            Ok(()) => true,
            Err(e) => {
                warn!(collection = %collection, error = %e, "failed to store entity");
                false
            }
        }
    }

    // ─────────────────────────────────────────────────────────────────────
    // Settings
    // ─────────────────────────────────────────────────────────────────────

    pub fn settings(&self) -> StoreSettings {
        self.load(Collection::Settings.key()).unwrap_or_default()
    }

    pub fn last_sync_time(&self) -> Option<DateTime<Utc>> {
        self.settings().last_sync_time
    }

    /// Records the completion time of a successful pass.
    pub fn set_last_sync_time(&self, at: DateTime<Utc>) -> bool {
        let result = self.update_settings(|settings| settings.last_sync_time = Some(at));
        if let Err(e) = &result {
            warn!(error = %e, "failed to record last sync time");
        }
        result.is_ok()
    }

    fn allocate_sequence(&self) -> Result<u64> {
        let mut sequence = 0;
        self.update_settings(|settings| {
            sequence = settings.next_sequence.max(1);
            settings.next_sequence = sequence + 1;
        })?;
        Ok(sequence)
    }

    fn update_settings(&self, mut change: impl FnMut(&mut StoreSettings)) -> Result<()> {
        let key = Collection::Settings.key();
        self.backend.update(key, &mut |current| {
            let mut settings: StoreSettings = decode_or_default(key, current.as_deref());
            change(&mut settings);
            Ok(Some(serde_json::to_string(&settings)?))
        })
    }
}

/// Decodes a stored value that is about to be rewritten.
///
/// Absent data is the default. Unreadable data is an error, so the caller
/// leaves the stored bytes in place instead of overwriting them.
fn decode_existing<T: DeserializeOwned + Default>(key: &str, raw: Option<&str>) -> Result<T> {
    match raw {
        None => Ok(T::default()),
        Some(raw) => serde_json::from_str(raw).map_err(|e| Error::CorruptedData {
            key: key.to_string(),
            reason: e.to_string(),
        }),
    }
}

/// Decodes settings, treating absent or corrupt data as the default.
fn decode_or_default<T: DeserializeOwned + Default>(key: &str, raw: Option<&str>) -> T {
    match raw {
        None => T::default(),
        Some(raw) => serde_json::from_str(raw).unwrap_or_else(|e| {
            warn!(key, error = %e, "discarding unreadable stored value");
            T::default()
        }),
    }
}

#[cfg(test)]
#[path = "store_tests.rs"]
mod tests;
