// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Replays pending operations against the remote.
//!
//! A [`SyncEngine`] owns the local store and drives sync passes: each pass
//! snapshots the pending queue, delivers records strictly in enqueue order,
//! marks each one completed as the remote accepts it, and stops at the first
//! failure. Records after a failure stay pending in their original order.
//!
//! At most one pass runs at a time per engine. Passes are started manually
//! ([`SyncEngine::manual_sync`]) or by the auto-sync task, which reacts to
//! connectivity transitions and retries failed passes with backoff.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::backoff::Backoff;
use crate::clock::Clock;
use crate::collection::Collection;
use crate::connectivity::{Connectivity, ConnectivityObserver};
use crate::error::{Error, Result};
use crate::events::{EventHub, SyncEvent};
use crate::record::{OpKind, OperationRecord};
use crate::store::LocalStore;
use crate::transport::{RemoteTransport, TransportError, TransportResult};

/// Message carried by `syncComplete` when there was nothing to send.
pub const NOTHING_PENDING: &str = "No pending operations";

/// Tunables for sync passes.
#[derive(Debug, Clone)]
pub struct SyncConfig {
    /// Upper bound on a single remote call.
    pub request_timeout: Duration,
    /// Delay schedule for automatic retries after a failed pass.
    pub backoff: Backoff,
}

impl Default for SyncConfig {
    fn default() -> Self {
        SyncConfig {
            request_timeout: Duration::from_secs(10),
            backoff: Backoff::default(),
        }
    }
}

/// Whether a pass is in flight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SyncState {
    Idle,
    Syncing,
}

/// Read-only snapshot for status displays.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncStatus {
    pub is_online: bool,
    pub is_syncing: bool,
    pub pending_operations: usize,
    pub last_sync_time: Option<DateTime<Utc>>,
    pub storage_usage: u64,
}

/// How a pass ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PassOutcome {
    Completed(usize),
    Empty,
    Failed,
    AlreadyRunning,
}

impl PassOutcome {
    fn succeeded(self) -> bool {
        matches!(self, PassOutcome::Completed(_) | PassOutcome::Empty)
    }
}

/// Clears the in-flight flag however the pass ends, including when its
/// future is dropped.
struct PassGuard<'a>(&'a AtomicBool);

impl Drop for PassGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

struct AutoSync {
    cancel: CancellationToken,
    handle: JoinHandle<()>,
}

struct Inner {
    // Never held across an await
    store: Mutex<LocalStore>,
    transport: Arc<dyn RemoteTransport>,
    observer: ConnectivityObserver,
    events: EventHub,
    clock: Arc<dyn Clock>,
    config: SyncConfig,
    syncing: AtomicBool,
    auto_sync: Mutex<Option<AutoSync>>,
}

/// Sync service over a store, a transport and a connectivity observer.
///
/// Cloning yields another handle to the same engine.
#[derive(Clone)]
pub struct SyncEngine {
    inner: Arc<Inner>,
}

impl SyncEngine {
    /// Builds an engine. Timestamps come from the store's clock.
    pub fn new(
        store: LocalStore,
        transport: Arc<dyn RemoteTransport>,
        observer: ConnectivityObserver,
        events: EventHub,
        config: SyncConfig,
    ) -> Self {
        let clock = Arc::clone(store.clock());
        SyncEngine {
            inner: Arc::new(Inner {
                store: Mutex::new(store),
                transport,
                observer,
                events,
                clock,
                config,
                syncing: AtomicBool::new(false),
                auto_sync: Mutex::new(None),
            }),
        }
    }

    pub fn events(&self) -> &EventHub {
        &self.inner.events
    }

    pub fn observer(&self) -> &ConnectivityObserver {
        &self.inner.observer
    }

    pub fn state(&self) -> SyncState {
        if self.inner.syncing.load(Ordering::Acquire) {
            SyncState::Syncing
        } else {
            SyncState::Idle
        }
    }

    pub fn is_syncing(&self) -> bool {
        self.state() == SyncState::Syncing
    }

    fn with_store<R>(&self, f: impl FnOnce(&LocalStore) -> R) -> R {
        let store = self.inner.store.lock().unwrap_or_else(|e| e.into_inner());
        f(&store)
    }

    fn emit(&self, event: SyncEvent) {
        self.inner.events.notify(&event);
    }

    // ─────────────────────────────────────────────────────────────────────
    // Queue access
    // ─────────────────────────────────────────────────────────────────────

    /// Queues an operation and announces the new pending count.
    pub fn try_enqueue(&self, kind: OpKind, payload: Value) -> Result<OperationRecord> {
        let (record, pending) = self.with_store(|store| {
            let record = store.try_add_to_sync_queue(kind, payload)?;
            Ok::<_, Error>((record, store.get_pending_syncs().len()))
        })?;
        self.emit(SyncEvent::QueueUpdated { pending });
        Ok(record)
    }

    /// Like [`try_enqueue`](Self::try_enqueue), logging failures instead.
    pub fn enqueue(&self, kind: OpKind, payload: Value) -> Option<OperationRecord> {
        match self.try_enqueue(kind, payload) {
            Ok(record) => Some(record),
            Err(e) => {
                warn!(error = %e, "failed to queue operation");
                None
            }
        }
    }

    /// Queues the matching create operation, then stores the entity.
    ///
    /// Either both are written or neither: if storing the entity fails, the
    /// queued operation is withdrawn.
    pub fn try_record(&self, collection: Collection, entity: Value) -> Result<OperationRecord> {
        let kind = collection
            .create_kind()
            .ok_or_else(|| Error::UnknownCollection(collection.key().to_string()))?;
        let (record, pending) = self.with_store(|store| {
            let record = store.try_add_to_sync_queue(kind, entity.clone())?;
            if let Err(e) = store.try_append_entity(collection, entity) {
                if let Err(undo) = store.try_remove_from_sync_queue(&record.id) {
                    warn!(id = %record.id, error = %undo, "failed to withdraw queued operation");
                }
                return Err(e);
            }
            Ok::<_, Error>((record, store.get_pending_syncs().len()))
        })?;
        self.emit(SyncEvent::QueueUpdated { pending });
        Ok(record)
    }

    /// Pending operations in enqueue order.
    pub fn pending(&self) -> Vec<OperationRecord> {
        self.with_store(LocalStore::get_pending_syncs)
    }

    /// Entities stored in `collection`.
    pub fn collection(&self, collection: Collection) -> Vec<Value> {
        self.with_store(|store| store.load_collection(collection))
    }

    /// Drops completed records. Returns how many were dropped.
    pub fn purge_completed(&self) -> usize {
        let (removed, pending) = self.with_store(|store| {
            let removed = store.clear_completed_syncs();
            (removed, store.get_pending_syncs().len())
        });
        self.emit(SyncEvent::QueueUpdated { pending });
        removed
    }

    pub fn get_status(&self) -> SyncStatus {
        let (pending_operations, last_sync_time, storage_usage) = self.with_store(|store| {
            (
                store.get_pending_syncs().len(),
                store.last_sync_time(),
                store.get_storage_usage(),
            )
        });
        SyncStatus {
            is_online: self.inner.observer.is_online(),
            is_syncing: self.is_syncing(),
            pending_operations,
            last_sync_time,
            storage_usage,
        }
    }

    // ─────────────────────────────────────────────────────────────────────
    // Sync passes
    // ─────────────────────────────────────────────────────────────────────

    /// Runs one pass over the pending queue.
    ///
    /// Returns false if a pass is already running or a delivery failed.
    pub async fn sync_with_server(&self) -> bool {
        self.run_pass().await.succeeded()
    }

    /// Runs a pass if online. Offline, emits `offline` and contacts nobody.
    pub async fn manual_sync(&self) -> bool {
        if !self.inner.observer.is_online() {
            info!("offline, skipping sync");
            self.emit(SyncEvent::Offline);
            return false;
        }
        self.sync_with_server().await
    }

    async fn run_pass(&self) -> PassOutcome {
        if self
            .inner
            .syncing
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            debug!("sync already in progress");
            return PassOutcome::AlreadyRunning;
        }
        let _guard = PassGuard(&self.inner.syncing);

        self.emit(SyncEvent::SyncStart {
            timestamp: self.inner.clock.now(),
        });

        let pending = self.pending();
        if pending.is_empty() {
            debug!("nothing to sync");
            self.emit(SyncEvent::SyncComplete {
                timestamp: self.inner.clock.now(),
                operations: None,
                message: Some(NOTHING_PENDING.to_string()),
            });
            return PassOutcome::Empty;
        }

        let total = pending.len();
        let mut confirmed = 0;
        info!(total, "sync pass started");

        for (index, record) in pending.iter().enumerate() {
            debug!(id = %record.id, operation = %record.operation, "replaying operation");
            if let Err(e) = self.deliver(record).await {
                warn!(id = %record.id, error = %e, remaining = total - index, "sync pass failed");
                self.emit(SyncEvent::SyncError {
                    error: e.to_string(),
                });
                return PassOutcome::Failed;
            }
            if self.with_store(|store| store.mark_sync_completed(&record.id)) {
                confirmed += 1;
            } else {
                warn!(id = %record.id, "delivered but not marked completed, will be redelivered");
            }
            self.emit(SyncEvent::Progress {
                completed: index + 1,
                total,
                operation: record.operation.clone(),
                id: record.id.clone(),
            });
        }

        let finished = self.inner.clock.now();
        let remaining = self.with_store(|store| {
            store.clear_completed_syncs();
            store.set_last_sync_time(finished);
            store.get_pending_syncs().len()
        });
        info!(operations = confirmed, delivered = total, "sync pass complete");
        self.emit(SyncEvent::SyncComplete {
            timestamp: finished,
            operations: Some(confirmed),
            message: None,
        });
        self.emit(SyncEvent::QueueUpdated { pending: remaining });
        PassOutcome::Completed(confirmed)
    }

    async fn deliver(&self, record: &OperationRecord) -> TransportResult<()> {
        let limit = self.inner.config.request_timeout;
        match tokio::time::timeout(limit, self.inner.transport.send(record)).await {
            Ok(result) => result,
            Err(_) => Err(TransportError::Timeout(limit.as_millis() as u64)),
        }
    }

    // ─────────────────────────────────────────────────────────────────────
    // Auto-sync
    // ─────────────────────────────────────────────────────────────────────

    /// Starts the auto-sync task on the current Tokio runtime.
    ///
    /// Returns false if it is already running or there is no runtime.
    /// The task keeps the engine alive until [`dispose`](Self::dispose).
    pub fn setup_auto_sync(&self) -> bool {
        let mut slot = self.inner.auto_sync.lock().unwrap_or_else(|e| e.into_inner());
        if slot.is_some() {
            return false;
        }
        let runtime = match tokio::runtime::Handle::try_current() {
            Ok(runtime) => runtime,
            Err(e) => {
                warn!(error = %e, "auto-sync needs a tokio runtime");
                return false;
            }
        };

        let cancel = CancellationToken::new();
        let rx = self.inner.observer.subscribe();
        let handle = runtime.spawn(self.clone().auto_sync_loop(rx, cancel.clone()));
        *slot = Some(AutoSync { cancel, handle });
        debug!("auto-sync started");
        true
    }

    pub fn is_auto_sync_active(&self) -> bool {
        self.inner
            .auto_sync
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .is_some()
    }

    /// Stops the auto-sync task and waits for it to exit.
    ///
    /// A pass started by the task is abandoned at its next suspension
    /// point; records it did not finish stay pending.
    pub async fn dispose(&self) {
        let auto_sync = self
            .inner
            .auto_sync
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .take();
        if let Some(AutoSync { cancel, handle }) = auto_sync {
            cancel.cancel();
            if let Err(e) = handle.await {
                warn!(error = %e, "auto-sync task ended abnormally");
            }
        }
    }

    async fn auto_sync_loop(self, mut rx: watch::Receiver<Connectivity>, cancel: CancellationToken) {
        let mut failures: u32 = 0;
        let mut retry_at: Option<Instant> = None;

        loop {
            tokio::select! {
                _ = cancel.cancelled() => break,
                changed = rx.changed() => {
                    if changed.is_err() {
                        break;
                    }
                    let state = *rx.borrow_and_update();
                    if !state.is_online() {
                        self.emit(SyncEvent::Offline);
                        continue;
                    }
                    self.emit(SyncEvent::Online);
                    if retry_at.is_some_and(|at| Instant::now() < at) {
                        debug!("online again inside backoff window, waiting for retry");
                        continue;
                    }
                }
                _ = sleep_until(retry_at) => {
                    retry_at = None;
                    if !self.inner.observer.is_online() {
                        debug!("retry due while offline, waiting for connectivity");
                        continue;
                    }
                }
            }

            let outcome = tokio::select! {
                _ = cancel.cancelled() => break,
                outcome = self.run_pass() => outcome,
            };
            match outcome {
                PassOutcome::Failed => {
                    failures = failures.saturating_add(1);
                    let delay = self.inner.config.backoff.delay(failures);
                    info!(failures, delay_ms = delay.as_millis() as u64, "scheduling sync retry");
                    retry_at = Some(Instant::now() + delay);
                }
                PassOutcome::Completed(_) | PassOutcome::Empty => {
                    failures = 0;
                    retry_at = None;
                }
                PassOutcome::AlreadyRunning => {}
            }
        }
        debug!("auto-sync stopped");
    }
}

/// Sleeps until `deadline`, or forever when there is none.
async fn sleep_until(deadline: Option<Instant>) {
    match deadline {
        Some(at) => tokio::time::sleep_until(at).await,
        None => std::future::pending().await,
    }
}

#[cfg(test)]
#[path = "engine_tests.rs"]
mod tests;
