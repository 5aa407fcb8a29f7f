// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Sync lifecycle events and their fan-out.
//!
//! Listeners are plain callbacks invoked synchronously in registration
//! order. A listener that panics is logged and skipped; the remaining
//! listeners still receive the event. Channel-based consumers can use
//! [`EventHub::subscribe`] instead.

use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::broadcast;
use tracing::error;

use crate::record::{OpId, OpKind};

/// Capacity of the broadcast channel behind [`EventHub::subscribe`].
const CHANNEL_CAPACITY: usize = 256;

/// Something observable happened during sync.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum SyncEvent {
    /// A pass began.
    SyncStart { timestamp: DateTime<Utc> },

    /// One record was delivered.
    Progress {
        completed: usize,
        total: usize,
        operation: OpKind,
        id: OpId,
    },

    /// A pass finished without failures.
    SyncComplete {
        timestamp: DateTime<Utc>,
        #[serde(skip_serializing_if = "Option::is_none")]
        operations: Option<usize>,
        #[serde(skip_serializing_if = "Option::is_none")]
        message: Option<String>,
    },

    /// A pass stopped at its first failure.
    SyncError { error: String },

    Online,

    Offline,

    /// The number of pending operations changed.
    QueueUpdated { pending: usize },
}

impl SyncEvent {
    /// Event name as it appears on the wire.
    pub fn name(&self) -> &'static str {
        match self {
            SyncEvent::SyncStart { .. } => "syncStart",
            SyncEvent::Progress { .. } => "progress",
            SyncEvent::SyncComplete { .. } => "syncComplete",
            SyncEvent::SyncError { .. } => "syncError",
            SyncEvent::Online => "online",
            SyncEvent::Offline => "offline",
            SyncEvent::QueueUpdated { .. } => "queueUpdated",
        }
    }
}

/// Handle returned by [`EventHub::add_listener`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

/// Callback invoked for every event.
pub type Listener = Arc<dyn Fn(&SyncEvent) + Send + Sync>;

struct Registry {
    next_id: AtomicU64,
    listeners: Mutex<Vec<(ListenerId, Listener)>>,
    channel: broadcast::Sender<SyncEvent>,
}

/// Registry of event listeners. Cloning shares the registry.
#[derive(Clone)]
pub struct EventHub {
    inner: Arc<Registry>,
}

impl Default for EventHub {
    fn default() -> Self {
        Self::new()
    }
}

impl EventHub {
    pub fn new() -> Self {
        let (channel, _) = broadcast::channel(CHANNEL_CAPACITY);
        EventHub {
            inner: Arc::new(Registry {
                next_id: AtomicU64::new(1),
                listeners: Mutex::new(Vec::new()),
                channel,
            }),
        }
    }

    fn listeners(&self) -> std::sync::MutexGuard<'_, Vec<(ListenerId, Listener)>> {
        self.inner.listeners.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Registers `listener`; it receives every later event.
    pub fn add_listener(&self, listener: impl Fn(&SyncEvent) + Send + Sync + 'static) -> ListenerId {
        let id = ListenerId(self.inner.next_id.fetch_add(1, Ordering::Relaxed));
        self.listeners().push((id, Arc::new(listener)));
        id
    }

    /// Unregisters a listener. Returns false if it was not registered.
    pub fn remove_listener(&self, id: ListenerId) -> bool {
        let mut listeners = self.listeners();
        let before = listeners.len();
        listeners.retain(|(existing, _)| *existing != id);
        listeners.len() != before
    }

    pub fn listener_count(&self) -> usize {
        self.listeners().len()
    }

    /// Receiver for channel-based consumption. Slow receivers may lag.
    pub fn subscribe(&self) -> broadcast::Receiver<SyncEvent> {
        self.inner.channel.subscribe()
    }

    /// Delivers `event` to every listener, then to channel subscribers.
    pub fn notify(&self, event: &SyncEvent) {
        // Listeners may add or remove listeners; deliver from a snapshot
        let snapshot: Vec<(ListenerId, Listener)> = self.listeners().clone();
        for (id, listener) in snapshot {
            if catch_unwind(AssertUnwindSafe(|| listener(event))).is_err() {
                error!(listener = id.0, event = event.name(), "event listener panicked");
            }
        }
        // No subscribers is not an error
        let _ = self.inner.channel.send(event.clone());
    }
}

#[cfg(test)]
#[path = "events_tests.rs"]
mod tests;
