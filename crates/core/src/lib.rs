// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! fq-core: offline mutation queue and sync engine
//!
//! This crate provides the durable local store, the pending operation
//! queue, connectivity tracking, sync events, and the engine that replays
//! queued operations against a remote. It is shared by the fieldq CLI and
//! the fq-remote relay.

pub mod backend;
pub mod backoff;
pub mod clock;
pub mod collection;
pub mod connectivity;
pub mod engine;
pub mod error;
pub mod events;
pub mod jsonl;
pub mod protocol;
pub mod queue;
pub mod record;
pub mod store;
pub mod transport;

pub use backend::{MemoryBackend, SqliteBackend, StorageBackend};
pub use backoff::Backoff;
pub use clock::{Clock, ManualClock, SystemClock};
pub use collection::Collection;
pub use connectivity::{Connectivity, ConnectivityObserver};
pub use engine::{SyncConfig, SyncEngine, SyncState, SyncStatus};
pub use error::{Error, Result};
pub use events::{EventHub, Listener, ListenerId, SyncEvent};
pub use queue::PendingQueue;
pub use record::{generate_op_id, OpId, OpKind, OpStatus, OperationRecord};
pub use store::{LocalStore, StoreSettings};
pub use transport::{RemoteTransport, TransportError, TransportFuture, TransportResult};
