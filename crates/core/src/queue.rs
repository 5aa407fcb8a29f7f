// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! FIFO view over the pending operations in a [`LocalStore`].
//!
//! The queue owns no state of its own. Enqueue appends to the persisted
//! sync queue; every read is a scan of it filtered to pending records.

use serde_json::Value;

use crate::record::{OpKind, OperationRecord};
use crate::store::LocalStore;

/// Pending operations in enqueue order.
pub struct PendingQueue<'a> {
    store: &'a LocalStore,
}

impl<'a> PendingQueue<'a> {
    pub fn new(store: &'a LocalStore) -> Self {
        PendingQueue { store }
    }

    /// Appends an operation. `None` if it could not be persisted.
    pub fn enqueue(&self, kind: OpKind, payload: Value) -> Option<OperationRecord> {
        self.store.add_to_sync_queue(kind, payload)
    }

    /// All pending operations, oldest first.
    pub fn snapshot(&self) -> Vec<OperationRecord> {
        self.store.get_pending_syncs()
    }

    /// The oldest pending operation.
    pub fn peek(&self) -> Option<OperationRecord> {
        self.snapshot().into_iter().next()
    }

    pub fn len(&self) -> usize {
        self.snapshot().len()
    }

    pub fn is_empty(&self) -> bool {
        self.peek().is_none()
    }
}

#[cfg(test)]
#[path = "queue_tests.rs"]
mod tests;
