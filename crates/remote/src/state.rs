// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Relay state: the applied-operations log and its id index.

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tokio::sync::Mutex;
use tracing::info;

use fq_core::{jsonl, OpId, OperationRecord, Result};

/// File under the data directory holding every applied record.
pub const APPLIED_LOG: &str = "applied.jsonl";

/// What happened to a submitted record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Applied,
    /// Already in the log; nothing was written.
    Duplicate,
    /// Refused by policy; nothing was written.
    Rejected(String),
}

/// Shared relay state.
#[derive(Clone)]
pub struct RelayState {
    inner: Arc<RelayStateInner>,
}

struct RelayStateInner {
    log_path: PathBuf,
    /// Ids present in the log (protected by mutex for appends).
    applied: Mutex<HashSet<OpId>>,
    /// Operation kinds answered with `rejected`.
    reject_kinds: HashSet<String>,
}

impl RelayState {
    /// Opens the applied log in `data_dir`, indexing the ids already there.
    pub fn new(data_dir: &Path, reject_kinds: impl IntoIterator<Item = String>) -> Result<Self> {
        std::fs::create_dir_all(data_dir)?;
        let log_path = data_dir.join(APPLIED_LOG);

        let existing: Vec<OperationRecord> = jsonl::read_all(&log_path)?;
        let applied: HashSet<OpId> = existing.into_iter().map(|r| r.id).collect();
        info!("loaded {} applied operations", applied.len());

        Ok(RelayState {
            inner: Arc::new(RelayStateInner {
                log_path,
                applied: Mutex::new(applied),
                reject_kinds: reject_kinds.into_iter().collect(),
            }),
        })
    }

    /// Applies a record unless its kind is rejected or its id was seen.
    pub async fn apply(&self, record: &OperationRecord) -> Result<Outcome> {
        let kind = record.operation.as_str();
        if self.inner.reject_kinds.contains(kind) {
            return Ok(Outcome::Rejected(format!("operation kind '{}' is not accepted", kind)));
        }

        let mut applied = self.inner.applied.lock().await;
        if applied.contains(&record.id) {
            return Ok(Outcome::Duplicate);
        }
        jsonl::append(&self.inner.log_path, record)?;
        applied.insert(record.id.clone());
        Ok(Outcome::Applied)
    }

    /// Number of distinct records applied so far.
    pub async fn applied_count(&self) -> usize {
        self.inner.applied.lock().await.len()
    }

    pub fn log_path(&self) -> &Path {
        &self.inner.log_path
    }
}

#[cfg(test)]
#[path = "state_tests.rs"]
mod tests;
