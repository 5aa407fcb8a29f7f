// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Error types for fq-core operations.

use thiserror::Error;

/// All possible errors that can occur in fq-core operations.
#[derive(Debug, Error)]
pub enum Error {
    #[error("storage error: {0}")]
    Storage(#[from] rusqlite::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("corrupted data under '{key}': {reason}")]
    CorruptedData { key: String, reason: String },

    #[error("sync queue is full ({max} pending operations)\n  hint: sync with the remote or raise sync.max_pending")]
    QueueFull { max: usize },

    #[error("unknown collection: '{0}'\n  hint: valid collections are: patients, visits, workers, alerts")]
    UnknownCollection(String),

    #[error("{0}")]
    InvalidInput(String),
}

/// A specialized Result type for fq-core operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
