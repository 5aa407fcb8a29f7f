// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use thiserror::Error;

/// All possible errors that can occur in the fqrs library.
///
/// Errors provide user-friendly messages with hints for common issues.
#[derive(Debug, Error)]
pub enum Error {
    #[error("not initialized: run 'fieldq init' first")]
    NotInitialized,

    #[error("already initialized at {0}")]
    AlreadyInitialized(String),

    #[error("invalid {what} JSON: {reason}\n  hint: quote the argument, e.g. '{{\"name\": \"Amina\"}}'")]
    InvalidJson { what: &'static str, reason: String },

    #[error("{what} must be a JSON object")]
    NotAnObject { what: &'static str },

    #[error("invalid remote URL '{0}': must start with ws:// or wss://")]
    InvalidRemoteUrl(String),

    #[error("local storage is not available at {0}")]
    StorageUnavailable(String),

    #[error("sync failed: {0}\n  hint: pending operations are kept and will be retried")]
    SyncFailed(String),

    #[error("{0}")]
    Core(#[from] fq_core::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("config error: {0}")]
    Config(String),
}

/// A specialized Result type for fqrs operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
