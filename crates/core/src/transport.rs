// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Remote delivery seam for the sync engine.
//!
//! The engine only needs one capability from the remote side: deliver a
//! record and learn whether it was accepted. Concrete transports (the CLI's
//! WebSocket client, test doubles) implement [`RemoteTransport`].

use std::future::Future;
use std::pin::Pin;

use crate::record::{OpId, OperationRecord};

/// Error type for transport operations.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum TransportError {
    /// Connection failed.
    #[error("connection failed: {0}")]
    ConnectionFailed(String),

    /// Connection closed unexpectedly.
    #[error("connection closed")]
    ConnectionClosed,

    /// Send failed.
    #[error("send failed: {0}")]
    SendFailed(String),

    /// Receive failed.
    #[error("receive failed: {0}")]
    ReceiveFailed(String),

    /// The remote refused the operation.
    #[error("remote rejected {id}: {message}")]
    Rejected { id: OpId, message: String },

    /// No answer within the request timeout.
    #[error("request timed out after {0}ms")]
    Timeout(u64),

    /// Serialization/deserialization failed.
    #[error("serialization error: {0}")]
    Serialization(String),
}

/// Result type for transport operations.
pub type TransportResult<T> = Result<T, TransportError>;

/// Boxed future returned by transport methods.
pub type TransportFuture<'a, T> = Pin<Box<dyn Future<Output = TransportResult<T>> + Send + 'a>>;

/// Delivers operation records to the remote endpoint.
pub trait RemoteTransport: Send + Sync {
    /// Sends one record and resolves once the remote has accepted it.
    ///
    /// Delivery may be repeated for the same record; the remote is expected
    /// to deduplicate by id.
    fn send<'a>(&'a self, record: &'a OperationRecord) -> TransportFuture<'a, ()>;
}

#[cfg(test)]
#[path = "transport_tests.rs"]
mod tests;
