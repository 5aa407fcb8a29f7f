// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Remote side of the sync engine.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐     ┌──────────────────┐     ┌─────────────┐
//! │ SyncEngine  │────►│ WebSocketTransport│────►│  fq-remote  │
//! │  (fq-core)  │◄────│ (RemoteTransport) │◄────│   relay     │
//! └─────────────┘     └──────────────────┘     └─────────────┘
//!        ▲
//!        │ set_online
//! ┌─────────────┐
//! │    Probe    │  (TCP reachability of the relay)
//! └─────────────┘
//! ```
//!
//! # Features
//!
//! - Lazy WebSocket connection, reused across submits
//! - Answers matched to records by id; stale answers are skipped
//! - Connectivity derived from a bounded TCP connect to the relay

mod probe;
mod transport;

pub use probe::{authority, Probe};
pub use transport::WebSocketTransport;

#[cfg(test)]
mod probe_tests;

#[cfg(test)]
mod transport_tests;
