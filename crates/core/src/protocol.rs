// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! WebSocket protocol messages between a syncing client and the relay.
//!
//! Every frame is a JSON text message tagged by `type`:
//! - Client submits operation records one at a time, and may ping
//! - Server answers each submit with `ack` or `rejected`, keyed by record id

use serde::{Deserialize, Serialize};

use crate::record::{OpId, OperationRecord};

/// Messages sent from client to server.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientMessage {
    /// Deliver one operation record.
    ///
    /// The server answers with `Ack` or `Rejected` carrying the same id.
    Submit {
        /// The record to apply.
        record: OperationRecord,
    },

    /// Ping message for keepalive.
    Ping {
        /// Client-chosen ID echoed in Pong.
        id: u64,
    },
}

/// Messages sent from server to client.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerMessage {
    /// The record was applied.
    Ack {
        id: OpId,
        /// True if the record had already been applied earlier.
        #[serde(default)]
        duplicate: bool,
    },

    /// The record was refused and was not applied.
    Rejected { id: OpId, message: String },

    /// Pong response to client Ping.
    Pong {
        /// Echoed from the Ping message.
        id: u64,
    },

    /// Error message.
    Error {
        /// Human-readable error description.
        message: String,
    },
}

impl ClientMessage {
    /// Creates a Submit message.
    pub fn submit(record: OperationRecord) -> Self {
        ClientMessage::Submit { record }
    }

    /// Creates a Ping message.
    pub fn ping(id: u64) -> Self {
        ClientMessage::Ping { id }
    }

    /// Serializes the message to JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Deserializes the message from JSON.
    pub fn from_json(s: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(s)
    }
}

impl ServerMessage {
    /// Creates an Ack message.
    pub fn ack(id: OpId, duplicate: bool) -> Self {
        ServerMessage::Ack { id, duplicate }
    }

    /// Creates a Rejected message.
    pub fn rejected(id: OpId, message: impl Into<String>) -> Self {
        ServerMessage::Rejected {
            id,
            message: message.into(),
        }
    }

    /// Creates a Pong message.
    pub fn pong(id: u64) -> Self {
        ServerMessage::Pong { id }
    }

    /// Creates an Error message.
    pub fn error(message: impl Into<String>) -> Self {
        ServerMessage::Error {
            message: message.into(),
        }
    }

    /// The record id this message answers, if any.
    pub fn answers(&self) -> Option<&OpId> {
        match self {
            ServerMessage::Ack { id, .. } | ServerMessage::Rejected { id, .. } => Some(id),
            ServerMessage::Pong { .. } | ServerMessage::Error { .. } => None,
        }
    }

    /// Serializes the message to JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Deserializes the message from JSON.
    pub fn from_json(s: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(s)
    }
}

#[cfg(test)]
#[path = "protocol_tests.rs"]
mod tests;
