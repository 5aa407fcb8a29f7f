// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Operation records for the offline sync queue.
//!
//! Every local mutation that still has to reach the remote is represented as
//! an [`OperationRecord`]. A record carries a denormalized copy of the entity
//! in its payload, so replay never has to look at the local collections.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// Unique identifier for an operation record.
///
/// Format: `op-{sequence}-{hash}`. The sequence comes from a persisted
/// counter that is never reset, so ids are not reused after a purge.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OpId(String);

impl OpId {
    /// Wraps an existing identifier.
    pub fn new(id: impl Into<String>) -> Self {
        OpId(id.into())
    }

    /// Returns the identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for OpId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for OpId {
    fn from(s: &str) -> Self {
        OpId(s.to_string())
    }
}

/// Generate an operation ID from kind, creation time, and sequence number.
/// Format: op-{sequence}-{hash} where hash is first 8 hex chars of
/// SHA256(kind + timestamp + sequence)
pub fn generate_op_id(kind: &OpKind, timestamp: &DateTime<Utc>, sequence: u64) -> OpId {
    let input = format!("{}{}{}", kind, timestamp.to_rfc3339(), sequence);
    let hash = Sha256::digest(input.as_bytes());
    let short_hash = hex::encode(&hash[..4]);
    OpId(format!("op-{}-{}", sequence, short_hash))
}

/// The kind of mutation an operation replays.
///
/// Unknown kinds are kept verbatim in [`OpKind::Custom`] so newer clients can
/// enqueue operations an older build does not know about.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum OpKind {
    CreatePatient,
    UpdatePatient,
    CreateVisit,
    CreateWorker,
    UpdateWorker,
    CreateAlert,
    ResolveAlert,
    Custom(String),
}

impl OpKind {
    /// Returns the wire name of this kind.
    pub fn as_str(&self) -> &str {
        match self {
            OpKind::CreatePatient => "create-patient",
            OpKind::UpdatePatient => "update-patient",
            OpKind::CreateVisit => "create-visit",
            OpKind::CreateWorker => "create-worker",
            OpKind::UpdateWorker => "update-worker",
            OpKind::CreateAlert => "create-alert",
            OpKind::ResolveAlert => "resolve-alert",
            OpKind::Custom(name) => name,
        }
    }
}

impl fmt::Display for OpKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<String> for OpKind {
    fn from(s: String) -> Self {
        match s.as_str() {
            "create-patient" => OpKind::CreatePatient,
            "update-patient" => OpKind::UpdatePatient,
            "create-visit" => OpKind::CreateVisit,
            "create-worker" => OpKind::CreateWorker,
            "update-worker" => OpKind::UpdateWorker,
            "create-alert" => OpKind::CreateAlert,
            "resolve-alert" => OpKind::ResolveAlert,
            _ => OpKind::Custom(s),
        }
    }
}

impl From<OpKind> for String {
    fn from(kind: OpKind) -> Self {
        match kind {
            OpKind::Custom(name) => name,
            other => other.as_str().to_string(),
        }
    }
}

impl FromStr for OpKind {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(OpKind::from(s.to_string()))
    }
}

/// Replay status of a record.
///
/// There is no failed state: a record whose remote call fails stays pending.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OpStatus {
    Pending,
    Completed,
}

impl fmt::Display for OpStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OpStatus::Pending => f.write_str("pending"),
            OpStatus::Completed => f.write_str("completed"),
        }
    }
}

/// A persisted intent to mutate remote state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OperationRecord {
    pub id: OpId,
    pub operation: OpKind,
    pub payload: serde_json::Value,
    pub timestamp: DateTime<Utc>,
    pub status: OpStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<DateTime<Utc>>,
}

impl OperationRecord {
    /// Creates a new pending record.
    pub fn new(
        id: OpId,
        operation: OpKind,
        payload: serde_json::Value,
        timestamp: DateTime<Utc>,
    ) -> Self {
        OperationRecord {
            id,
            operation,
            payload,
            timestamp,
            status: OpStatus::Pending,
            completed_at: None,
        }
    }

    /// Returns true if the record has not been acknowledged yet.
    pub fn is_pending(&self) -> bool {
        self.status == OpStatus::Pending
    }

    /// Marks the record completed.
    ///
    /// Returns false if it was already completed; `completed_at` keeps its
    /// first value.
    pub fn mark_completed(&mut self, at: DateTime<Utc>) -> bool {
        if self.status == OpStatus::Completed {
            return false;
        }
        self.status = OpStatus::Completed;
        self.completed_at = Some(at);
        true
    }
}

#[cfg(test)]
#[path = "record_tests.rs"]
mod tests;
