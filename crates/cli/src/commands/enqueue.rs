// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use chrono::{DateTime, Utc};
use fq_core::{Connectivity, OpKind};
use serde_json::{json, Value};

use super::Project;
use crate::error::{Error, Result};

/// Queues a raw operation with an optional JSON payload.
pub fn run(project: &Project, kind: &str, payload: Option<&str>) -> Result<()> {
    let kind = kind.trim();
    if kind.is_empty() {
        return Err(fq_core::Error::InvalidInput("operation kind cannot be empty".into()).into());
    }
    let payload = match payload {
        Some(raw) => serde_json::from_str(raw).map_err(|e| Error::InvalidJson {
            what: "payload",
            reason: e.to_string(),
        })?,
        None => json!({}),
    };
    queue(project, OpKind::from(kind.to_string()), payload)
}

/// Queues a sample patient registration.
pub fn demo(project: &Project) -> Result<()> {
    queue(project, OpKind::CreatePatient, demo_payload(Utc::now()))
}

fn queue(project: &Project, kind: OpKind, payload: Value) -> Result<()> {
    let engine = project.engine(Connectivity::Offline)?;
    let record = engine.try_enqueue(kind, payload)?;
    println!("Queued {} {}", record.operation, record.id);
    Ok(())
}

pub(crate) fn demo_payload(now: DateTime<Utc>) -> Value {
    json!({
        "name": "Demo Patient",
        "age": 30,
        "village": "Demo Village",
        "registeredAt": now.to_rfc3339(),
    })
}

#[cfg(test)]
#[path = "enqueue_tests.rs"]
mod tests;
