// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use std::sync::{Arc, Mutex};

use fq_core::{Connectivity, SyncEvent};

use super::{runtime, Project};
use crate::error::{Error, Result};

/// Probes the relay and, if reachable, delivers the pending queue once.
///
/// Offline is not a failure: the queue is left intact and the count of
/// waiting operations is printed.
pub fn run(project: &Project) -> Result<()> {
    let engine = project.engine(Connectivity::Offline)?;
    let failure: Arc<Mutex<Option<String>>> = Arc::new(Mutex::new(None));

    let captured = Arc::clone(&failure);
    engine.events().add_listener(move |event| {
        if let SyncEvent::SyncError { error } = event {
            *captured.lock().unwrap_or_else(|e| e.into_inner()) = Some(error.clone());
        }
        if let Some(line) = describe(event) {
            println!("{}", line);
        }
    });

    let rt = runtime()?;
    let synced = rt.block_on(async {
        project.probe().refresh(engine.observer()).await;
        engine.manual_sync().await
    });
    if synced {
        return Ok(());
    }

    if !engine.observer().is_online() {
        println!(
            "Offline: {} operations pending",
            engine.get_status().pending_operations
        );
        return Ok(());
    }

    let reason = failure
        .lock()
        .unwrap_or_else(|e| e.into_inner())
        .take()
        .unwrap_or_else(|| "sync already in progress".to_string());
    Err(Error::SyncFailed(reason))
}

/// Human-readable line for the events worth showing on a terminal.
pub(crate) fn describe(event: &SyncEvent) -> Option<String> {
    match event {
        SyncEvent::Progress {
            completed,
            total,
            operation,
            id,
        } => Some(format!("Synced {}/{}: {} {}", completed, total, operation, id)),
        SyncEvent::SyncComplete {
            operations: Some(n),
            ..
        } => Some(format!("Sync complete: {} operations delivered", n)),
        SyncEvent::SyncComplete {
            message: Some(message),
            ..
        } => Some(message.clone()),
        SyncEvent::SyncError { error } => Some(format!("Sync failed: {}", error)),
        SyncEvent::Online => Some("Remote reachable".to_string()),
        SyncEvent::Offline => Some("Remote unreachable".to_string()),
        _ => None,
    }
}

#[cfg(test)]
#[path = "sync_tests.rs"]
mod tests;
