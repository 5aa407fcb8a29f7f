// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use fq_core::{Connectivity, SyncStatus};

use super::{runtime, Project};
use crate::cli::OutputFormat;
use crate::error::Result;

/// Probes the relay, then prints the engine's status snapshot.
pub fn run(project: &Project, output: OutputFormat) -> Result<()> {
    let engine = project.engine(Connectivity::Offline)?;
    runtime()?.block_on(project.probe().refresh(engine.observer()));
    let status = engine.get_status();

    match output {
        OutputFormat::Text => print!("{}", format_status(&status, &project.config.remote.url)),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&status)?),
    }
    Ok(())
}

pub(crate) fn format_status(status: &SyncStatus, remote_url: &str) -> String {
    let connectivity = Connectivity::from_online(status.is_online);
    let last_sync = status
        .last_sync_time
        .map(|t| t.format("%Y-%m-%d %H:%M:%S UTC").to_string())
        .unwrap_or_else(|| "never".to_string());
    format!(
        "Remote: {remote_url} ({connectivity})\n\
         Pending: {}\n\
         Last sync: {last_sync}\n\
         Storage: {} bytes\n",
        status.pending_operations, status.storage_usage
    )
}

#[cfg(test)]
#[path = "status_tests.rs"]
mod tests;
