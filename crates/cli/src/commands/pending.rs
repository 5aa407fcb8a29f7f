// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use fq_core::OperationRecord;

use super::Project;
use crate::cli::OutputFormat;
use crate::error::Result;

pub fn run(project: &Project, output: OutputFormat) -> Result<()> {
    let pending = project.open_store()?.get_pending_syncs();

    match output {
        OutputFormat::Text => {
            if pending.is_empty() {
                println!("No pending operations");
            }
            for record in &pending {
                println!("{}", format_record(record));
            }
        }
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&pending)?);
        }
    }
    Ok(())
}

/// One line per record: id, kind, queue time, payload.
pub(crate) fn format_record(record: &OperationRecord) -> String {
    format!(
        "{}  {:<15}  {}  {}",
        record.id,
        record.operation.as_str(),
        record.timestamp.format("%Y-%m-%d %H:%M:%S"),
        record.payload
    )
}

#[cfg(test)]
#[path = "pending_tests.rs"]
mod tests;
