// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use super::Project;
use crate::error::Result;

/// Drops completed operations left behind by an interrupted sync.
pub fn run(project: &Project) -> Result<()> {
    let removed = project.open_store()?.try_clear_completed_syncs()?;
    println!("Purged {} completed operations", removed);
    Ok(())
}

#[cfg(test)]
#[path = "purge_tests.rs"]
mod tests;
