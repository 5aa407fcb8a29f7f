// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use std::path::Path;

use crate::config::{init_work_dir, Config};
use crate::error::Result;

pub fn run(target: &Path, remote: Option<String>) -> Result<()> {
    let work_dir = init_work_dir(target, remote.as_deref())?;
    let config = Config::load(&work_dir)?;

    println!("Initialized fieldq project at {}", work_dir.display());
    println!("Remote: {}", config.remote.url);
    Ok(())
}

#[cfg(test)]
#[path = "init_tests.rs"]
mod tests;
