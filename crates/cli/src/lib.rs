// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! fqrs - the library behind the `fieldq` CLI.
//!
//! A project lives in a `.fieldq/` directory holding `config.toml` and a
//! SQLite store. Commands record entities, queue mutations, and replay the
//! queue against a WebSocket relay when it is reachable.
//!
//! # Main Components
//!
//! - [`Config`] - Relay URL, timeouts and sync tuning
//! - [`sync::WebSocketTransport`] - Delivers queued operations to the relay
//! - [`sync::Probe`] - Reachability checks feeding the connectivity observer
//! - [`Error`] - Error types for all commands
//!
//! The queue, store and engine themselves live in `fq_core`.

mod cli;
mod commands;

pub mod config;
pub mod error;
pub mod sync;

pub use cli::{Cli, Command, OutputFormat};
pub use config::{find_work_dir, get_store_path, init_work_dir, Config};
pub use error::{Error, Result};

use std::path::PathBuf;

use commands::Project;

/// Execute a parsed command line. `-C` sets the directory commands start
/// searching for `.fieldq/` from.
pub fn run(cli: Cli) -> Result<()> {
    let start = match cli.directory {
        Some(dir) => PathBuf::from(dir),
        None => std::env::current_dir()?,
    };

    let project = || Project::open(&start);

    match cli.command {
        Command::Init { remote } => commands::init::run(&start, remote),
        Command::Record { collection, json } => {
            commands::record::run(&project()?, &collection, &json)
        }
        Command::Enqueue { kind, payload } => {
            commands::enqueue::run(&project()?, &kind, payload.as_deref())
        }
        Command::Demo => commands::enqueue::demo(&project()?),
        Command::Pending { output } => commands::pending::run(&project()?, output),
        Command::Show { collection, output } => {
            commands::show::run(&project()?, &collection, output)
        }
        Command::Status { output } => commands::status::run(&project()?, output),
        Command::Sync => commands::sync::run(&project()?),
        Command::Watch => commands::watch::run(&project()?),
        Command::Purge => commands::purge::run(&project()?),
    }
}

#[cfg(test)]
#[path = "lib_tests.rs"]
mod tests;
