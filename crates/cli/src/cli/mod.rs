// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use clap::{Parser, Subcommand, ValueEnum};

/// Output format for commands supporting structured output.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

// Custom help template that groups commands into sections
const HELP_TEMPLATE: &str = "{about-with-newline}
{usage-heading} {usage}

{before-help}Options:
{options}{after-help}";

const COMMANDS_HELP: &str = "\
Recording:
  record      Store an entity and queue its create operation
  enqueue     Queue a raw operation
  demo        Queue a sample create-patient operation

Inspecting:
  pending     List pending operations
  show        List entities in a collection
  status      Show sync status

Syncing:
  sync        Replay pending operations against the remote
  watch       Sync automatically whenever the remote is reachable
  purge       Drop acknowledged operations

Setup:
  init        Initialize a fieldq project
";

const QUICKSTART_HELP: &str = "\
Get started:
  fieldq init --remote ws://127.0.0.1:7890
  fieldq record patients '{\"name\": \"Amina\"}'
  fieldq pending
  fieldq sync";

#[derive(Parser)]
#[command(name = "fieldq")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Offline-first data capture with queued sync to a remote relay")]
#[command(
    long_about = "Offline-first data capture with queued sync to a remote relay.\n\n\
    Records are stored locally and every mutation is queued. Queued operations are \
    replayed in order whenever the relay is reachable."
)]
#[command(help_template = HELP_TEMPLATE)]
#[command(before_help = COMMANDS_HELP)]
#[command(after_help = QUICKSTART_HELP)]
pub struct Cli {
    /// Run as if fieldq was started in <path>
    #[arg(short = 'C', long = "directory", global = true, value_name = "path")]
    pub directory: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    // ─────────────────────────────────────────────────────────────────────────
    // Setup
    // ─────────────────────────────────────────────────────────────────────────
    /// Initialize a fieldq project in the current directory
    #[command(after_help = "Examples:\n  \
        fieldq init                                Use the default relay URL\n  \
        fieldq init --remote ws://10.0.0.5:7890     Point at a specific relay")]
    Init {
        /// WebSocket URL of the relay
        #[arg(long, value_name = "url")]
        remote: Option<String>,
    },

    // ─────────────────────────────────────────────────────────────────────────
    // Recording
    // ─────────────────────────────────────────────────────────────────────────
    /// Store an entity and queue its create operation
    #[command(after_help = "Examples:\n  \
        fieldq record patients '{\"name\": \"Amina\", \"age\": 34}'\n  \
        fieldq record visit '{\"patient\": \"Amina\", \"notes\": \"fever\"}'")]
    Record {
        /// Collection (patients, visits, workers, alerts)
        collection: String,

        /// Entity as a JSON object
        json: String,
    },

    /// Queue a raw operation
    Enqueue {
        /// Operation kind (e.g. update-patient, resolve-alert)
        kind: String,

        /// Payload as JSON (defaults to {})
        #[arg(long, short)]
        payload: Option<String>,
    },

    /// Queue a sample create-patient operation
    Demo,

    // ─────────────────────────────────────────────────────────────────────────
    // Inspecting
    // ─────────────────────────────────────────────────────────────────────────
    /// List pending operations, oldest first
    Pending {
        #[arg(long = "output", short = 'o', value_enum, default_value = "text")]
        output: OutputFormat,
    },

    /// List entities stored in a collection
    Show {
        /// Collection (patients, visits, workers, alerts)
        collection: String,

        #[arg(long = "output", short = 'o', value_enum, default_value = "text")]
        output: OutputFormat,
    },

    /// Show connectivity, queue size and last sync time
    Status {
        #[arg(long = "output", short = 'o', value_enum, default_value = "text")]
        output: OutputFormat,
    },

    // ─────────────────────────────────────────────────────────────────────────
    // Syncing
    // ─────────────────────────────────────────────────────────────────────────
    /// Replay pending operations against the remote
    Sync,

    /// Probe the remote periodically and sync on reconnect (Ctrl-C to stop)
    Watch,

    /// Drop operations the remote has acknowledged
    Purge,
}

#[cfg(test)]
#[path = "../cli_tests/mod.rs"]
mod tests;
