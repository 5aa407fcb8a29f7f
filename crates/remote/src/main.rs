// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! fq-remote: WebSocket relay that applies queued fieldq operations.
//!
//! Every accepted record is appended to `applied.jsonl` in the data
//! directory. Redelivered records are acknowledged without being written
//! twice.

mod server;
mod state;

use clap::Parser;
use std::net::SocketAddr;
use std::path::PathBuf;
use tokio::net::TcpListener;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

/// fq-remote: relay server for fieldq sync
#[derive(Parser, Debug)]
#[command(name = "fq-remote")]
#[command(about = "WebSocket relay that applies queued fieldq operations")]
struct Args {
    /// Address to bind the server to
    #[arg(short, long, default_value = "0.0.0.0:7890")]
    bind: SocketAddr,

    /// Directory for the applied-operations log
    #[arg(short, long, default_value = ".")]
    data: PathBuf,

    /// Answer submits of this operation kind with `rejected` (repeatable)
    #[arg(long = "reject-kind", value_name = "KIND")]
    reject_kind: Vec<String>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let args = Args::parse();

    let level = if args.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };

    let subscriber = FmtSubscriber::builder().with_max_level(level).finish();
    tracing::subscriber::set_global_default(subscriber)?;

    info!("Starting fq-remote server");
    info!("  Bind address: {}", args.bind);
    info!("  Data directory: {}", args.data.display());
    if !args.reject_kind.is_empty() {
        info!("  Rejecting kinds: {}", args.reject_kind.join(", "));
    }

    let state = state::RelayState::new(&args.data, args.reject_kind)?;
    info!("  Applied log: {}", state.log_path().display());
    let listener = TcpListener::bind(args.bind).await?;

    server::run(listener, state).await
}
