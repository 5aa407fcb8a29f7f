// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use fq_core::Connectivity;
use tracing::info;

use super::sync::describe;
use super::{runtime, Project};
use crate::error::Result;

/// Keeps the engine running with auto-sync until Ctrl-C.
///
/// Connectivity comes from periodic probes of the relay; each transition
/// to online triggers a pass, failures are retried with backoff.
pub fn run(project: &Project) -> Result<()> {
    let engine = project.engine(Connectivity::Offline)?;
    engine.events().add_listener(|event| {
        if let Some(line) = describe(event) {
            println!("{}", line);
        }
    });

    let probe = project.probe();
    let interval = project.config.sync.probe_interval();
    let rt = runtime()?;

    rt.block_on(async {
        engine.setup_auto_sync();
        println!("Watching {} (Ctrl-C to stop)", project.config.remote.url);

        let shutdown = tokio::signal::ctrl_c();
        tokio::pin!(shutdown);
        let mut ticker = tokio::time::interval(interval);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = &mut shutdown => {
                    info!("interrupted, stopping watch");
                    break;
                }
                _ = ticker.tick() => {
                    probe.refresh(engine.observer()).await;
                }
            }
        }

        engine.dispose().await;
    });

    println!(
        "Stopped: {} operations pending",
        engine.get_status().pending_operations
    );
    Ok(())
}
