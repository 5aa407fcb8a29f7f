// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

pub mod enqueue;
pub mod init;
pub mod pending;
pub mod purge;
pub mod record;
pub mod show;
pub mod status;
pub mod sync;
pub mod watch;

#[cfg(test)]
#[path = "mod_tests.rs"]
pub mod testing;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use fq_core::{
    Connectivity, ConnectivityObserver, EventHub, LocalStore, SqliteBackend, SyncEngine,
};
use serde_json::Value;

use crate::config::{find_work_dir_from, get_store_path, Config};
use crate::error::{Error, Result};
use crate::sync::{Probe, WebSocketTransport};

/// An opened `.fieldq/` project.
pub struct Project {
    pub work_dir: PathBuf,
    pub config: Config,
}

impl Project {
    /// Finds and loads the project containing `start`.
    pub fn open(start: &Path) -> Result<Self> {
        let work_dir = find_work_dir_from(start)?;
        let config = Config::load(&work_dir)?;
        Ok(Project { work_dir, config })
    }

    /// Opens the SQLite-backed local store.
    pub fn open_store(&self) -> Result<LocalStore> {
        let path = get_store_path(&self.work_dir);
        let backend = SqliteBackend::open(&path)?;
        let store = LocalStore::new(backend).with_max_pending(self.config.sync.max_pending());
        if !store.is_supported() {
            return Err(Error::StorageUnavailable(path.display().to_string()));
        }
        Ok(store)
    }

    /// Builds a sync engine over the project's store and relay.
    pub fn engine(&self, initial: Connectivity) -> Result<SyncEngine> {
        let store = self.open_store()?;
        let transport = Arc::new(WebSocketTransport::new(self.config.remote.url.clone()));
        Ok(SyncEngine::new(
            store,
            transport,
            ConnectivityObserver::new(initial),
            EventHub::new(),
            self.config.sync_config(),
        ))
    }

    pub fn probe(&self) -> Probe {
        Probe::from_config(&self.config.remote)
    }
}

/// Single-threaded runtime for commands that talk to the relay.
pub fn runtime() -> Result<tokio::runtime::Runtime> {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|e| Error::Io(std::io::Error::other(format!("tokio: {}", e))))
}

/// Parses a command-line argument that must be a JSON object.
pub fn parse_json_object(what: &'static str, raw: &str) -> Result<Value> {
    let value: Value = serde_json::from_str(raw).map_err(|e| Error::InvalidJson {
        what,
        reason: e.to_string(),
    })?;
    if !value.is_object() {
        return Err(Error::NotAnObject { what });
    }
    Ok(value)
}
