// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Project configuration management.
//!
//! Configuration is stored in `.fieldq/config.toml`:
//! - `[remote]`: relay URL and request/probe timeouts
//! - `[sync]`: queue cap, retry backoff, connectivity probe interval
//!
//! Every field has a default, so an empty file is a valid configuration.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use fq_core::{Backoff, SyncConfig};

use crate::error::{Error, Result};

const WORK_DIR_NAME: &str = ".fieldq";
const CONFIG_FILE_NAME: &str = "config.toml";
const STORE_FILE_NAME: &str = "store.db";

/// Project configuration stored in `.fieldq/config.toml`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub remote: RemoteConfig,
    #[serde(default)]
    pub sync: SyncSettings,
}

/// Connection settings for the relay.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RemoteConfig {
    /// WebSocket URL of the relay (`ws://` or `wss://`).
    #[serde(default = "default_url")]
    pub url: String,
    /// Max time to wait for the relay to answer one submit (milliseconds).
    #[serde(default = "default_request_timeout_ms")]
    pub request_timeout_ms: u64,
    /// Max time for the reachability probe to connect (milliseconds).
    #[serde(default = "default_probe_timeout_ms")]
    pub probe_timeout_ms: u64,
}

/// Queue and retry settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SyncSettings {
    /// Maximum pending operations; 0 disables the cap.
    #[serde(default = "default_max_pending")]
    pub max_pending: usize,
    /// First retry delay after a failed automatic pass (milliseconds).
    #[serde(default = "default_initial_backoff_ms")]
    pub initial_backoff_ms: u64,
    /// Cap on the retry delay (seconds).
    #[serde(default = "default_max_backoff_secs")]
    pub max_backoff_secs: u64,
    /// Random extra delay as a fraction of the retry delay.
    #[serde(default = "default_jitter_ratio")]
    pub jitter_ratio: f64,
    /// How often `watch` probes connectivity (milliseconds).
    #[serde(default = "default_probe_interval_ms")]
    pub probe_interval_ms: u64,
}

fn default_url() -> String {
    "ws://127.0.0.1:7890".to_string()
}

fn default_request_timeout_ms() -> u64 {
    10_000
}

fn default_probe_timeout_ms() -> u64 {
    1_500
}

fn default_max_pending() -> usize {
    fq_core::store::DEFAULT_MAX_PENDING
}

fn default_initial_backoff_ms() -> u64 {
    500
}

fn default_max_backoff_secs() -> u64 {
    60
}

fn default_jitter_ratio() -> f64 {
    0.2
}

fn default_probe_interval_ms() -> u64 {
    5_000
}

impl Default for RemoteConfig {
    fn default() -> Self {
        RemoteConfig {
            url: default_url(),
            request_timeout_ms: default_request_timeout_ms(),
            probe_timeout_ms: default_probe_timeout_ms(),
        }
    }
}

impl Default for SyncSettings {
    fn default() -> Self {
        SyncSettings {
            max_pending: default_max_pending(),
            initial_backoff_ms: default_initial_backoff_ms(),
            max_backoff_secs: default_max_backoff_secs(),
            jitter_ratio: default_jitter_ratio(),
            probe_interval_ms: default_probe_interval_ms(),
        }
    }
}

impl RemoteConfig {
    /// Returns an error unless the URL is a WebSocket URL.
    pub fn validate_url(url: &str) -> Result<()> {
        if url.starts_with("ws://") || url.starts_with("wss://") {
            Ok(())
        } else {
            Err(Error::InvalidRemoteUrl(url.to_string()))
        }
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }

    pub fn probe_timeout(&self) -> Duration {
        Duration::from_millis(self.probe_timeout_ms)
    }
}

impl SyncSettings {
    /// Queue cap for the store; `None` when disabled.
    pub fn max_pending(&self) -> Option<usize> {
        (self.max_pending > 0).then_some(self.max_pending)
    }

    pub fn probe_interval(&self) -> Duration {
        Duration::from_millis(self.probe_interval_ms.max(1))
    }

    pub fn backoff(&self) -> Backoff {
        Backoff {
            initial: Duration::from_millis(self.initial_backoff_ms),
            max: Duration::from_secs(self.max_backoff_secs),
            jitter_ratio: self.jitter_ratio,
        }
    }
}

impl Config {
    /// Loads configuration from the given `.fieldq/` directory.
    pub fn load(work_dir: &Path) -> Result<Self> {
        let config_path = work_dir.join(CONFIG_FILE_NAME);
        let content = fs::read_to_string(&config_path)
            .map_err(|e| Error::Config(format!("failed to read config: {}", e)))?;
        let config: Config = toml::from_str(&content)
            .map_err(|e| Error::Config(format!("failed to parse config: {}", e)))?;
        RemoteConfig::validate_url(&config.remote.url)?;
        Ok(config)
    }

    /// Saves configuration to the given `.fieldq/` directory.
    pub fn save(&self, work_dir: &Path) -> Result<()> {
        let config_path = work_dir.join(CONFIG_FILE_NAME);
        let content = toml::to_string_pretty(self)
            .map_err(|e| Error::Config(format!("failed to serialize config: {}", e)))?;
        fs::write(&config_path, content)?;
        Ok(())
    }

    /// Engine settings derived from this configuration.
    pub fn sync_config(&self) -> SyncConfig {
        SyncConfig {
            request_timeout: self.remote.request_timeout(),
            backoff: self.sync.backoff(),
        }
    }
}

/// Find the .fieldq directory by walking up from `start`.
pub fn find_work_dir_from(start: &Path) -> Result<PathBuf> {
    let mut current = start.to_path_buf();
    loop {
        let work_dir = current.join(WORK_DIR_NAME);
        if work_dir.is_dir() {
            return Ok(work_dir);
        }
        if !current.pop() {
            return Err(Error::NotInitialized);
        }
    }
}

/// Find the .fieldq directory by walking up from the current directory.
pub fn find_work_dir() -> Result<PathBuf> {
    find_work_dir_from(&std::env::current_dir()?)
}

/// Path of the local store inside a `.fieldq/` directory.
pub fn get_store_path(work_dir: &Path) -> PathBuf {
    work_dir.join(STORE_FILE_NAME)
}

/// Initialize a new .fieldq directory at the given path.
pub fn init_work_dir(path: &Path, remote_url: Option<&str>) -> Result<PathBuf> {
    let work_dir = path.join(WORK_DIR_NAME);

    if work_dir.exists() {
        return Err(Error::AlreadyInitialized(work_dir.display().to_string()));
    }

    let mut config = Config::default();
    if let Some(url) = remote_url {
        RemoteConfig::validate_url(url)?;
        config.remote.url = url.to_string();
    }

    fs::create_dir_all(&work_dir)?;
    config.save(&work_dir)?;

    Ok(work_dir)
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
