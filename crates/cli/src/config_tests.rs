// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used)]

use super::*;
use tempfile::TempDir;
use yare::parameterized;

#[test]
fn init_and_load_config() {
    let temp = TempDir::new().unwrap();
    let work_dir = init_work_dir(temp.path(), Some("ws://relay.local:9000")).unwrap();

    assert_eq!(work_dir, temp.path().join(".fieldq"));
    let config = Config::load(&work_dir).unwrap();
    assert_eq!(config.remote.url, "ws://relay.local:9000");
    assert_eq!(config.sync, SyncSettings::default());
}

#[test]
fn init_without_remote_uses_default_url() {
    let temp = TempDir::new().unwrap();
    let work_dir = init_work_dir(temp.path(), None).unwrap();
    assert_eq!(Config::load(&work_dir).unwrap(), Config::default());
}

#[test]
fn already_initialized() {
    let temp = TempDir::new().unwrap();
    init_work_dir(temp.path(), None).unwrap();

    let err = init_work_dir(temp.path(), None).unwrap_err();
    assert!(err.to_string().contains("already initialized"));
}

#[test]
fn init_rejects_non_websocket_remote() {
    let temp = TempDir::new().unwrap();
    let err = init_work_dir(temp.path(), Some("http://relay.local")).unwrap_err();
    assert!(matches!(err, Error::InvalidRemoteUrl(_)));
    assert!(!temp.path().join(".fieldq").exists());
}

#[test]
fn partial_config_fills_defaults() {
    let temp = TempDir::new().unwrap();
    let work_dir = temp.path().join(".fieldq");
    fs::create_dir_all(&work_dir).unwrap();
    fs::write(
        work_dir.join("config.toml"),
        "[sync]\nmax_pending = 50\njitter_ratio = 0.0\n",
    )
    .unwrap();

    let config = Config::load(&work_dir).unwrap();
    assert_eq!(config.remote, RemoteConfig::default());
    assert_eq!(config.sync.max_pending(), Some(50));
    assert_eq!(config.sync.jitter_ratio, 0.0);
    assert_eq!(config.sync.initial_backoff_ms, 500);
}

#[test]
fn unparseable_config_is_a_config_error() {
    let temp = TempDir::new().unwrap();
    let work_dir = temp.path().join(".fieldq");
    fs::create_dir_all(&work_dir).unwrap();
    fs::write(work_dir.join("config.toml"), "[sync\n").unwrap();

    let err = Config::load(&work_dir).unwrap_err();
    assert!(err.to_string().starts_with("config error: failed to parse config"));
}

#[test]
fn zero_max_pending_disables_cap() {
    let settings = SyncSettings {
        max_pending: 0,
        ..SyncSettings::default()
    };
    assert_eq!(settings.max_pending(), None);
}

#[test]
fn sync_config_uses_remote_and_sync_sections() {
    let mut config = Config::default();
    config.remote.request_timeout_ms = 750;
    config.sync.initial_backoff_ms = 100;
    config.sync.max_backoff_secs = 3;

    let sync = config.sync_config();
    assert_eq!(sync.request_timeout, Duration::from_millis(750));
    assert_eq!(sync.backoff.initial, Duration::from_millis(100));
    assert_eq!(sync.backoff.max, Duration::from_secs(3));
}

#[test]
fn find_work_dir_walks_up() {
    let temp = TempDir::new().unwrap();
    let work_dir = init_work_dir(temp.path(), None).unwrap();
    let nested = temp.path().join("visits").join("2026");
    fs::create_dir_all(&nested).unwrap();

    assert_eq!(find_work_dir_from(&nested).unwrap(), work_dir);
}

#[test]
fn find_work_dir_without_project() {
    let temp = TempDir::new().unwrap();
    assert!(matches!(
        find_work_dir_from(temp.path()),
        Err(Error::NotInitialized)
    ));
}

#[parameterized(
    ws = { "ws://127.0.0.1:7890", true },
    wss = { "wss://relay.example.org/sync", true },
    http = { "http://relay.example.org", false },
    bare = { "relay.example.org", false },
)]
fn url_validation(url: &str, valid: bool) {
    assert_eq!(RemoteConfig::validate_url(url).is_ok(), valid);
}
