// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

// Allow unused items: test helpers are shared across multiple test binaries,
// and not every test file uses every helper.
#![allow(dead_code)]
#![allow(unused_imports)]

use assert_cmd::cargo::cargo_bin_cmd;
use assert_cmd::Command;

pub use predicates::prelude::*;
pub use tempfile::TempDir;

/// Relay URL nothing listens on.
pub const UNREACHABLE_REMOTE: &str = "ws://127.0.0.1:9";

pub fn fieldq() -> Command {
    cargo_bin_cmd!("fieldq")
}

/// Helper to create an initialized temp directory pointing at a dead relay
pub fn init_temp() -> TempDir {
    init_temp_with_remote(UNREACHABLE_REMOTE)
}

/// Helper to create an initialized temp directory pointing at `url`
pub fn init_temp_with_remote(url: &str) -> TempDir {
    let temp = TempDir::new().unwrap();
    fieldq()
        .arg("init")
        .arg("--remote")
        .arg(url)
        .current_dir(temp.path())
        .assert()
        .success();
    temp
}

/// Helper to record an entity and return the queued operation id
pub fn record(temp: &TempDir, collection: &str, json: &str) -> String {
    let output = fieldq()
        .arg("record")
        .arg(collection)
        .arg(json)
        .current_dir(temp.path())
        .output()
        .unwrap();
    assert!(output.status.success(), "record failed: {:?}", output);

    String::from_utf8_lossy(&output.stdout)
        .split_whitespace()
        .find(|s| s.starts_with("op-"))
        .unwrap()
        .to_string()
}

/// Pending records as parsed JSON
pub fn pending_json(temp: &TempDir) -> Vec<serde_json::Value> {
    let output = fieldq()
        .args(["pending", "-o", "json"])
        .current_dir(temp.path())
        .output()
        .unwrap();
    serde_json::from_slice(&output.stdout).unwrap()
}
