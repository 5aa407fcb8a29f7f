// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used)]

//! Tests for routing in the public `run()` function.

use clap::Parser;
use tempfile::TempDir;
use yare::parameterized;

use crate::{run, Cli, Error};

fn cli(args: &[&str]) -> Cli {
    Cli::try_parse_from(args).unwrap()
}

#[test]
fn init_then_commands_via_directory_flag() {
    let temp = TempDir::new().unwrap();
    let dir = temp.path().to_str().unwrap();

    run(cli(&["fieldq", "-C", dir, "init", "--remote", "ws://127.0.0.1:9"])).unwrap();
    run(cli(&["fieldq", "-C", dir, "demo"])).unwrap();
    run(cli(&["fieldq", "-C", dir, "pending", "-o", "json"])).unwrap();
    run(cli(&["fieldq", "-C", dir, "purge"])).unwrap();

    assert!(temp.path().join(".fieldq").join("store.db").exists());
}

#[test]
fn commands_outside_project_fail() {
    let temp = TempDir::new().unwrap();
    let dir = temp.path().to_str().unwrap();

    let err = run(cli(&["fieldq", "-C", dir, "pending"])).unwrap_err();
    assert!(matches!(err, Error::NotInitialized));
}

#[test]
fn init_twice_fails() {
    let temp = TempDir::new().unwrap();
    let dir = temp.path().to_str().unwrap();

    run(cli(&["fieldq", "-C", dir, "init"])).unwrap();
    let err = run(cli(&["fieldq", "-C", dir, "init"])).unwrap_err();
    assert!(matches!(err, Error::AlreadyInitialized(_)));
}

#[parameterized(
    record = { &["record", "patients", "{}"] },
    enqueue = { &["enqueue", "update-patient"] },
    demo = { &["demo"] },
    show = { &["show", "visits"] },
    status = { &["status"] },
    sync = { &["sync"] },
    watch = { &["watch"] },
    purge = { &["purge"] },
)]
fn every_project_command_requires_init(args: &[&str]) {
    let temp = TempDir::new().unwrap();
    let dir = temp.path().to_str().unwrap();
    let mut argv = vec!["fieldq", "-C", dir];
    argv.extend_from_slice(args);

    let err = run(cli(&argv)).unwrap_err();
    assert!(matches!(err, Error::NotInitialized));
}
