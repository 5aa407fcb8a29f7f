// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used)]

use super::*;

#[test]
fn parse_dash_c_before_subcommand() {
    let cli = Cli::try_parse_from(["fieldq", "-C", "/tmp", "pending"]).unwrap();
    assert_eq!(cli.directory, Some("/tmp".to_string()));
}

#[test]
fn parse_dash_c_with_equals() {
    let cli = Cli::try_parse_from(["fieldq", "-C=/tmp", "status"]).unwrap();
    assert_eq!(cli.directory, Some("/tmp".to_string()));
}

#[test]
fn parse_dash_c_after_subcommand() {
    let cli = Cli::try_parse_from(["fieldq", "sync", "-C", "/tmp"]).unwrap();
    assert_eq!(cli.directory, Some("/tmp".to_string()));
}

#[test]
fn parse_long_directory_flag() {
    let cli = Cli::try_parse_from(["fieldq", "--directory", "/tmp", "demo"]).unwrap();
    assert_eq!(cli.directory, Some("/tmp".to_string()));
}

#[test]
fn directory_defaults_to_none() {
    let cli = Cli::try_parse_from(["fieldq", "purge"]).unwrap();
    assert_eq!(cli.directory, None);
}
