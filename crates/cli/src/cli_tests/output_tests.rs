// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used)]
#![allow(clippy::panic)]

use super::*;
use yare::parameterized;

fn pending_output(args: &[&str]) -> OutputFormat {
    match Cli::try_parse_from(args).unwrap().command {
        Command::Pending { output } => output,
        _ => panic!("expected pending"),
    }
}

#[parameterized(
    default = { &["fieldq", "pending"], OutputFormat::Text },
    long = { &["fieldq", "pending", "--output", "json"], OutputFormat::Json },
    short = { &["fieldq", "pending", "-o", "json"], OutputFormat::Json },
    explicit_text = { &["fieldq", "pending", "-o", "text"], OutputFormat::Text },
)]
fn pending_output_format(args: &[&str], expected: OutputFormat) {
    assert_eq!(pending_output(args), expected);
}

#[test]
fn invalid_output_format_fails() {
    assert!(Cli::try_parse_from(["fieldq", "status", "-o", "yaml"]).is_err());
}

#[test]
fn show_accepts_output() {
    match Cli::try_parse_from(["fieldq", "show", "visits", "-o", "json"])
        .unwrap()
        .command
    {
        Command::Show { collection, output } => {
            assert_eq!(collection, "visits");
            assert_eq!(output, OutputFormat::Json);
        }
        _ => panic!("expected show"),
    }
}
