// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Shared fixtures for command tests, plus tests for the command helpers.

#![allow(clippy::unwrap_used)]

use std::path::Path;

use tempfile::TempDir;

use super::*;
use crate::config::init_work_dir;

/// An initialized project in a temp directory.
pub struct TestProject {
    pub dir: TempDir,
}

impl TestProject {
    /// Initializes a project whose relay URL points at a closed port.
    pub fn new() -> Self {
        let dir = TempDir::new().unwrap();
        init_work_dir(dir.path(), Some("ws://127.0.0.1:9")).unwrap();
        TestProject { dir }
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn project(&self) -> Project {
        Project::open(self.path()).unwrap()
    }

    pub fn store(&self) -> LocalStore {
        self.project().open_store().unwrap()
    }
}

#[test]
fn open_finds_project_from_subdirectory() {
    let project = TestProject::new();
    let nested = project.path().join("district").join("north");
    std::fs::create_dir_all(&nested).unwrap();

    let opened = Project::open(&nested).unwrap();
    assert_eq!(opened.work_dir, project.path().join(".fieldq"));
}

#[test]
fn open_outside_project_is_not_initialized() {
    let dir = TempDir::new().unwrap();
    assert!(matches!(
        Project::open(dir.path()),
        Err(Error::NotInitialized)
    ));
}

#[test]
fn store_is_created_in_work_dir() {
    let project = TestProject::new();
    let store = project.store();
    assert!(store.is_supported());
    assert!(project.path().join(".fieldq").join("store.db").exists());
}

#[test]
fn engine_starts_with_requested_connectivity() {
    let project = TestProject::new();
    let engine = project.project().engine(Connectivity::Offline).unwrap();
    assert!(!engine.get_status().is_online);
}

#[test]
fn parse_json_object_accepts_objects_only() {
    assert_eq!(
        parse_json_object("entity", r#"{"name":"Amina"}"#).unwrap()["name"],
        "Amina"
    );
    assert!(matches!(
        parse_json_object("entity", "[1, 2]"),
        Err(Error::NotAnObject { what: "entity" })
    ));
    assert!(matches!(
        parse_json_object("payload", "{oops"),
        Err(Error::InvalidJson { what: "payload", .. })
    ));
}
