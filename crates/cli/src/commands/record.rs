// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use fq_core::{Collection, Connectivity};

use super::{parse_json_object, Project};
use crate::error::Result;

/// Stores an entity locally and queues its create operation.
pub fn run(project: &Project, collection: &str, json: &str) -> Result<()> {
    let collection: Collection = collection.parse()?;
    let entity = parse_json_object("entity", json)?;

    let engine = project.engine(Connectivity::Offline)?;
    let record = engine.try_record(collection, entity)?;

    println!(
        "Recorded {} entry, queued {} {}",
        collection, record.operation, record.id
    );
    Ok(())
}

#[cfg(test)]
#[path = "record_tests.rs"]
mod tests;
