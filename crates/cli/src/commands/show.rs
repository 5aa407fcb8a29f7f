// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use fq_core::Collection;

use super::Project;
use crate::cli::OutputFormat;
use crate::error::Result;

pub fn run(project: &Project, collection: &str, output: OutputFormat) -> Result<()> {
    let collection: Collection = collection.parse()?;
    let entities = project.open_store()?.load_collection(collection);

    match output {
        OutputFormat::Text => {
            if entities.is_empty() {
                println!("No {} recorded", collection);
            }
            for entity in &entities {
                println!("{}", entity);
            }
        }
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&entities)?);
        }
    }
    Ok(())
}

#[cfg(test)]
#[path = "show_tests.rs"]
mod tests;
