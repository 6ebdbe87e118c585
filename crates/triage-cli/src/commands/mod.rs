//! CLI command implementations.
//!
//! Each command loads a TOML task file, feeds it through the in-memory
//! engine and renders the result. The file is transport only; the engine
//! itself keeps no state between invocations.

pub mod check;
pub mod summary;
pub mod view;

use std::error::Error;
use std::path::Path;

use chrono::NaiveDate;
use serde::Deserialize;
use triage_core::{EngineConfig, PrioritizationEngine};

/// One task definition from the input file.
#[derive(Debug, Deserialize)]
pub struct TaskEntry {
    pub description: String,
    pub urgency: i32,
    pub importance: i32,
    pub due_date: String,
}

/// Parsed task file: optional `[engine]` table plus `[[tasks]]` entries.
#[derive(Debug, Deserialize)]
pub struct TaskFile {
    #[serde(default)]
    pub engine: Option<EngineConfig>,
    #[serde(default)]
    pub tasks: Vec<TaskEntry>,
}

pub fn load_file(path: &Path) -> Result<TaskFile, Box<dyn Error>> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| format!("Failed to read {}: {e}", path.display()))?;
    Ok(toml::from_str(&content)?)
}

/// Build an engine from a task file, applying an optional reference-date
/// override, and add every task. The first invalid task aborts with its
/// validation error.
pub fn load_engine(
    path: &Path,
    reference_date: Option<NaiveDate>,
) -> Result<PrioritizationEngine, Box<dyn Error>> {
    let file = load_file(path)?;
    let mut config = file.engine.unwrap_or_default();
    if let Some(date) = reference_date {
        config.reference_date = date;
    }

    let engine = PrioritizationEngine::new(config);
    for entry in &file.tasks {
        engine
            .add_task(
                &entry.description,
                entry.urgency,
                entry.importance,
                &entry.due_date,
            )
            .map_err(|e| format!("Task '{}': {e}", entry.description))?;
    }
    Ok(engine)
}
