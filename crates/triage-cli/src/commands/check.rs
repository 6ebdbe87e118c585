//! Task file validation command.

use std::error::Error;
use std::path::PathBuf;

use clap::Args;
use triage_core::{EngineConfig, PrioritizationEngine};

#[derive(Args)]
pub struct CheckArgs {
    /// Task file (TOML)
    pub file: PathBuf,
}

/// Validate every task in the file, reporting all problems rather than
/// stopping at the first.
pub fn run(args: CheckArgs) -> Result<(), Box<dyn Error>> {
    let file = super::load_file(&args.file)?;
    let config = file.engine.unwrap_or_else(EngineConfig::default);
    let engine = PrioritizationEngine::new(config);

    let mut invalid = 0usize;
    for entry in &file.tasks {
        match engine.add_task(
            &entry.description,
            entry.urgency,
            entry.importance,
            &entry.due_date,
        ) {
            Ok(_) => println!("ok: {}", entry.description),
            Err(e) => {
                invalid += 1;
                println!("invalid: {} ({e})", entry.description);
            }
        }
    }

    println!("{} task(s), {} invalid", file.tasks.len(), invalid);
    if invalid > 0 {
        return Err(format!("{invalid} invalid task(s)").into());
    }
    Ok(())
}
