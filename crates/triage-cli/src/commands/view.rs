//! Prioritized task view command.

use std::error::Error;
use std::path::PathBuf;

use chrono::NaiveDate;
use clap::Args;

#[derive(Args)]
pub struct ViewArgs {
    /// Task file (TOML)
    pub file: PathBuf,
    /// Override the reference date from the file (YYYY-MM-DD)
    #[arg(long)]
    pub reference_date: Option<NaiveDate>,
    /// Emit the full view as JSON
    #[arg(long)]
    pub json: bool,
}

pub fn run(args: ViewArgs) -> Result<(), Box<dyn Error>> {
    let engine = super::load_engine(&args.file, args.reference_date)?;
    let view = engine.prioritized();

    if args.json {
        println!("{}", serde_json::to_string_pretty(&view)?);
        return Ok(());
    }

    if view.tasks.is_empty() {
        println!("No tasks.");
        return Ok(());
    }

    println!(
        "{:<30} {:>7} {:>10} {:>12} {:>9}  {}",
        "DESCRIPTION", "URGENCY", "IMPORTANCE", "DUE", "DAYS LEFT", "PRIORITY"
    );
    for task in &view.tasks {
        println!(
            "{:<30} {:>7} {:>10} {:>12} {:>9}  {}",
            task.description,
            task.urgency,
            task.importance,
            task.due_date.format("%Y-%m-%d"),
            task.days_left,
            task.priority
        );
    }
    Ok(())
}
