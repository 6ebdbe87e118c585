//! Cluster summary command.

use std::error::Error;
use std::path::PathBuf;

use chrono::NaiveDate;
use clap::Args;

#[derive(Args)]
pub struct SummaryArgs {
    /// Task file (TOML)
    pub file: PathBuf,
    /// Override the reference date from the file (YYYY-MM-DD)
    #[arg(long)]
    pub reference_date: Option<NaiveDate>,
    /// Emit summaries as JSON
    #[arg(long)]
    pub json: bool,
}

pub fn run(args: SummaryArgs) -> Result<(), Box<dyn Error>> {
    let engine = super::load_engine(&args.file, args.reference_date)?;
    let clusters = engine.cluster_summaries();

    if args.json {
        println!("{}", serde_json::to_string_pretty(&clusters)?);
        return Ok(());
    }

    if clusters.is_empty() {
        println!("No clusters (fewer than two tasks).");
        return Ok(());
    }

    for summary in &clusters {
        println!(
            "Cluster {} [{}]: {} task(s), score {:.2} (urgency {:.2}, importance {:.2}, time factor {:.2})",
            summary.cluster,
            summary.label,
            summary.member_count,
            summary.score,
            summary.mean_urgency,
            summary.mean_importance,
            summary.mean_time_factor
        );
        for (urgency, importance) in &summary.points {
            println!("  point: urgency={urgency} importance={importance}");
        }
    }
    Ok(())
}
