use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "triage", version, about = "Task prioritization engine CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show tasks ordered by priority tier
    View(commands::view::ViewArgs),
    /// Show per-cluster summaries for plotting
    Summary(commands::summary::SummaryArgs),
    /// Validate a task file without producing a view
    Check(commands::check::CheckArgs),
}

fn main() {
    let cli = Cli::parse();
    let result = match cli.command {
        Commands::View(args) => commands::view::run(args),
        Commands::Summary(args) => commands::summary::run(args),
        Commands::Check(args) => commands::check::run(args),
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
