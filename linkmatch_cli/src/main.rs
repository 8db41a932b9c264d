mod commands;
mod output;

use anyhow::Result;
use clap::{Parser, Subcommand};

use crate::output::OutputFormat;

#[derive(Parser)]
#[command(name = "linkmatch")]
#[command(about = "Match exported LinkedIn connections against a local contact registry")]
struct Cli {
    /// Output format: table, json, or csv
    #[arg(long, default_value = "table", global = true)]
    output: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Import a connections export and match it against the registry
    Import(commands::import::ImportArgs),
    /// List stored connections that need manual review
    Unmatched(commands::unmatched::UnmatchedArgs),
    /// Show match confidence statistics for stored connections
    Stats(commands::stats::StatsArgs),
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("linkmatch_lib=info".parse().unwrap()),
        )
        .with_target(false)
        .init();

    let cli = Cli::parse();
    let format = OutputFormat::from_flag(&cli.output);

    match &cli.command {
        Commands::Import(args) => commands::import::run(args, &format),
        Commands::Unmatched(args) => commands::unmatched::run(args, &format),
        Commands::Stats(args) => commands::stats::run(args, &format),
    }
}
