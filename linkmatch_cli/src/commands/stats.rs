//! The `stats` subcommand: confidence tier counts for stored connections.

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;
use linkmatch_lib::Db;

use crate::output::{self, OutputFormat};

/// Arguments for the `stats` subcommand.
#[derive(Args)]
pub struct StatsArgs {
    /// SQLite registry path (falls back to LINKMATCH_DB, then contacts.db)
    #[arg(long)]
    pub db: Option<PathBuf>,
}

pub fn run(args: &StatsArgs, format: &OutputFormat) -> Result<()> {
    let db = Db::open(super::resolve_db_path(&args.db))?;
    db.init()?;

    let counts = db.confidence_counts()?;
    if counts.is_empty() {
        eprintln!("No connections stored. Run 'linkmatch import' first.");
        return Ok(());
    }

    output::print_stats(&counts, format)
}
