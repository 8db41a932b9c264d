//! The `unmatched` subcommand: list stored connections for review.

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;
use linkmatch_lib::Db;

use crate::output::{self, OutputFormat};

/// Arguments for the `unmatched` subcommand.
#[derive(Args)]
pub struct UnmatchedArgs {
    /// SQLite registry path (falls back to LINKMATCH_DB, then contacts.db)
    #[arg(long)]
    pub db: Option<PathBuf>,

    /// Maximum rows to list
    #[arg(long)]
    pub limit: Option<i64>,
}

pub fn run(args: &UnmatchedArgs, format: &OutputFormat) -> Result<()> {
    let db = Db::open(super::resolve_db_path(&args.db))?;
    db.init()?;

    let rows = db.unmatched_connections(args.limit)?;
    if rows.is_empty() {
        eprintln!("No unmatched connections stored. Run 'linkmatch import' first.");
        return Ok(());
    }

    output::print_stored(&rows, format)
}
