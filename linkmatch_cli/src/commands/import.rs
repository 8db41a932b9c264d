//! The `import` subcommand: match a connections export against the
//! registry, report the results, and (outside dry-run) record them.

use std::path::PathBuf;

use anyhow::{bail, Result};
use clap::Args;
use csv::Writer;
use indicatif::{ProgressBar, ProgressStyle};
use linkmatch_lib::{
    enrich_contacts, load_connections, match_record, record_connections, CandidateIndex, Db,
    MatchOutcome, ResolutionReport,
};

use crate::output::{self, OutputFormat, ReviewRow};

/// Arguments for the `import` subcommand.
#[derive(Args)]
pub struct ImportArgs {
    /// Path to the connections CSV export
    #[arg(long)]
    pub csv: PathBuf,

    /// SQLite registry path (falls back to LINKMATCH_DB, then contacts.db)
    #[arg(long)]
    pub db: Option<PathBuf>,

    /// Only report matches, do not modify the registry
    #[arg(long)]
    pub dry_run: bool,

    /// Write matched profile URLs onto contacts (write-once)
    #[arg(long)]
    pub update_contacts: bool,

    /// Write unmatched and ambiguous outcomes to a review CSV
    #[arg(long)]
    pub export_unmatched: Option<PathBuf>,

    /// Maximum unmatched rows shown in the report
    #[arg(long, default_value = "50")]
    pub preview: usize,
}

pub fn run(args: &ImportArgs, format: &OutputFormat) -> Result<()> {
    let db_path = super::resolve_db_path(&args.db);
    let db = Db::open(&db_path)?;
    db.init()?;

    eprintln!("Loading connections from {}", args.csv.display());
    let loaded = load_connections(&args.csv)?;
    if loaded.skipped > 0 {
        eprintln!(
            "Rejected {} rows missing a URL or first name.",
            loaded.skipped
        );
    }
    if loaded.records.is_empty() {
        bail!("no usable connection rows in {}", args.csv.display());
    }
    eprintln!("Found {} connections.", loaded.records.len());

    let contacts = db.all_contacts()?;
    if contacts.is_empty() {
        eprintln!(
            "Warning: registry {} has no contacts; every connection will be unmatched.",
            db_path.display()
        );
    }
    let index = CandidateIndex::new(contacts);

    let pb = ProgressBar::new(loaded.records.len() as u64);
    pb.set_style(
        ProgressStyle::with_template("[{elapsed_precise}] {bar:40.cyan/blue} {pos:>6}/{len:6} {msg}")
            .unwrap(),
    );
    pb.set_message("matching...");

    let mut outcomes: Vec<MatchOutcome> = Vec::with_capacity(loaded.records.len());
    for record in loaded.records {
        outcomes.push(match_record(record, &index));
        pb.inc(1);
    }
    pb.finish_and_clear();

    let report = ResolutionReport::from_outcomes(&outcomes);
    output::print_report(&report, format, args.preview)?;

    if let Some(path) = &args.export_unmatched {
        let mut wtr = Writer::from_path(path)?;
        for outcome in &report.unmatched {
            wtr.serialize(ReviewRow::from_outcome(outcome))?;
        }
        wtr.flush()?;
        eprintln!(
            "Wrote {} rows needing review to {}",
            report.unmatched.len(),
            path.display()
        );
    }

    if args.dry_run {
        eprintln!("[dry-run] No changes made to the registry.");
        return Ok(());
    }

    let inserted = record_connections(&db, &outcomes)?;
    eprintln!(
        "Recorded connections: {} inserted, {} already present.",
        inserted.inserted, inserted.skipped
    );

    if args.update_contacts {
        let enriched = enrich_contacts(&db, &report.matched)?;
        eprintln!(
            "Contacts enriched: {} updated, {} already had a URL.",
            enriched.updated, enriched.already_set
        );
    }

    Ok(())
}
