//! Registry enrichment from a batch of match outcomes.
//!
//! Both operations are idempotent: re-running a batch produces no
//! additional writes. Enrichment is write-once per contact and runs
//! sequentially; the conditional UPDATE in the store gives per-contact
//! compare-and-set semantics should callers ever parallelize it.

use crate::db::{Db, DbError};
use crate::types::MatchOutcome;

/// Result of recording a connection batch in the derived table.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct InsertStats {
    pub inserted: usize,
    /// Rows already present under the same URL.
    pub skipped: usize,
}

/// Result of a contact URL enrichment pass.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct EnrichStats {
    pub updated: usize,
    /// Contacts that already carried a URL.
    pub already_set: usize,
}

/// Store every outcome, matched or not, in `linkedin_connections`,
/// deduplicated by profile URL.
pub fn record_connections(db: &Db, outcomes: &[MatchOutcome]) -> Result<InsertStats, DbError> {
    let mut stats = InsertStats::default();
    for outcome in outcomes {
        if db.insert_connection(outcome)? {
            stats.inserted += 1;
        } else {
            stats.skipped += 1;
        }
    }
    tracing::info!(
        inserted = stats.inserted,
        skipped = stats.skipped,
        "recorded connection batch"
    );
    Ok(stats)
}

/// Write matched profile URLs onto their contacts, skipping contacts
/// whose URL field is already populated.
pub fn enrich_contacts(db: &Db, outcomes: &[MatchOutcome]) -> Result<EnrichStats, DbError> {
    let mut stats = EnrichStats::default();
    for outcome in outcomes {
        let contact_id = match outcome.contact_id.as_deref() {
            Some(id) => id,
            None => continue,
        };
        if db.set_contact_url_if_empty(contact_id, &outcome.record.linkedin_url)? {
            stats.updated += 1;
        } else {
            stats.already_set += 1;
        }
    }
    tracing::info!(
        updated = stats.updated,
        already_set = stats.already_set,
        "contact enrichment pass complete"
    );
    Ok(stats)
}
