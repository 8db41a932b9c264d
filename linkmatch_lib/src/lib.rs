//! Library layer for linkmatch: resolve exported network connections
//! against a local contact registry.
//!
//! A matching pass loads a connections CSV export, builds a candidate
//! index from the registry snapshot, classifies every record into a
//! confidence tier (email, exact, fuzzy, ambiguous, unmatched), and
//! optionally applies idempotent enrichment: write-once profile URLs on
//! contacts and a deduplicated connection history table.

pub mod db;
pub mod error;
pub mod index;
pub mod loader;
pub mod matcher;
pub mod normalize;
pub mod report;
pub mod types;
pub mod updater;

pub use db::{Db, DbError, UnmatchedConnectionRow};
pub use error::LinkMatchError;
pub use index::CandidateIndex;
pub use loader::{load_connections, parse_connections, LoadedConnections};
pub use matcher::match_record;
pub use normalize::{normalize_name, NormalizedName};
pub use report::{ResolutionReport, TierCounts};
pub use types::{ConnectionRecord, Contact, ContactId, MatchConfidence, MatchOutcome};
pub use updater::{enrich_contacts, record_connections, EnrichStats, InsertStats};
