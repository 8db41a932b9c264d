//! CLI subcommand implementations.

pub mod import;
pub mod stats;
pub mod unmatched;

use std::path::PathBuf;

/// Resolve the registry path: explicit flag, then the LINKMATCH_DB
/// environment variable, then ./contacts.db.
pub fn resolve_db_path(flag: &Option<PathBuf>) -> PathBuf {
    match flag {
        Some(path) => path.clone(),
        None => std::env::var("LINKMATCH_DB")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("contacts.db")),
    }
}
