//! SQLite storage for the contact registry and imported connections.

use std::path::Path;

use rusqlite::{params, Connection};
use serde::Serialize;

use crate::types::{Contact, MatchOutcome};

#[derive(thiserror::Error, Debug)]
pub enum DbError {
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
}

/// A stored connection awaiting manual review.
#[derive(Debug, Clone, Serialize)]
pub struct UnmatchedConnectionRow {
    pub first_name: String,
    pub last_name: String,
    pub company: Option<String>,
    pub linkedin_url: String,
    pub match_confidence: String,
    pub match_notes: String,
}

pub struct Db {
    conn: Connection,
}

impl Db {
    pub fn open(path: impl AsRef<Path>) -> Result<Self, DbError> {
        let conn = Connection::open(path)?;
        conn.execute_batch(
            "PRAGMA foreign_keys = ON;
             PRAGMA journal_mode = WAL;
             PRAGMA synchronous = NORMAL;",
        )?;
        Ok(Self { conn })
    }

    /// Open an in-memory database (for testing).
    pub fn open_in_memory() -> Result<Self, DbError> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch(
            "PRAGMA foreign_keys = ON;
             PRAGMA journal_mode = WAL;
             PRAGMA synchronous = NORMAL;",
        )?;
        Ok(Self { conn })
    }

    /// Get a reference to the underlying connection (for tests).
    #[doc(hidden)]
    pub fn conn(&self) -> &Connection {
        &self.conn
    }

    pub fn init(&self) -> Result<(), DbError> {
        // Check schema version before applying DDL so migrations can add
        // columns that the schema's indexes reference.
        let version: i32 = self
            .conn
            .pragma_query_value(None, "user_version", |row| row.get(0))?;

        if version < 1 {
            self.migrate_v1()?;
            self.conn.pragma_update(None, "user_version", 1)?;
        }

        let schema = include_str!("../../schema/sqlite.sql");
        self.conn.execute_batch(schema)?;

        Ok(())
    }

    /// Imports made before the position column existed.
    fn migrate_v1(&self) -> Result<(), DbError> {
        for sql in &[
            "ALTER TABLE linkedin_connections ADD COLUMN position TEXT",
            "ALTER TABLE contacts ADD COLUMN updated_at TEXT",
        ] {
            match self.conn.execute(sql, []) {
                Ok(_) => {}
                Err(rusqlite::Error::SqliteFailure(_, Some(ref msg)))
                    if msg.contains("duplicate column name")
                        || msg.contains("no such table") => {}
                Err(e) => return Err(e.into()),
            }
        }
        Ok(())
    }

    /// Full registry snapshot; feeds the candidate index once per pass.
    pub fn all_contacts(&self) -> Result<Vec<Contact>, DbError> {
        let mut stmt = self.conn.prepare(
            "SELECT id, first_name, last_name, email, linkedin_url FROM contacts ORDER BY id",
        )?;
        let rows = stmt.query_map([], |row| {
            Ok(Contact {
                id: row.get(0)?,
                first_name: row.get(1)?,
                last_name: row.get(2)?,
                email: row.get(3)?,
                linkedin_url: row.get(4)?,
            })
        })?;
        rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }

    pub fn insert_contact(&self, contact: &Contact) -> Result<(), DbError> {
        self.conn.execute(
            "INSERT INTO contacts (id, first_name, last_name, email, linkedin_url)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                contact.id,
                contact.first_name,
                contact.last_name,
                contact.email,
                contact.linkedin_url,
            ],
        )?;
        Ok(())
    }

    /// Insert a connection with its match decision. Returns false when a
    /// row with the same URL is already stored.
    pub fn insert_connection(&self, outcome: &MatchOutcome) -> Result<bool, DbError> {
        let record = &outcome.record;
        let changed = self.conn.execute(
            "INSERT OR IGNORE INTO linkedin_connections
             (first_name, last_name, linkedin_url, email, company, position, connected_on,
              matched_contact_id, match_confidence, match_notes)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
            params![
                record.first_name,
                record.last_name,
                record.linkedin_url,
                record.email,
                record.company,
                record.position,
                record.connected_on.map(|d| d.to_string()),
                outcome.contact_id,
                outcome.confidence.to_string(),
                outcome.notes,
            ],
        )?;
        Ok(changed == 1)
    }

    /// Write-once URL enrichment: a single conditional UPDATE, so the
    /// check and the write cannot race. Returns false when the contact
    /// already carries a URL.
    pub fn set_contact_url_if_empty(&self, contact_id: &str, url: &str) -> Result<bool, DbError> {
        let changed = self.conn.execute(
            "UPDATE contacts
             SET linkedin_url = ?1, updated_at = datetime('now')
             WHERE id = ?2 AND (linkedin_url IS NULL OR linkedin_url = '')",
            params![url, contact_id],
        )?;
        Ok(changed == 1)
    }

    pub fn connection_count(&self) -> Result<i64, DbError> {
        let count = self
            .conn
            .query_row("SELECT COUNT(*) FROM linkedin_connections", [], |row| {
                row.get(0)
            })?;
        Ok(count)
    }

    /// Stored-connection counts per confidence tier, largest first.
    pub fn confidence_counts(&self) -> Result<Vec<(String, i64)>, DbError> {
        let mut stmt = self.conn.prepare(
            "SELECT match_confidence, COUNT(*) FROM linkedin_connections
             GROUP BY match_confidence ORDER BY COUNT(*) DESC, match_confidence",
        )?;
        let rows = stmt.query_map([], |row| Ok((row.get(0)?, row.get(1)?)))?;
        rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }

    /// Stored connections without a matched contact, in import order.
    pub fn unmatched_connections(
        &self,
        limit: Option<i64>,
    ) -> Result<Vec<UnmatchedConnectionRow>, DbError> {
        let mut stmt = self.conn.prepare(
            "SELECT first_name, last_name, company, linkedin_url, match_confidence, match_notes
             FROM linkedin_connections
             WHERE matched_contact_id IS NULL
             ORDER BY rowid
             LIMIT ?1",
        )?;
        let rows = stmt.query_map([limit.unwrap_or(-1)], |row| {
            Ok(UnmatchedConnectionRow {
                first_name: row.get(0)?,
                last_name: row.get(1)?,
                company: row.get(2)?,
                linkedin_url: row.get(3)?,
                match_confidence: row.get(4)?,
                match_notes: row.get(5)?,
            })
        })?;
        rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{ConnectionRecord, MatchConfidence};

    fn test_db() -> Db {
        let db = Db::open_in_memory().expect("open db");
        db.init().expect("init db");
        db
    }

    fn contact(id: &str, url: Option<&str>) -> Contact {
        Contact {
            id: id.into(),
            first_name: "Jenny".into(),
            last_name: "Lee".into(),
            email: None,
            linkedin_url: url.map(String::from),
        }
    }

    fn outcome(url: &str, contact_id: Option<&str>, confidence: MatchConfidence) -> MatchOutcome {
        MatchOutcome {
            record: ConnectionRecord {
                first_name: "Jenny".into(),
                last_name: "Lee".into(),
                linkedin_url: url.into(),
                email: None,
                company: Some("Acme".into()),
                position: None,
                connected_on: None,
            },
            contact_id: contact_id.map(String::from),
            confidence,
            notes: "test".into(),
        }
    }

    #[test]
    fn init_is_idempotent() {
        let db = test_db();
        db.init().expect("re-init");
        assert_eq!(db.connection_count().unwrap(), 0);
    }

    #[test]
    fn contact_roundtrip() {
        let db = test_db();
        db.insert_contact(&contact("c1", None)).unwrap();
        let contacts = db.all_contacts().unwrap();
        assert_eq!(contacts.len(), 1);
        assert_eq!(contacts[0].id, "c1");
        assert_eq!(contacts[0].linkedin_url, None);
    }

    #[test]
    fn insert_connection_dedups_by_url() {
        let db = test_db();
        let out = outcome("https://linkedin.com/in/jennylee", Some("c1"), MatchConfidence::Exact);
        assert!(db.insert_connection(&out).unwrap());
        assert!(!db.insert_connection(&out).unwrap());
        assert_eq!(db.connection_count().unwrap(), 1);
    }

    #[test]
    fn url_enrichment_is_write_once() {
        let db = test_db();
        db.insert_contact(&contact("c1", None)).unwrap();
        assert!(db
            .set_contact_url_if_empty("c1", "https://linkedin.com/in/jennylee")
            .unwrap());
        // Second write must not clobber the stored value.
        assert!(!db
            .set_contact_url_if_empty("c1", "https://linkedin.com/in/other")
            .unwrap());
        let contacts = db.all_contacts().unwrap();
        assert_eq!(
            contacts[0].linkedin_url.as_deref(),
            Some("https://linkedin.com/in/jennylee")
        );
    }

    #[test]
    fn preexisting_url_is_never_overwritten() {
        let db = test_db();
        db.insert_contact(&contact("c1", Some("https://linkedin.com/in/original")))
            .unwrap();
        assert!(!db
            .set_contact_url_if_empty("c1", "https://linkedin.com/in/other")
            .unwrap());
        let contacts = db.all_contacts().unwrap();
        assert_eq!(
            contacts[0].linkedin_url.as_deref(),
            Some("https://linkedin.com/in/original")
        );
    }

    #[test]
    fn confidence_counts_group_by_tier() {
        let db = test_db();
        db.insert_connection(&outcome("u1", Some("c1"), MatchConfidence::Exact))
            .unwrap();
        db.insert_connection(&outcome("u2", Some("c2"), MatchConfidence::Exact))
            .unwrap();
        db.insert_connection(&outcome("u3", None, MatchConfidence::Unmatched))
            .unwrap();
        let counts = db.confidence_counts().unwrap();
        assert_eq!(counts[0], ("exact".to_string(), 2));
        assert_eq!(counts[1], ("unmatched".to_string(), 1));
    }

    #[test]
    fn unmatched_listing_and_limit() {
        let db = test_db();
        db.insert_connection(&outcome("u1", Some("c1"), MatchConfidence::Exact))
            .unwrap();
        db.insert_connection(&outcome("u2", None, MatchConfidence::Unmatched))
            .unwrap();
        db.insert_connection(&outcome("u3", None, MatchConfidence::MultipleExact))
            .unwrap();
        let all = db.unmatched_connections(None).unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].linkedin_url, "u2");
        assert_eq!(all[1].match_confidence, "multiple_exact");
        let limited = db.unmatched_connections(Some(1)).unwrap();
        assert_eq!(limited.len(), 1);
    }
}
