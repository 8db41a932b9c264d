//! Data model shared by the matching core and its collaborators.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Opaque identifier for a registry contact (UUID-style string).
pub type ContactId = String;

/// One row from a connections export, immutable once loaded.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConnectionRecord {
    /// Connection's first name as exported.
    pub first_name: String,

    /// Connection's last name as exported (may be empty).
    pub last_name: String,

    /// Profile URL; unique provenance key for this record.
    pub linkedin_url: String,

    /// Email address, when the connection shared one.
    pub email: Option<String>,

    pub company: Option<String>,

    pub position: Option<String>,

    /// Date the connection was made, when parseable.
    pub connected_on: Option<NaiveDate>,
}

impl ConnectionRecord {
    /// Raw display name, e.g. for review listings.
    pub fn display_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
            .trim()
            .to_string()
    }
}

/// A contact in the canonical registry. The matcher only reads these;
/// `linkedin_url` is write-once and only touched by the updater.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Contact {
    pub id: ContactId,
    pub first_name: String,
    pub last_name: String,
    pub email: Option<String>,
    pub linkedin_url: Option<String>,
}

impl Contact {
    pub fn display_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
            .trim()
            .to_string()
    }
}

/// Confidence tier of a match decision, strongest first.
///
/// `MultipleExact` and `MultipleFuzzy` are terminal ambiguity
/// classifications: they carry no contact id and require manual review.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchConfidence {
    Email,
    Exact,
    Fuzzy,
    MultipleExact,
    MultipleFuzzy,
    Unmatched,
}

impl std::fmt::Display for MatchConfidence {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Email => write!(f, "email"),
            Self::Exact => write!(f, "exact"),
            Self::Fuzzy => write!(f, "fuzzy"),
            Self::MultipleExact => write!(f, "multiple_exact"),
            Self::MultipleFuzzy => write!(f, "multiple_fuzzy"),
            Self::Unmatched => write!(f, "unmatched"),
        }
    }
}

/// The single classified outcome produced for each connection record.
///
/// Invariant: `contact_id` is `Some` only for `Email`, `Exact`, and
/// `Fuzzy` confidence; ambiguous and unmatched outcomes never carry one.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchOutcome {
    pub record: ConnectionRecord,
    pub contact_id: Option<ContactId>,
    pub confidence: MatchConfidence,
    /// Human-readable explanation, always populated; ambiguous outcomes
    /// name every candidate so a reviewer can disambiguate without
    /// re-querying the registry.
    pub notes: String,
}

impl MatchOutcome {
    pub fn is_matched(&self) -> bool {
        self.contact_id.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn confidence_display_is_snake_case() {
        assert_eq!(MatchConfidence::Email.to_string(), "email");
        assert_eq!(MatchConfidence::MultipleExact.to_string(), "multiple_exact");
        assert_eq!(MatchConfidence::Unmatched.to_string(), "unmatched");
    }

    #[test]
    fn confidence_serde_matches_display() {
        for tier in [
            MatchConfidence::Email,
            MatchConfidence::Exact,
            MatchConfidence::Fuzzy,
            MatchConfidence::MultipleExact,
            MatchConfidence::MultipleFuzzy,
            MatchConfidence::Unmatched,
        ] {
            let json = serde_json::to_string(&tier).unwrap();
            assert_eq!(json, format!("\"{}\"", tier));
        }
    }

    #[test]
    fn display_name_trims_missing_last_name() {
        let contact = Contact {
            id: "c1".into(),
            first_name: "Aaron".into(),
            last_name: String::new(),
            email: None,
            linkedin_url: None,
        };
        assert_eq!(contact.display_name(), "Aaron");
    }
}
