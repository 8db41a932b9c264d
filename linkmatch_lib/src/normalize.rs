//! Name canonicalization.
//!
//! Every comparison in the matcher runs on names that went through
//! [`normalize_name`], on both the export side and the registry side,
//! so the two cannot drift apart in casing, punctuation, or whitespace.

use std::sync::OnceLock;

use regex::Regex;

/// Characters that are not word characters, whitespace, or hyphen.
/// Unicode classes, so accented letters survive while emoji and
/// punctuation are stripped.
fn non_name_chars() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[^\w\s-]").expect("static pattern compiles"))
}

/// Canonicalize a free-text name field: strip emoji/punctuation,
/// collapse whitespace runs, trim, lowercase. Empty input yields an
/// empty string; this never errors.
pub fn normalize_name(raw: &str) -> String {
    let stripped = non_name_chars().replace_all(raw, "");
    stripped
        .to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Normalized form of a first/last name pair, the only shape the
/// matcher compares on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedName {
    pub first: String,
    pub last: String,
    /// `first last`, with the separator omitted when either side is empty.
    pub full: String,
}

impl NormalizedName {
    pub fn new(first: &str, last: &str) -> Self {
        let first = normalize_name(first);
        let last = normalize_name(last);
        let full = if first.is_empty() {
            last.clone()
        } else if last.is_empty() {
            first.clone()
        } else {
            format!("{} {}", first, last)
        };
        Self { first, last, full }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lowercases_and_trims() {
        assert_eq!(normalize_name("  Jenny LEE  "), "jenny lee");
    }

    #[test]
    fn strips_apostrophes() {
        assert_eq!(normalize_name("O'Brien"), "obrien");
        assert_eq!(normalize_name("obrien"), "obrien");
    }

    #[test]
    fn strips_emoji_and_punctuation() {
        assert_eq!(normalize_name("Sam \u{1F680} Park!!"), "sam park");
        assert_eq!(normalize_name("J. R. Smith"), "j r smith");
    }

    #[test]
    fn keeps_hyphens_and_accents() {
        assert_eq!(normalize_name("Garcia-Lopez"), "garcia-lopez");
        assert_eq!(normalize_name("P\u{00FC}tting"), "p\u{00FC}tting");
    }

    #[test]
    fn collapses_internal_whitespace() {
        assert_eq!(normalize_name("Mary   Jane\tWatson"), "mary jane watson");
    }

    #[test]
    fn empty_input_is_empty() {
        assert_eq!(normalize_name(""), "");
        assert_eq!(normalize_name("   "), "");
        assert_eq!(normalize_name("\u{1F389}"), "");
    }

    #[test]
    fn idempotent() {
        for raw in ["  O'Brien  ", "Sam \u{1F680} Park", "Garcia-Lopez", ""] {
            let once = normalize_name(raw);
            assert_eq!(normalize_name(&once), once);
        }
    }

    #[test]
    fn full_joins_with_single_space() {
        let name = NormalizedName::new(" Jenny ", "Lee");
        assert_eq!(name.full, "jenny lee");
    }

    #[test]
    fn full_omits_separator_for_empty_side() {
        assert_eq!(NormalizedName::new("Aaron", "").full, "aaron");
        assert_eq!(NormalizedName::new("", "Lee").full, "lee");
        assert_eq!(NormalizedName::new("", "").full, "");
    }
}
