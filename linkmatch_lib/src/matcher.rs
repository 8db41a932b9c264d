//! Match strategies, applied in strict priority order.
//!
//! A strategy that finds more than one candidate terminates the match
//! with an ambiguity classification; matching never falls through past
//! an ambiguous result to a weaker strategy, so a weak match can never
//! silently win while a stronger signal was ambiguous.
//!
//! Order:
//! 1. email exact (case-insensitive)
//! 2. exact normalized (first, last) equality
//! 3. fuzzy sub-rules (first applicable sub-rule classifies a candidate)
//! 4. unmatched

use std::fmt;

use crate::index::CandidateIndex;
use crate::normalize::NormalizedName;
use crate::types::{ConnectionRecord, ContactId, MatchConfidence, MatchOutcome};

/// Sub-rule that classified a fuzzy candidate; named in outcome notes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FuzzyRule {
    LastNamePartial,
    FirstNamePartial,
    FirstNameOnly,
    FullNameInField,
}

impl fmt::Display for FuzzyRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::LastNamePartial => write!(f, "last_name_partial"),
            Self::FirstNamePartial => write!(f, "first_name_partial"),
            Self::FirstNameOnly => write!(f, "first_name_only"),
            Self::FullNameInField => write!(f, "full_name_in_field"),
        }
    }
}

/// True when `value` starts with the first three characters of `field`.
/// Character-based, so multi-byte names cannot split a code point.
fn starts_with_prefix(value: &str, field: &str) -> bool {
    let prefix: String = field.chars().take(3).collect();
    value.starts_with(&prefix)
}

/// Classify one candidate against the record under the fuzzy sub-rules.
/// The caller has already ruled out an exact match for this candidate.
fn fuzzy_rule(record: &NormalizedName, candidate: &NormalizedName) -> Option<FuzzyRule> {
    // Same first name, candidate's last name is a 3-char prefix of ours.
    if !candidate.last.is_empty()
        && candidate.first == record.first
        && starts_with_prefix(&record.last, &candidate.last)
    {
        return Some(FuzzyRule::LastNamePartial);
    }
    // Symmetric: same last name, prefix on the first name.
    if !candidate.first.is_empty()
        && candidate.last == record.last
        && starts_with_prefix(&record.first, &candidate.first)
    {
        return Some(FuzzyRule::FirstNamePartial);
    }
    // Single-name registry entries: first name only.
    if candidate.last.is_empty() && !candidate.first.is_empty() && candidate.first == record.first {
        return Some(FuzzyRule::FirstNameOnly);
    }
    // Full name stored in a single registry field.
    if record.full == candidate.first || record.full == candidate.last {
        return Some(FuzzyRule::FullNameInField);
    }
    None
}

fn outcome(
    record: ConnectionRecord,
    contact_id: Option<ContactId>,
    confidence: MatchConfidence,
    notes: String,
) -> MatchOutcome {
    MatchOutcome {
        record,
        contact_id,
        confidence,
        notes,
    }
}

fn candidate_names(index: &CandidateIndex, indices: &[usize]) -> String {
    indices
        .iter()
        .map(|&i| index.get(i).contact.display_name())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Match one connection record against the candidate index.
///
/// Pure function of its inputs: no I/O, no registry mutation, exactly
/// one outcome per record. Malformed input never errors; names that
/// normalize to empty simply fail the name strategies.
pub fn match_record(record: ConnectionRecord, index: &CandidateIndex) -> MatchOutcome {
    let name = NormalizedName::new(&record.first_name, &record.last_name);

    // Strategy 1: email exact match.
    if let Some(email) = record.email.clone() {
        let hits = index.lookup_email(&email);
        if hits.len() == 1 {
            let id = index.get(hits[0]).contact.id.clone();
            let notes = format!("Email match: {}", email.trim());
            return outcome(record, Some(id), MatchConfidence::Email, notes);
        }
        if hits.len() > 1 {
            // Several registry contacts share this email; ambiguous, do
            // not silently pick one.
            let notes = format!(
                "Multiple contacts share email {}: {}",
                email.trim(),
                candidate_names(index, hits)
            );
            return outcome(record, None, MatchConfidence::MultipleExact, notes);
        }
    }

    // Strategies 2 and 3 share one scan over the registry snapshot. A
    // contact that matches exactly is never also a fuzzy candidate.
    let mut exact: Vec<usize> = Vec::new();
    let mut fuzzy: Vec<(usize, FuzzyRule)> = Vec::new();
    if !name.full.is_empty() {
        for (i, entry) in index.contacts().iter().enumerate() {
            if entry.name.first == name.first && entry.name.last == name.last {
                exact.push(i);
            } else if let Some(rule) = fuzzy_rule(&name, &entry.name) {
                fuzzy.push((i, rule));
            }
        }
    }

    // Strategy 2: exact normalized name equality.
    if exact.len() == 1 {
        let entry = index.get(exact[0]);
        let notes = format!("Exact match: {}", entry.contact.display_name());
        let id = entry.contact.id.clone();
        return outcome(record, Some(id), MatchConfidence::Exact, notes);
    }
    if exact.len() > 1 {
        let notes = format!(
            "Multiple exact matches found: {}",
            candidate_names(index, &exact)
        );
        return outcome(record, None, MatchConfidence::MultipleExact, notes);
    }

    // Strategy 3: fuzzy sub-rules, only reached with zero exact hits.
    if fuzzy.len() == 1 {
        let (i, rule) = fuzzy[0];
        let entry = index.get(i);
        let notes = format!("Fuzzy match ({}): {}", rule, entry.contact.display_name());
        let id = entry.contact.id.clone();
        return outcome(record, Some(id), MatchConfidence::Fuzzy, notes);
    }
    if fuzzy.len() > 1 {
        let indices: Vec<usize> = fuzzy.iter().map(|&(i, _)| i).collect();
        let notes = format!("Multiple fuzzy matches: {}", candidate_names(index, &indices));
        return outcome(record, None, MatchConfidence::MultipleFuzzy, notes);
    }

    outcome(
        record,
        None,
        MatchConfidence::Unmatched,
        "No matching contact found".to_string(),
    )
}
