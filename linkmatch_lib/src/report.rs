//! Aggregation of match outcomes for one import batch.
//!
//! A fold over the outcome stream; no shared mutable state, so callers
//! are free to produce outcomes in parallel and aggregate afterwards.

use serde::Serialize;

use crate::types::{MatchConfidence, MatchOutcome};

/// Outcome count per confidence tier.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
pub struct TierCounts {
    pub email: usize,
    pub exact: usize,
    pub fuzzy: usize,
    pub multiple_exact: usize,
    pub multiple_fuzzy: usize,
    pub unmatched: usize,
}

impl TierCounts {
    pub fn record(&mut self, confidence: MatchConfidence) {
        match confidence {
            MatchConfidence::Email => self.email += 1,
            MatchConfidence::Exact => self.exact += 1,
            MatchConfidence::Fuzzy => self.fuzzy += 1,
            MatchConfidence::MultipleExact => self.multiple_exact += 1,
            MatchConfidence::MultipleFuzzy => self.multiple_fuzzy += 1,
            MatchConfidence::Unmatched => self.unmatched += 1,
        }
    }

    /// Outcomes that need manual review before they could be accepted.
    pub fn ambiguous(&self) -> usize {
        self.multiple_exact + self.multiple_fuzzy
    }

    pub fn total(&self) -> usize {
        self.email + self.exact + self.fuzzy + self.multiple_exact + self.multiple_fuzzy
            + self.unmatched
    }
}

/// Per-tier counts plus the matched/unmatched partitions of a batch,
/// both preserving input order.
///
/// Ambiguous outcomes land in `unmatched` alongside true non-matches:
/// they must surface for manual review and are never treated as
/// accepted, even though their notes differ.
#[derive(Debug, Serialize)]
pub struct ResolutionReport {
    pub total: usize,
    pub counts: TierCounts,
    pub matched: Vec<MatchOutcome>,
    pub unmatched: Vec<MatchOutcome>,
}

impl ResolutionReport {
    pub fn from_outcomes(outcomes: &[MatchOutcome]) -> Self {
        let mut counts = TierCounts::default();
        let mut matched = Vec::new();
        let mut unmatched = Vec::new();
        for outcome in outcomes {
            counts.record(outcome.confidence);
            if outcome.is_matched() {
                matched.push(outcome.clone());
            } else {
                unmatched.push(outcome.clone());
            }
        }
        Self {
            total: outcomes.len(),
            counts,
            matched,
            unmatched,
        }
    }
}
