use crate::record::DiagnosticRecord;
use crate::taxonomy::DiagnosticKind;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Aggregate over one evaluation run.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ScoreReport {
    /// Coded diagnostics in stream order.
    pub diagnostics: Vec<DiagnosticRecord>,
    pub counts_by_kind: BTreeMap<DiagnosticKind, usize>,
    /// Sum of the weights of all diagnostics.
    pub weighted_sum: u64,
    pub passed: u32,
    pub failed: u32,
    /// Final comparable score, lower is better.
    pub score: f64,
    /// Whether the run produced at least one parseable line.
    pub signal: bool,
}

impl ScoreReport {
    /// Report for a run that produced nothing usable.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn from_parts(
        diagnostics: Vec<DiagnosticRecord>,
        passed: u32,
        failed: u32,
        signal: bool,
    ) -> Self {
        let mut counts_by_kind = BTreeMap::new();
        let mut weighted_sum = 0u64;
        for record in &diagnostics {
            *counts_by_kind.entry(record.kind).or_insert(0) += 1;
            weighted_sum += u64::from(record.weight);
        }
        let score = final_score(weighted_sum, passed, failed);

        Self {
            diagnostics,
            counts_by_kind,
            weighted_sum,
            passed,
            failed,
            score,
            signal,
        }
    }

    pub fn total_diagnostics(&self) -> usize {
        self.diagnostics.len()
    }

    /// True when a test summary line contributed pass/fail counts.
    pub fn has_test_counts(&self) -> bool {
        self.passed > 0 || self.failed > 0
    }

    pub fn count(&self, kind: DiagnosticKind) -> usize {
        self.counts_by_kind.get(&kind).copied().unwrap_or(0)
    }

    /// Condensed view keyed by kind name.
    pub fn summary(&self) -> ReportSummary {
        let mut errors_by_type = BTreeMap::new();
        for (kind, count) in &self.counts_by_kind {
            *errors_by_type.entry(kind.name().to_string()).or_insert(0) += *count;
        }
        ReportSummary {
            total_errors: self.total_diagnostics(),
            errors_by_type,
            total_score: self.score,
            passed: self.passed,
            failed: self.failed,
        }
    }
}

/// Serializable digest of a [`ScoreReport`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ReportSummary {
    pub total_errors: usize,
    pub errors_by_type: BTreeMap<String, usize>,
    pub total_score: f64,
    pub passed: u32,
    pub failed: u32,
}

/// Final-score rule.
///
/// Without any test counts the weighted diagnostic sum is the score. Once a
/// test summary was observed the failure ratio replaces it entirely.
pub fn final_score(weighted_sum: u64, passed: u32, failed: u32) -> f64 {
    if passed == 0 && failed == 0 {
        weighted_sum as f64
    } else {
        f64::from(failed) / (f64::from(failed) + f64::from(passed))
    }
}
