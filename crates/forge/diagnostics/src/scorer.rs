use crate::record::DiagnosticRecord;
use crate::report::ScoreReport;
use crate::taxonomy::Taxonomy;
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;
use std::fmt::Display;
use tracing::{debug, warn};

static TEST_SUMMARY_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(\d+)\s+passed;\s+(\d+)\s+failed;").expect("invalid test summary regex")
});

/// What a single stream line turned out to be.
#[derive(Clone, Debug, PartialEq)]
pub enum LineKind {
    /// A coded compiler message.
    Diagnostic(DiagnosticRecord),
    /// Structured output that carries nothing to score.
    Structured,
    /// A `<N> passed; <M> failed;` test summary.
    TestSummary { passed: u32, failed: u32 },
    /// Anything else.
    Noise,
}

/// Turns a compiler/test-runner message stream into a [`ScoreReport`].
///
/// Pure: the scorer never runs a process or talks to an oracle.
#[derive(Clone, Debug, Default)]
pub struct Scorer {
    taxonomy: Taxonomy,
}

impl Scorer {
    pub fn new(taxonomy: Taxonomy) -> Self {
        Self { taxonomy }
    }

    pub fn taxonomy(&self) -> &Taxonomy {
        &self.taxonomy
    }

    /// Classify one line of the stream.
    pub fn classify_line(&self, line: &str) -> LineKind {
        match serde_json::from_str::<Value>(line) {
            Ok(Value::Object(object)) => self
                .compiler_message(&object)
                .map(LineKind::Diagnostic)
                .unwrap_or(LineKind::Structured),
            _ => Self::test_summary(line)
                .map(|(passed, failed)| LineKind::TestSummary { passed, failed })
                .unwrap_or(LineKind::Noise),
        }
    }

    /// Score a whole newline-separated stream.
    pub fn score_stream(&self, stream: &str) -> ScoreReport {
        self.score_lines(stream.lines())
    }

    pub fn score_lines<'a, I>(&self, lines: I) -> ScoreReport
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut diagnostics = Vec::new();
        let mut passed = 0u32;
        let mut failed = 0u32;
        let mut signal = false;

        for line in lines {
            match self.classify_line(line) {
                LineKind::Diagnostic(record) => {
                    debug!(code = %record.code, weight = record.weight, "diagnostic");
                    diagnostics.push(record);
                    signal = true;
                }
                LineKind::Structured => signal = true,
                LineKind::TestSummary {
                    passed: p,
                    failed: f,
                } => {
                    // cargo prints one summary per test binary.
                    passed = passed.saturating_add(p);
                    failed = failed.saturating_add(f);
                    signal = true;
                }
                LineKind::Noise => {}
            }
        }

        ScoreReport::from_parts(diagnostics, passed, failed, signal)
    }

    /// Score the outcome of a process invocation; a failed invocation yields
    /// an empty report.
    pub fn score_outcome<E: Display>(&self, outcome: Result<&str, E>) -> ScoreReport {
        match outcome {
            Ok(stream) => self.score_stream(stream),
            Err(e) => {
                warn!(error = %e, "harness invocation failed, reporting empty score");
                ScoreReport::empty()
            }
        }
    }

    fn compiler_message(
        &self,
        object: &serde_json::Map<String, Value>,
    ) -> Option<DiagnosticRecord> {
        if object.get("reason").and_then(Value::as_str) != Some("compiler-message") {
            return None;
        }
        let message = object.get("message")?;
        let code = message
            .get("code")
            .and_then(|c| c.get("code"))
            .and_then(Value::as_str)?;

        let span = message
            .get("spans")
            .and_then(Value::as_array)
            .and_then(|spans| spans.first());
        let position = |field: &str| {
            span.and_then(|s| s.get(field))
                .and_then(Value::as_u64)
                .and_then(|v| u32::try_from(v).ok())
                .unwrap_or(0)
        };

        let kind = self.taxonomy.classify(code);
        Some(DiagnosticRecord {
            line: position("line_start"),
            column: position("column_start"),
            message: message
                .get("message")
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string(),
            code: code.to_string(),
            kind,
            weight: self.taxonomy.weight(kind),
        })
    }

    fn test_summary(line: &str) -> Option<(u32, u32)> {
        let captures = TEST_SUMMARY_RE.captures(line)?;
        let passed = captures.get(1)?.as_str().parse().ok()?;
        let failed = captures.get(2)?.as_str().parse().ok()?;
        Some((passed, failed))
    }
}
