//! E2E test: realistic cargo message streams through the scorer and the
//! evaluator, including harness failures.

use promptforge_diagnostics::{DiagnosticKind, Scorer, Taxonomy};
use promptforge_engine::{Candidate, Evaluator};
use promptforge_oracle::{FailingHarness, HarnessOutput, ScriptedOracle, SimulatedHarness};
use promptforge_tests::{build_finished, compiler_message, test_summary, uncoded_message};
use std::sync::Arc;

fn compile_failure_stream() -> String {
    [
        "   Compiling linked_list v0.1.0 (/work/linked_list)".to_string(),
        compiler_message("E0308", 12, 17, "mismatched types"),
        compiler_message("E0382", 40, 9, "borrow of moved value: `node`"),
        uncoded_message("2 warnings emitted"),
        "error: could not compile `linked_list` due to 2 previous errors".to_string(),
        build_finished(false),
    ]
    .join("\n")
}

#[test]
fn compile_failure_scores_weighted_sum() {
    let report = Scorer::default().score_stream(&compile_failure_stream());

    assert!(report.signal);
    assert_eq!(report.total_diagnostics(), 2);
    assert_eq!(report.weighted_sum, 18);
    assert_eq!(report.score, 18.0);
    assert_eq!(report.count(DiagnosticKind::TypeMismatch), 1);
    assert_eq!(report.count(DiagnosticKind::MovedValue), 1);

    let first = &report.diagnostics[0];
    assert_eq!((first.line, first.column), (12, 17));
    assert_eq!(first.message, "mismatched types");

    let summary = report.summary();
    assert_eq!(summary.total_errors, 2);
    assert_eq!(summary.errors_by_type.get("Ownership Error"), Some(&1));
}

#[test]
fn test_summaries_replace_diagnostic_score() {
    let stream = [
        compile_failure_stream(),
        test_summary(3, 1),
        "running 2 tests".to_string(),
        test_summary(1, 1),
    ]
    .join("\n");
    let report = Scorer::default().score_stream(&stream);

    assert_eq!(report.passed, 4);
    assert_eq!(report.failed, 2);
    assert_eq!(report.weighted_sum, 18);
    assert!((report.score - 2.0 / 6.0).abs() < 1e-12);
}

#[test]
fn unclassified_codes_use_fallback_weight() {
    let stream = [
        compiler_message("E0603", 1, 5, "function `helper` is private"),
        compiler_message("E0308", 2, 5, "mismatched types"),
    ]
    .join("\n");
    let scorer = Scorer::new(Taxonomy::new().with_fallback_weight(3).with_weight("E0308", 1));
    let report = scorer.score_stream(&stream);

    assert_eq!(report.total_diagnostics(), 2);
    assert_eq!(report.count(DiagnosticKind::Unclassified), 1);
    assert_eq!(report.weighted_sum, 4);
}

#[test]
fn plain_text_output_has_no_signal() {
    let report = Scorer::default().score_stream("error: linker `cc` not found\nnote: ...");
    assert!(!report.signal);
    assert_eq!(report.score, 0.0);
}

#[tokio::test]
async fn evaluator_scores_stdout_and_stderr() {
    let harness = SimulatedHarness::from_fn(|_| HarnessOutput {
        stdout: [
            compiler_message("E0499", 7, 3, "cannot borrow twice"),
            build_finished(true),
        ]
        .join("\n"),
        stderr: test_summary(5, 0),
        exit_code: Some(0),
    });
    let oracle = ScriptedOracle::from_fn(|_| Ok("```rust\nfn main() {}\n```".to_string()));
    let evaluator = Evaluator::new(Arc::new(oracle), Arc::new(harness), Scorer::default());

    let mut candidate = Candidate::seed("implement a linked list");
    let failures = evaluator.evaluate(&mut candidate).await;

    assert_eq!(failures, 0);
    let report = candidate.report.as_ref().unwrap();
    assert_eq!(report.total_diagnostics(), 1);
    assert_eq!(report.passed, 5);
    assert_eq!(candidate.fitness, 0.0);
}

#[tokio::test]
async fn harness_failure_yields_worst_fitness() {
    let oracle = ScriptedOracle::from_fn(|_| Ok("fn main() {}".to_string()));
    let evaluator = Evaluator::new(Arc::new(oracle), Arc::new(FailingHarness), Scorer::default());

    let mut candidate = Candidate::seed("implement a linked list");
    let failures = evaluator.evaluate(&mut candidate).await;

    assert_eq!(failures, 1);
    assert!(candidate.fitness.is_infinite());
    assert!(candidate.is_evaluated());
    assert_eq!(candidate.artifact.as_deref(), Some("fn main() {}"));
}
