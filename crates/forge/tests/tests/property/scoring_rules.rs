//! Property tests: the final-score rule holds for arbitrary mixtures of
//! diagnostics, test summaries and free-form noise.

use promptforge_diagnostics::{final_score, DiagnosticKind, Scorer, Taxonomy};
use promptforge_tests::{compiler_message, test_summary};
use proptest::prelude::*;

fn arb_code() -> impl Strategy<Value = String> {
    prop_oneof![
        4 => prop::sample::select(
            DiagnosticKind::CLASSIFIED
                .iter()
                .filter_map(|k| k.code())
                .collect::<Vec<_>>()
        )
        .prop_map(str::to_string),
        1 => "E9[0-9]{3}",
    ]
}

/// Lines that are neither JSON objects nor test summaries.
fn arb_noise() -> impl Strategy<Value = String> {
    "[a-z :`]{0,40}"
}

fn arb_stream() -> impl Strategy<Value = (Vec<String>, Vec<String>, Option<(u32, u32)>)> {
    (
        prop::collection::vec(arb_code(), 0..12),
        prop::collection::vec(arb_noise(), 0..8),
        prop::option::of((0u32..50, 0u32..50).prop_filter("some tests ran", |(p, f)| p + f > 0)),
    )
}

proptest! {
    #[test]
    fn score_follows_final_score_rule((codes, noise, summary) in arb_stream()) {
        let mut lines: Vec<String> = codes
            .iter()
            .enumerate()
            .map(|(i, code)| compiler_message(code, i as u64 + 1, 1, "error"))
            .collect();
        lines.extend(noise);
        if let Some((passed, failed)) = summary {
            lines.push(test_summary(passed, failed));
        }

        let taxonomy = Taxonomy::new().with_fallback_weight(1);
        let expected_sum: u64 = codes
            .iter()
            .map(|c| u64::from(taxonomy.weight(taxonomy.classify(c))))
            .sum();
        let report = Scorer::new(taxonomy).score_lines(lines.iter().map(String::as_str));

        prop_assert_eq!(report.total_diagnostics(), codes.len());
        prop_assert_eq!(report.weighted_sum, expected_sum);
        match summary {
            None => prop_assert_eq!(report.score, expected_sum as f64),
            Some((passed, failed)) => {
                let ratio = f64::from(failed) / f64::from(passed + failed);
                prop_assert!((report.score - ratio).abs() < 1e-12);
                prop_assert!((0.0..=1.0).contains(&report.score));
            }
        }
    }

    #[test]
    fn noise_alone_has_no_signal(noise in prop::collection::vec(arb_noise(), 0..20)) {
        let report = Scorer::default().score_lines(noise.iter().map(String::as_str));
        prop_assert!(!report.signal);
        prop_assert_eq!(report.total_diagnostics(), 0);
        prop_assert_eq!(report.score, 0.0);
    }

    #[test]
    fn final_score_is_never_negative(
        sum in any::<u32>(),
        passed in any::<u16>(),
        failed in any::<u16>(),
    ) {
        let score = final_score(u64::from(sum), u32::from(passed), u32::from(failed));
        prop_assert!(score >= 0.0);
        if passed == 0 && failed == 0 {
            prop_assert_eq!(score, f64::from(sum));
        } else {
            prop_assert!(score <= 1.0);
        }
    }
}
