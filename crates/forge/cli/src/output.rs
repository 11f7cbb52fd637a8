//! Output formatting utilities

use promptforge_diagnostics::ScoreReport;
use promptforge_engine::SearchOutcome;
use serde::Serialize;

/// Output format for CLI commands
#[derive(Debug, Clone, Copy, Default, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable summary
    #[default]
    Text,
    /// JSON format
    Json,
}

/// Print a single item as pretty JSON.
pub fn print_json<T: Serialize>(data: &T) -> Result<(), serde_json::Error> {
    println!("{}", serde_json::to_string_pretty(data)?);
    Ok(())
}

/// Render a score report as text.
pub fn render_report(report: &ScoreReport) -> String {
    let mut out = String::new();
    for record in &report.diagnostics {
        out.push_str(&format!("{}\n", record));
    }
    let summary = report.summary();
    out.push_str(&format!("Total errors: {}\n", summary.total_errors));
    for (name, count) in &summary.errors_by_type {
        out.push_str(&format!("  {}: {}\n", name, count));
    }
    if report.has_test_counts() {
        out.push_str(&format!(
            "Tests: {} passed, {} failed\n",
            summary.passed, summary.failed
        ));
    }
    out.push_str(&format!("Score: {}\n", fmt_fitness(summary.total_score)));
    out
}

/// Render a search outcome as text.
pub fn render_outcome(outcome: &SearchOutcome) -> String {
    let mut out = String::new();
    out.push_str("gen  best        mean        pop  pool  offspring\n");
    for stats in &outcome.history {
        let note = if stats.skipped {
            "  (skipped)"
        } else if stats.variation_failed {
            "  (variation failed)"
        } else {
            ""
        };
        out.push_str(&format!(
            "{:<4} {:<11} {:<11} {:<4} {:<5} {}{}\n",
            stats.generation,
            fmt_fitness(stats.best_fitness),
            stats.mean_fitness.map(fmt_fitness).unwrap_or_else(|| "-".into()),
            stats.population_size,
            stats.mating_pool_size,
            stats.offspring,
            note,
        ));
    }

    let best = &outcome.best;
    out.push_str(&format!(
        "\nBest fitness: {} (generation {})\n",
        fmt_fitness(best.fitness),
        best.generation
    ));
    out.push_str(&format!(
        "Evaluations: {}, oracle success rate: {:.2}\n",
        outcome.metrics.evaluations,
        outcome.metrics.oracle_success_rate()
    ));
    let elapsed = outcome.finished_at - outcome.started_at;
    out.push_str(&format!("Run time: {}s\n", elapsed.num_seconds()));
    if outcome.stopped_early {
        out.push_str("Stopped before the generation limit\n");
    }
    out.push_str(&format!("\nBest prompt:\n{}\n", best.prompt));
    if let Some(artifact) = &best.artifact {
        out.push_str(&format!("\nGenerated code:\n{}\n", artifact));
    }
    out
}

fn fmt_fitness(value: f64) -> String {
    if value.is_finite() {
        format!("{:.4}", value)
    } else {
        "inf".to_string()
    }
}
