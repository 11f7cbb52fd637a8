//! E2E test: seeds -> expansion -> selection -> variation -> evaluation -> replacement.
//!
//! Runs the full generational loop against a scripted oracle and the
//! simulated cargo harness and checks that cleaner offspring win.

use promptforge_diagnostics::Scorer;
use promptforge_engine::{GaConfig, Origin, PromptEvolution, ReplacementPolicy};
use promptforge_oracle::SimulatedHarness;
use promptforge_tests::search_oracle;
use std::sync::Arc;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn evolution(config: GaConfig) -> PromptEvolution {
    PromptEvolution::new(
        config,
        Arc::new(search_oracle()),
        Arc::new(SimulatedHarness::new()),
        Scorer::default(),
    )
    .unwrap()
}

fn seeds() -> Vec<String> {
    vec!["seed alpha".into(), "seed beta".into()]
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[tokio::test]
async fn gradual_search_finds_clean_offspring() {
    let config = GaConfig::default()
        .with_generation_limit(3)
        .with_mating_pool_size(3)
        .with_tournament_size(2)
        .with_initial_population_size(8)
        .with_rng_seed(11);
    let outcome = evolution(config).run(seeds()).await.unwrap();

    // Seeds and their mutants all produce one E0308.
    assert_eq!(outcome.metrics.best_history[0], 8.0);

    assert_eq!(outcome.best.fitness, 0.0);
    assert_eq!(outcome.best.prompt, "crossed child (mutated)");
    assert!(matches!(outcome.best.origin, Origin::Crossover { .. }));
    assert_eq!(outcome.best.artifact.as_deref(), Some("fn main() {}"));
    let report = outcome.best.report.as_ref().unwrap();
    assert_eq!(report.passed, 1);
    assert_eq!(report.failed, 0);

    assert_eq!(outcome.history.len(), 3);
    assert!(outcome.history.iter().all(|s| s.population_size == 8));
    assert!(outcome.history.iter().all(|s| s.mating_pool_size == 3));
    assert!(outcome.history.iter().all(|s| s.offspring == 3));
    assert!(outcome.metrics.improved());
    assert!(!outcome.stopped_early);
}

#[tokio::test]
async fn best_so_far_never_regresses() {
    let config = GaConfig::default()
        .with_generation_limit(4)
        .with_mating_pool_size(2)
        .with_tournament_size(2)
        .with_initial_population_size(5)
        .with_replacement(ReplacementPolicy::Elitism)
        .with_rng_seed(5);
    let outcome = evolution(config).run(seeds()).await.unwrap();

    let history = &outcome.metrics.best_history;
    assert_eq!(history.len(), 5);
    assert!(history.windows(2).all(|w| w[1] <= w[0]));
    assert_eq!(*history.last().unwrap(), outcome.best.fitness);
}

#[tokio::test]
async fn expanded_population_records_seed_parents() {
    let config = GaConfig::default()
        .with_generation_limit(0)
        .with_initial_population_size(6);
    let outcome = evolution(config).run(seeds()).await.unwrap();

    assert_eq!(outcome.population.len(), 6);
    let mutants: Vec<_> = outcome
        .population
        .iter()
        .filter(|c| matches!(c.origin, Origin::SeedMutation { .. }))
        .collect();
    assert_eq!(mutants.len(), 4);
    assert!(mutants.iter().all(|c| c.prompt.ends_with("(mutated)")));
    assert!(outcome.population.iter().all(|c| c.is_evaluated()));
}

#[tokio::test]
async fn single_seed_without_generations_is_returned() {
    let outcome = evolution(GaConfig::default().with_generation_limit(0))
        .run(vec!["seed only".into()])
        .await
        .unwrap();
    assert_eq!(outcome.best.prompt, "seed only");
    assert_eq!(outcome.best.fitness, 8.0);
    assert!(outcome.history.is_empty());
    assert_eq!(outcome.metrics.evaluations, 1);
}
