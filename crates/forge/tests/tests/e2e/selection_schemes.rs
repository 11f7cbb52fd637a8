//! E2E test: non-default selection, sampling, variation and replacement
//! combinations drive a complete search.

use promptforge_diagnostics::Scorer;
use promptforge_engine::{
    GaConfig, Origin, PromptEvolution, ReplacementPolicy, SamplingMethod, ScalingMode,
    SelectionScheme, VariationMode, BEGIN_DELIMITER, END_DELIMITER,
};
use promptforge_oracle::{ScriptedOracle, SimulatedHarness};
use promptforge_tests::search_oracle;
use std::sync::Arc;

fn seeds(n: usize) -> Vec<String> {
    (1..=n).map(|i| format!("seed {}", i)).collect()
}

/// Answers batched requests with one child per listed pair, at most two,
/// and generates code otherwise.
fn batched_oracle() -> ScriptedOracle {
    ScriptedOracle::from_fn(|request| {
        if request.contains(BEGIN_DELIMITER) {
            let children = request.matches("Parent 1: ").count().min(2);
            return Ok((1..=children)
                .map(|i| format!("{}crossed {}{}", BEGIN_DELIMITER, i, END_DELIMITER))
                .collect::<Vec<_>>()
                .join("\n"));
        }
        if request.starts_with("seed") {
            Ok("fn main() {} // E0382".to_string())
        } else {
            Ok("fn main() {}".to_string())
        }
    })
}

#[tokio::test]
async fn rank_based_sus_with_batched_elitism() {
    let mut config = GaConfig::default()
        .with_selection(SelectionScheme::RankBased)
        .with_sampling(SamplingMethod::StochasticUniversal)
        .with_variation(VariationMode::Batched)
        .with_replacement(ReplacementPolicy::Elitism)
        .with_mating_pool_size(3)
        .with_generation_limit(2)
        .with_rng_seed(42);
    // Near-uniform ranks: no candidate covers two of the three SUS pointers.
    config.selective_pressure = 1.05;

    let mut evolution = PromptEvolution::new(
        config,
        Arc::new(batched_oracle()),
        Arc::new(SimulatedHarness::new()),
        Scorer::default(),
    )
    .unwrap();
    let outcome = evolution.run(seeds(5)).await.unwrap();

    assert_eq!(outcome.metrics.best_history[0], 10.0);
    assert_eq!(outcome.best.fitness, 0.0);
    assert_eq!(outcome.best.origin, Origin::Batched);

    // 5 parents, M = 1: the best parent plus the children minus the best one.
    assert_eq!(outcome.history[0].offspring, 2);
    assert_eq!(outcome.history[0].population_size, 2);
    // A pool of 3 drawn from 2 repeats one parent, leaving a single pair.
    assert_eq!(outcome.history[1].mating_pool_size, 3);
    assert_eq!(outcome.history[1].offspring, 1);
    // 2 parents, M = 0: parents and children are merged.
    assert_eq!(outcome.history[1].population_size, 3);
    assert_eq!(outcome.metrics.variation_failures, 0);
}

#[tokio::test]
async fn proportionate_general_replacement_skips_when_population_shrinks() {
    let mut config = GaConfig::default()
        .with_selection(SelectionScheme::FitnessProportionate)
        .with_replacement(ReplacementPolicy::General)
        .with_mating_pool_size(2)
        .with_generation_limit(2)
        .with_rng_seed(7);
    config.scaling = ScalingMode::SignalScaling;

    let mut evolution = PromptEvolution::new(
        config,
        Arc::new(search_oracle()),
        Arc::new(SimulatedHarness::new()),
        Scorer::default(),
    )
    .unwrap();
    let outcome = evolution.run(seeds(4)).await.unwrap();

    // One pair, one child; the child replaces the whole population.
    assert_eq!(outcome.history[0].offspring, 1);
    assert_eq!(outcome.history[0].population_size, 1);
    assert_eq!(outcome.best.fitness, 0.0);

    // A roulette pool of 2 cannot be drawn from one candidate.
    assert!(outcome.history[1].skipped);
    assert_eq!(outcome.metrics.generations_skipped, 1);
    assert_eq!(outcome.population.len(), 1);
}

#[tokio::test]
async fn windowing_selection_runs_to_completion() {
    let mut config = GaConfig::default()
        .with_selection(SelectionScheme::FitnessProportionate)
        .with_sampling(SamplingMethod::StochasticUniversal)
        .with_mating_pool_size(3)
        .with_initial_population_size(6)
        .with_generation_limit(3)
        .with_rng_seed(19);
    config.scaling = ScalingMode::Windowing;
    config.window_length = 2;

    let mut evolution = PromptEvolution::new(
        config,
        Arc::new(search_oracle()),
        Arc::new(SimulatedHarness::new()),
        Scorer::default(),
    )
    .unwrap();
    let outcome = evolution.run(seeds(2)).await.unwrap();

    assert_eq!(outcome.history.len(), 3);
    assert!(outcome.history.iter().all(|s| !s.skipped && !s.variation_failed));
    assert!(outcome.history.iter().all(|s| s.population_size == 6));
    assert_eq!(outcome.best.fitness, 0.0);
}
