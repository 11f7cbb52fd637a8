//! E2E test: the stop handle ends a search between generations and the
//! partial outcome is still returned.

use promptforge_diagnostics::Scorer;
use promptforge_engine::{GaConfig, PromptEvolution};
use promptforge_oracle::{ScriptedOracle, SimulatedHarness};
use promptforge_tests::mutated_prompt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, OnceLock};

fn config() -> GaConfig {
    GaConfig::default()
        .with_generation_limit(5)
        .with_mating_pool_size(2)
        .with_tournament_size(1)
        .with_rng_seed(3)
}

#[tokio::test]
async fn stop_during_variation_ends_after_current_generation() {
    let slot: Arc<OnceLock<Arc<AtomicBool>>> = Arc::new(OnceLock::new());
    let trigger = slot.clone();
    let oracle = ScriptedOracle::from_fn(move |request| {
        if request.contains("Parent 1:") {
            if let Some(stop) = trigger.get() {
                stop.store(true, Ordering::SeqCst);
            }
            return Ok("crossed child".to_string());
        }
        if let Some(prompt) = mutated_prompt(request) {
            return Ok(format!("{} (mutated)", prompt));
        }
        Ok("fn main() {} // E0599".to_string())
    });

    let mut evolution = PromptEvolution::new(
        config(),
        Arc::new(oracle),
        Arc::new(SimulatedHarness::new()),
        Scorer::default(),
    )
    .unwrap();
    slot.set(evolution.stop_handle()).unwrap();

    let outcome = evolution
        .run(vec!["a".into(), "b".into(), "c".into()])
        .await
        .unwrap();

    assert!(outcome.stopped_early);
    assert_eq!(outcome.history.len(), 1);
    assert_eq!(outcome.metrics.generations_completed, 1);
    assert!(evolution.is_stopped());
}

#[tokio::test]
async fn stop_before_run_returns_initial_population() {
    let oracle = ScriptedOracle::from_fn(|_| Ok("fn main() {}".to_string()));
    let mut evolution = PromptEvolution::new(
        config(),
        Arc::new(oracle),
        Arc::new(SimulatedHarness::new()),
        Scorer::default(),
    )
    .unwrap();
    evolution.stop();

    let outcome = evolution
        .run(vec!["a".into(), "b".into(), "c".into()])
        .await
        .unwrap();
    assert!(outcome.stopped_early);
    assert!(outcome.history.is_empty());
    assert_eq!(outcome.population.len(), 3);
    assert_eq!(outcome.best.fitness, 0.0);
}
