use chrono::{DateTime, Utc};
use crate::candidate::{Candidate, Origin};
use crate::config::GaConfig;
use crate::error::EngineError;
use crate::evaluation::Evaluator;
use crate::metrics::{GenerationStats, SearchMetrics};
use crate::population::{best, mean_finite_fitness, min_finite_fitness};
use crate::replacement::replace;
use crate::selection::{check_feasible, select_mating_pool, FitnessWindow};
use crate::variation::Variation;
use futures::future::join_all;
use promptforge_diagnostics::Scorer;
use promptforge_oracle::{GenerationOracle, TestHarness};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::Serialize;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Result of a search run.
#[derive(Clone, Debug, Serialize)]
pub struct SearchOutcome {
    /// Best candidate observed across all generations.
    pub best: Candidate,
    pub history: Vec<GenerationStats>,
    pub metrics: SearchMetrics,
    /// Population after the last generation.
    pub population: Vec<Candidate>,
    /// The stop handle ended the run before the generation limit.
    pub stopped_early: bool,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

/// The generational loop: seed, then select, vary, evaluate, replace and
/// track the best candidate for a fixed number of generations.
///
/// The loop owns the population and the best-so-far candidate. Oracle
/// failures only degrade fitness; they never end a run.
pub struct PromptEvolution {
    config: GaConfig,
    evaluator: Evaluator,
    variation: Variation,
    rng: StdRng,
    stop: Arc<AtomicBool>,
}

impl PromptEvolution {
    pub fn new(
        config: GaConfig,
        oracle: Arc<dyn GenerationOracle>,
        harness: Arc<dyn TestHarness>,
        scorer: Scorer,
    ) -> Result<Self, EngineError> {
        config.validate()?;

        let evaluator = Evaluator::new(oracle.clone(), harness, scorer)
            .with_code_extraction(config.extract_code)
            .with_concurrency(config.concurrency);
        let variation = Variation::new(oracle, config.templates.clone(), config.mutation_rate)
            .with_concurrency(config.concurrency);
        let rng = match config.rng_seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        Ok(Self {
            config,
            evaluator,
            variation,
            rng,
            stop: Arc::new(AtomicBool::new(false)),
        })
    }

    pub fn config(&self) -> &GaConfig {
        &self.config
    }

    /// Handle checked between generations; setting it ends the run early.
    pub fn stop_handle(&self) -> Arc<AtomicBool> {
        self.stop.clone()
    }

    pub fn stop(&self) {
        self.stop.store(true, Ordering::SeqCst);
    }

    pub fn is_stopped(&self) -> bool {
        self.stop.load(Ordering::SeqCst)
    }

    /// Seeds, plus mutated copies of them up to the configured initial size.
    async fn initial_population(
        &self,
        seeds: Vec<String>,
        metrics: &mut SearchMetrics,
    ) -> Vec<Candidate> {
        let mut population: Vec<Candidate> = seeds.into_iter().map(Candidate::seed).collect();
        let target = self.config.initial_population_size.unwrap_or(0);
        let missing = target.saturating_sub(population.len());
        if missing == 0 {
            return population;
        }

        let parents: Vec<usize> = (0..missing).map(|i| i % population.len()).collect();
        let mut mutants = Vec::with_capacity(missing);
        for chunk in parents.chunks(self.config.concurrency) {
            let replies = join_all(
                chunk
                    .iter()
                    .map(|&p| self.variation.mutate(&population[p].prompt)),
            )
            .await;
            for (&p, reply) in chunk.iter().zip(replies) {
                match reply {
                    Ok(prompt) => mutants.push(Candidate::new(
                        prompt,
                        Origin::SeedMutation {
                            parent: population[p].id,
                        },
                        0,
                    )),
                    Err(e) => {
                        warn!(error = %e, "seed mutation failed");
                        metrics.record_oracle_failures(1);
                    }
                }
            }
        }

        debug!(seeds = population.len(), mutants = mutants.len(), "initial population expanded");
        population.extend(mutants);
        population
    }

    /// Run the search from the given seed prompts.
    pub async fn run(&mut self, seeds: Vec<String>) -> Result<SearchOutcome, EngineError> {
        if seeds.is_empty() {
            return Err(EngineError::EmptySeeds);
        }
        let started_at = Utc::now();
        let mut metrics = SearchMetrics::new();
        let mut history = Vec::new();
        let mut window = FitnessWindow::new(self.config.window_length);

        // Initial population
        let mut population = self.initial_population(seeds, &mut metrics).await;
        let failures = self.evaluator.evaluate_batch(&mut population).await;
        metrics.record_evaluations(population.len(), failures);

        if self.config.generation_limit > 0 {
            check_feasible(&self.config, population.len())?;
        }

        let mut best_so_far = match best(&population) {
            Some(candidate) => candidate.clone(),
            None => return Err(EngineError::EmptySeeds),
        };
        if let Some(minimum) = min_finite_fitness(&population) {
            window.record(minimum);
        }
        metrics.record_initial(best_so_far.fitness);
        info!(
            population = population.len(),
            best = best_so_far.fitness,
            "initial population evaluated"
        );

        let mut stopped_early = false;
        for generation in 1..=self.config.generation_limit {
            if self.is_stopped() {
                info!(generation, "stop requested, ending search");
                stopped_early = true;
                break;
            }

            let mut stats = GenerationStats {
                generation,
                best_fitness: f64::INFINITY,
                mean_fitness: None,
                population_size: population.len(),
                mating_pool_size: 0,
                offspring: 0,
                variation_failed: false,
                skipped: false,
            };

            // Select
            match select_mating_pool(&population, &self.config, &window, &mut self.rng) {
                Ok(pool) => {
                    stats.mating_pool_size = pool.len();

                    // Vary
                    let outcome = self
                        .variation
                        .vary(self.config.variation, &pool, generation)
                        .await;
                    metrics.record_oracle_failures(outcome.oracle_failures);

                    if outcome.failed() {
                        warn!(generation, "variation produced no offspring, keeping population");
                        metrics.record_variation_failure();
                        stats.variation_failed = true;
                    } else {
                        let mut offspring = outcome.offspring;
                        let failures = self.evaluator.evaluate_batch(&mut offspring).await;
                        metrics.record_evaluations(offspring.len(), failures);
                        stats.offspring = offspring.len();

                        // Replace
                        population = replace(
                            self.config.replacement,
                            std::mem::take(&mut population),
                            offspring,
                        );
                    }
                }
                Err(e) => {
                    warn!(generation, error = %e, "selection cannot run, skipping generation");
                    metrics.record_skip();
                    stats.skipped = true;
                }
            }

            // Track the best candidate
            if let Some(candidate) = best(&population) {
                if candidate.fitness < best_so_far.fitness {
                    best_so_far = candidate.clone();
                }
                stats.best_fitness = candidate.fitness;
            }
            if let Some(minimum) = min_finite_fitness(&population) {
                window.record(minimum);
            }
            stats.mean_fitness = mean_finite_fitness(&population);
            stats.population_size = population.len();
            metrics.record_generation(best_so_far.fitness);

            info!(
                generation,
                best = best_so_far.fitness,
                population = population.len(),
                offspring = stats.offspring,
                "generation complete"
            );
            history.push(stats);
        }

        Ok(SearchOutcome {
            best: best_so_far,
            history,
            metrics,
            population,
            stopped_early,
            started_at,
            finished_at: Utc::now(),
        })
    }
}
