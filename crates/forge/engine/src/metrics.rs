use serde::Serialize;

/// Statistics for one generation.
#[derive(Clone, Debug, Serialize)]
pub struct GenerationStats {
    pub generation: u32,
    /// Best fitness in the population after the generation.
    pub best_fitness: f64,
    /// Mean over finite fitness values.
    pub mean_fitness: Option<f64>,
    pub population_size: usize,
    pub mating_pool_size: usize,
    pub offspring: usize,
    pub variation_failed: bool,
    /// Selection could not run; the population was carried over untouched.
    pub skipped: bool,
}

/// Run-wide counters.
#[derive(Clone, Debug, Default, Serialize)]
pub struct SearchMetrics {
    pub generations_completed: u64,
    pub generations_skipped: u64,
    pub variation_failures: u64,
    pub oracle_failures: u64,
    pub evaluations: u64,
    /// Best-so-far fitness after each generation, initial population first.
    pub best_history: Vec<f64>,
}

impl SearchMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_initial(&mut self, best: f64) {
        self.best_history.push(best);
    }

    pub fn record_generation(&mut self, best_so_far: f64) {
        self.generations_completed += 1;
        self.best_history.push(best_so_far);
    }

    pub fn record_skip(&mut self) {
        self.generations_skipped += 1;
    }

    pub fn record_variation_failure(&mut self) {
        self.variation_failures += 1;
    }

    pub fn record_evaluations(&mut self, evaluated: usize, oracle_failures: usize) {
        self.evaluations += evaluated as u64;
        self.oracle_failures += oracle_failures as u64;
    }

    pub fn record_oracle_failures(&mut self, count: usize) {
        self.oracle_failures += count as u64;
    }

    /// Share of evaluations that hit no oracle failure.
    pub fn oracle_success_rate(&self) -> f64 {
        if self.evaluations == 0 {
            return 1.0;
        }
        let failures = self.oracle_failures.min(self.evaluations);
        (self.evaluations - failures) as f64 / self.evaluations as f64
    }

    /// Whether the best-so-far fitness ever improved after the initial population.
    pub fn improved(&self) -> bool {
        match (self.best_history.first(), self.best_history.last()) {
            (Some(first), Some(last)) => last < first,
            _ => false,
        }
    }
}
