//! Search parameters.

use crate::error::EngineError;
use crate::prompts::PromptTemplates;
use serde::{Deserialize, Serialize};

/// How the mating pool is drawn.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SelectionScheme {
    #[default]
    Tournament,
    /// Rank-based probabilities, then sampling.
    RankBased,
    /// Scaled-fitness probabilities, then sampling.
    FitnessProportionate,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RankingMode {
    #[default]
    Linear,
    Exponential,
}

impl RankingMode {
    /// Whether `s` is a usable selective pressure for this mode.
    pub fn accepts_pressure(&self, s: f64) -> bool {
        match self {
            Self::Linear => s > 1.0 && s <= 2.0,
            Self::Exponential => s.is_finite() && s > 0.0,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScalingMode {
    #[default]
    SignalScaling,
    Windowing,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SamplingMethod {
    #[default]
    RouletteWheel,
    StochasticUniversal,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReplacementPolicy {
    /// Offspring replace the population verbatim.
    General,
    Elitism,
    #[default]
    Gradual,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VariationMode {
    /// One crossover (+ mutation) request per pair.
    #[default]
    Pairwise,
    /// All pairs in one request with delimited replies.
    Batched,
}

/// Genetic-search configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GaConfig {
    /// Generations to run after the initial population
    #[serde(default = "default_generation_limit")]
    pub generation_limit: u32,

    /// Mating pool size
    #[serde(default = "default_mating_pool_size")]
    pub mating_pool_size: usize,

    #[serde(default)]
    pub selection: SelectionScheme,

    /// Tournament size k
    #[serde(default = "default_tournament_size")]
    pub tournament_size: usize,

    #[serde(default)]
    pub ranking: RankingMode,

    /// Selective pressure s for rank-based selection
    #[serde(default = "default_selective_pressure")]
    pub selective_pressure: f64,

    #[serde(default)]
    pub scaling: ScalingMode,

    /// Signal-scaling constant c
    #[serde(default = "default_scaling_constant")]
    pub scaling_constant: f64,

    /// Generations of population minima kept for windowing
    #[serde(default = "default_window_length")]
    pub window_length: usize,

    #[serde(default)]
    pub sampling: SamplingMethod,

    #[serde(default)]
    pub variation: VariationMode,

    /// Advisory mutation rate forwarded to the oracle
    #[serde(default = "default_mutation_rate")]
    pub mutation_rate: f64,

    #[serde(default)]
    pub replacement: ReplacementPolicy,

    /// Fill the initial population up to this size with mutated seeds
    #[serde(default)]
    pub initial_population_size: Option<usize>,

    /// Oracle calls in flight at once
    #[serde(default = "default_concurrency")]
    pub concurrency: usize,

    /// Keep only the first fenced code block of generated replies
    #[serde(default = "default_true")]
    pub extract_code: bool,

    /// RNG seed for reproducible selection
    #[serde(default)]
    pub rng_seed: Option<u64>,

    #[serde(default)]
    pub templates: PromptTemplates,
}

impl Default for GaConfig {
    fn default() -> Self {
        Self {
            generation_limit: default_generation_limit(),
            mating_pool_size: default_mating_pool_size(),
            selection: SelectionScheme::default(),
            tournament_size: default_tournament_size(),
            ranking: RankingMode::default(),
            selective_pressure: default_selective_pressure(),
            scaling: ScalingMode::default(),
            scaling_constant: default_scaling_constant(),
            window_length: default_window_length(),
            sampling: SamplingMethod::default(),
            variation: VariationMode::default(),
            mutation_rate: default_mutation_rate(),
            replacement: ReplacementPolicy::default(),
            initial_population_size: None,
            concurrency: default_concurrency(),
            extract_code: true,
            rng_seed: None,
            templates: PromptTemplates::default(),
        }
    }
}

impl GaConfig {
    pub fn with_generation_limit(mut self, limit: u32) -> Self {
        self.generation_limit = limit;
        self
    }

    pub fn with_mating_pool_size(mut self, size: usize) -> Self {
        self.mating_pool_size = size;
        self
    }

    pub fn with_selection(mut self, selection: SelectionScheme) -> Self {
        self.selection = selection;
        self
    }

    pub fn with_tournament_size(mut self, k: usize) -> Self {
        self.tournament_size = k;
        self
    }

    pub fn with_sampling(mut self, sampling: SamplingMethod) -> Self {
        self.sampling = sampling;
        self
    }

    pub fn with_replacement(mut self, policy: ReplacementPolicy) -> Self {
        self.replacement = policy;
        self
    }

    pub fn with_variation(mut self, mode: VariationMode) -> Self {
        self.variation = mode;
        self
    }

    pub fn with_initial_population_size(mut self, size: usize) -> Self {
        self.initial_population_size = Some(size);
        self
    }

    pub fn with_rng_seed(mut self, seed: u64) -> Self {
        self.rng_seed = Some(seed);
        self
    }

    /// Reject parameter combinations no population could satisfy.
    pub fn validate(&self) -> Result<(), EngineError> {
        if self.mating_pool_size < 2 {
            return Err(EngineError::Config(
                "mating_pool_size must be at least 2 to form a pair".into(),
            ));
        }
        if self.selection == SelectionScheme::Tournament && self.tournament_size == 0 {
            return Err(EngineError::Config("tournament_size must be at least 1".into()));
        }
        if self.selection == SelectionScheme::RankBased
            && !self.ranking.accepts_pressure(self.selective_pressure)
        {
            return Err(EngineError::Config(format!(
                "selective_pressure {} is out of range for {:?} ranking",
                self.selective_pressure, self.ranking
            )));
        }
        if !self.scaling_constant.is_finite() || self.scaling_constant < 0.0 {
            return Err(EngineError::Config(
                "scaling_constant must be a non-negative number".into(),
            ));
        }
        if self.window_length == 0 {
            return Err(EngineError::Config("window_length must be at least 1".into()));
        }
        if !(0.0..=1.0).contains(&self.mutation_rate) {
            return Err(EngineError::Config(
                "mutation_rate must be within [0, 1]".into(),
            ));
        }
        if self.concurrency == 0 {
            return Err(EngineError::Config("concurrency must be at least 1".into()));
        }
        Ok(())
    }
}

// Default value helpers
fn default_true() -> bool {
    true
}

fn default_generation_limit() -> u32 {
    20
}

fn default_mating_pool_size() -> usize {
    20
}

fn default_tournament_size() -> usize {
    4
}

fn default_selective_pressure() -> f64 {
    1.5
}

fn default_scaling_constant() -> f64 {
    2.0
}

fn default_window_length() -> usize {
    5
}

fn default_mutation_rate() -> f64 {
    0.05
}

fn default_concurrency() -> usize {
    4
}
