#![deny(unsafe_code)]
//! # promptforge-engine
//!
//! Evolutionary search over prompts. A population of candidate prompts is
//! evaluated by generating code from each prompt and scoring the compiler
//! diagnostics it produces; each generation draws a mating pool, asks the
//! generation oracle for crossover and mutation, evaluates the offspring and
//! merges them back under a replacement policy.

pub mod candidate;
pub mod config;
pub mod engine;
pub mod error;
pub mod evaluation;
pub mod metrics;
pub mod population;
pub mod prompts;
pub mod replacement;
pub mod selection;
pub mod variation;

pub use candidate::{Candidate, CandidateId, Origin};
pub use config::{
    GaConfig, RankingMode, ReplacementPolicy, SamplingMethod, ScalingMode, SelectionScheme,
    VariationMode,
};
pub use engine::{PromptEvolution, SearchOutcome};
pub use error::EngineError;
pub use evaluation::Evaluator;
pub use metrics::{GenerationStats, SearchMetrics};
pub use prompts::{parse_delimited, PromptTemplates, BEGIN_DELIMITER, END_DELIMITER};
pub use replacement::{elite_count, replace};
pub use selection::{FitnessWindow, SelectionError};
pub use variation::{Variation, VariationOutcome};
