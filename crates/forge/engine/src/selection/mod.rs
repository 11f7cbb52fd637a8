//! Mating-pool selection.
//!
//! Tournament selection works on the population directly. Rank-based and
//! fitness-proportionate selection first turn the population into
//! `(probability, candidate)` pairs summing to 1, then sample them with a
//! roulette wheel or stochastic universal sampling.

pub mod proportionate;
pub mod ranking;
pub mod sampling;
pub mod tournament;

pub use proportionate::{signal_scaling, windowing, FitnessWindow};
pub use ranking::rank_based;
pub use sampling::{roulette_wheel, stochastic_universal};
pub use tournament::tournament;

use crate::candidate::Candidate;
use crate::config::{GaConfig, SamplingMethod, ScalingMode, SelectionScheme};
use rand::Rng;

/// Candidates paired with their selection probability.
pub type Weighted<'a> = Vec<(f64, &'a Candidate)>;

/// Errors from selection.
#[derive(Debug, thiserror::Error)]
pub enum SelectionError {
    #[error("population is empty")]
    EmptyPopulation,
    #[error("tournament size {k} exceeds population size {population}")]
    TournamentTooLarge { k: usize, population: usize },
    #[error("mating pool of {pool} needs more eligible candidates than {eligible}")]
    PoolTooLarge { pool: usize, eligible: usize },
    #[error("selective pressure {0} is out of range")]
    InvalidPressure(f64),
}

/// Check that a population of `population` candidates can feed the configured
/// selection, without drawing anything.
pub fn check_feasible(config: &GaConfig, population: usize) -> Result<(), SelectionError> {
    if population == 0 {
        return Err(SelectionError::EmptyPopulation);
    }
    let pool = config.mating_pool_size;
    match (config.selection, config.sampling) {
        (SelectionScheme::Tournament, _) => {
            let k = config.tournament_size;
            if k > population {
                return Err(SelectionError::TournamentTooLarge { k, population });
            }
            // The k-1 worst positions can never win a tournament. The bound
            // counts positions, so with tied fitness it rejects some pools
            // that could be filled; sizes are all that is known before the
            // population is evaluated.
            let eligible = population - k + 1;
            if pool > eligible {
                return Err(SelectionError::PoolTooLarge { pool, eligible });
            }
        }
        (_, SamplingMethod::RouletteWheel) if pool > population => {
            return Err(SelectionError::PoolTooLarge {
                pool,
                eligible: population,
            });
        }
        _ => {}
    }
    Ok(())
}

/// Draw a mating pool according to `config`.
pub fn select_mating_pool<R: Rng + ?Sized>(
    population: &[Candidate],
    config: &GaConfig,
    window: &FitnessWindow,
    rng: &mut R,
) -> Result<Vec<Candidate>, SelectionError> {
    check_feasible(config, population.len())?;
    let pool = config.mating_pool_size;

    let weighted = match config.selection {
        SelectionScheme::Tournament => {
            return tournament(population, config.tournament_size, pool, rng);
        }
        SelectionScheme::RankBased => {
            rank_based(population, config.ranking, config.selective_pressure)?
        }
        SelectionScheme::FitnessProportionate => match config.scaling {
            ScalingMode::SignalScaling => signal_scaling(population, config.scaling_constant),
            ScalingMode::Windowing => windowing(population, window),
        },
    };

    match config.sampling {
        SamplingMethod::RouletteWheel => roulette_wheel(&weighted, pool, rng),
        SamplingMethod::StochasticUniversal => stochastic_universal(&weighted, pool, rng),
    }
}

/// Uniform probabilities, used when a scaling transform leaves nothing to weigh.
pub(crate) fn uniform(population: &[Candidate]) -> Weighted<'_> {
    let p = 1.0 / population.len() as f64;
    population.iter().map(|c| (p, c)).collect()
}

/// Normalize non-negative weights; an all-zero total falls back to uniform.
pub(crate) fn normalize<'a>(weights: Vec<f64>, population: &'a [Candidate]) -> Weighted<'a> {
    let total: f64 = weights.iter().sum();
    if !(total.is_finite() && total > 0.0) {
        return uniform(population);
    }
    weights
        .into_iter()
        .zip(population)
        .map(|(w, c)| (w / total, c))
        .collect()
}
