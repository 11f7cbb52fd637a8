use super::{SelectionError, Weighted};
use crate::candidate::Candidate;
use crate::config::RankingMode;

/// Rank-based selection probabilities.
///
/// The population is ordered best first. Linear ranking gives rank `r`
/// (0 = worst, n-1 = best) the probability
/// `(2 - s)/n + 2r(s - 1)/(n(n - 1))` for `s` in (1, 2]. Exponential ranking
/// weighs position `k` from the best by `exp(-s k)`.
pub fn rank_based(
    population: &[Candidate],
    mode: RankingMode,
    s: f64,
) -> Result<Weighted<'_>, SelectionError> {
    if population.is_empty() {
        return Err(SelectionError::EmptyPopulation);
    }
    if !mode.accepts_pressure(s) {
        return Err(SelectionError::InvalidPressure(s));
    }

    let mut ordered: Vec<&Candidate> = population.iter().collect();
    ordered.sort_by(|a, b| a.cmp_fitness(b));

    let n = ordered.len();
    if n == 1 {
        return Ok(vec![(1.0, ordered[0])]);
    }
    let nf = n as f64;

    let weighted = match mode {
        RankingMode::Linear => ordered
            .into_iter()
            .enumerate()
            .map(|(position, candidate)| {
                let rank = (n - 1 - position) as f64;
                let p = (2.0 - s) / nf + 2.0 * rank * (s - 1.0) / (nf * (nf - 1.0));
                (p, candidate)
            })
            .collect(),
        RankingMode::Exponential => {
            let weights: Vec<f64> = (0..n).map(|k| (-s * k as f64).exp()).collect();
            let total: f64 = weights.iter().sum();
            weights
                .into_iter()
                .zip(ordered)
                .map(|(w, candidate)| (w / total, candidate))
                .collect()
        }
    };
    Ok(weighted)
}
