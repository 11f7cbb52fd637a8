use super::SelectionError;
use crate::candidate::{Candidate, CandidateId};
use rand::seq::index;
use rand::Rng;
use std::collections::HashSet;

/// Tournament selection.
///
/// Each round draws `k` distinct candidates uniformly without replacement and
/// keeps the lowest-fitness one (the first drawn on ties). When the winner is
/// already in the pool the round is redrawn among the candidates not yet
/// selected, so every round adds one candidate and the pool holds `pool_size`
/// distinct candidates.
pub fn tournament<R: Rng + ?Sized>(
    population: &[Candidate],
    k: usize,
    pool_size: usize,
    rng: &mut R,
) -> Result<Vec<Candidate>, SelectionError> {
    if population.is_empty() {
        return Err(SelectionError::EmptyPopulation);
    }
    if k == 0 || k > population.len() {
        return Err(SelectionError::TournamentTooLarge {
            k,
            population: population.len(),
        });
    }
    let eligible = population.len() - k + 1;
    if pool_size > eligible {
        return Err(SelectionError::PoolTooLarge {
            pool: pool_size,
            eligible,
        });
    }

    let everyone: Vec<usize> = (0..population.len()).collect();
    let mut chosen: HashSet<CandidateId> = HashSet::with_capacity(pool_size);
    let mut pool = Vec::with_capacity(pool_size);

    while pool.len() < pool_size {
        let mut winner = contest(population, &everyone, k, rng);
        if winner.map_or(true, |i| chosen.contains(&population[i].id)) {
            let open: Vec<usize> = everyone
                .iter()
                .copied()
                .filter(|&i| !chosen.contains(&population[i].id))
                .collect();
            // Only short when the population repeats a candidate.
            if open.len() < k {
                return Err(SelectionError::PoolTooLarge {
                    pool: pool_size,
                    eligible: pool.len(),
                });
            }
            winner = contest(population, &open, k, rng);
        }

        if let Some(i) = winner {
            chosen.insert(population[i].id);
            pool.push(population[i].clone());
        }
    }

    Ok(pool)
}

/// Index of the winner among `k` entrants drawn from `entrants`.
fn contest<R: Rng + ?Sized>(
    population: &[Candidate],
    entrants: &[usize],
    k: usize,
    rng: &mut R,
) -> Option<usize> {
    index::sample(rng, entrants.len(), k)
        .iter()
        .map(|i| entrants[i])
        .reduce(|best, i| {
            if population[i].fitness < population[best].fitness {
                i
            } else {
                best
            }
        })
}
