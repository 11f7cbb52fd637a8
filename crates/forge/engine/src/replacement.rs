use crate::candidate::Candidate;
use crate::config::ReplacementPolicy;
use crate::population::sort_descending;

/// M for the current population: `floor(|P| / 5)`.
pub fn elite_count(population_len: usize) -> usize {
    population_len / 5
}

/// Merge the current population `P` with offspring `N`.
///
/// For elitism and gradual replacement both sides are sorted by descending
/// fitness value first, with `M = elite_count(|P|)`:
/// - elitism keeps the `M` best of `P` followed by `N` minus its `M` best;
/// - gradual keeps `P` minus its `M` worst followed by the `M` worst of `N`.
///
/// With `M = 0` both keep all of `P` followed by all of `N`.
pub fn replace(
    policy: ReplacementPolicy,
    mut population: Vec<Candidate>,
    mut offspring: Vec<Candidate>,
) -> Vec<Candidate> {
    if policy == ReplacementPolicy::General {
        return offspring;
    }

    sort_descending(&mut population);
    sort_descending(&mut offspring);
    let m = elite_count(population.len());
    if m == 0 {
        population.extend(offspring);
        return population;
    }

    match policy {
        ReplacementPolicy::Elitism => {
            let mut merged = population.split_off(population.len() - m);
            offspring.truncate(offspring.len().saturating_sub(m));
            merged.extend(offspring);
            merged
        }
        _ => {
            let mut merged = population.split_off(m);
            offspring.truncate(m);
            merged.extend(offspring);
            merged
        }
    }
}
