//! Helpers over plain candidate collections.

use crate::candidate::Candidate;

/// Lowest-fitness candidate; ties go to the first in iteration order.
pub fn best(population: &[Candidate]) -> Option<&Candidate> {
    population.iter().reduce(|best, candidate| {
        if candidate.fitness < best.fitness {
            candidate
        } else {
            best
        }
    })
}

/// Stable sort, best first.
pub fn sort_ascending(population: &mut [Candidate]) {
    population.sort_by(|a, b| a.cmp_fitness(b));
}

/// Stable sort, highest fitness value first.
pub fn sort_descending(population: &mut [Candidate]) {
    population.sort_by(|a, b| b.cmp_fitness(a));
}

/// Finite fitness values, in population order.
pub fn finite_fitness(population: &[Candidate]) -> Vec<f64> {
    population
        .iter()
        .map(|c| c.fitness)
        .filter(|f| f.is_finite())
        .collect()
}

/// Mean over finite fitness values.
pub fn mean_finite_fitness(population: &[Candidate]) -> Option<f64> {
    let finite = finite_fitness(population);
    if finite.is_empty() {
        return None;
    }
    Some(finite.iter().sum::<f64>() / finite.len() as f64)
}

pub fn min_finite_fitness(population: &[Candidate]) -> Option<f64> {
    finite_fitness(population).into_iter().reduce(f64::min)
}
