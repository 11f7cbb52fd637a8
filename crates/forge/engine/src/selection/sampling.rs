use super::{SelectionError, Weighted};
use crate::candidate::{Candidate, CandidateId};
use rand::Rng;
use std::collections::HashSet;

/// Index hit by `point` on the cumulative probability walk.
fn walk(weighted: &Weighted<'_>, point: f64) -> usize {
    let last = weighted.len() - 1;
    let mut index = 0;
    let mut cumulative = weighted[0].0;
    while cumulative < point && index < last {
        index += 1;
        cumulative += weighted[index].0;
    }
    index
}

/// Index hit by `point` in [0, 1) when only the candidates with positive
/// probability that are not in `chosen` stay on the wheel.
fn walk_open(
    weighted: &Weighted<'_>,
    chosen: &HashSet<CandidateId>,
    point: f64,
) -> Option<usize> {
    let open: Vec<usize> = (0..weighted.len())
        .filter(|&i| weighted[i].0 > 0.0 && !chosen.contains(&weighted[i].1.id))
        .collect();
    let total: f64 = open.iter().map(|&i| weighted[i].0).sum();
    let target = point * total;
    let mut cumulative = 0.0;
    for &i in &open {
        cumulative += weighted[i].0;
        if cumulative > target {
            return Some(i);
        }
    }
    open.last().copied()
}

/// Roulette-wheel sampling without repeats.
///
/// Each slot draws a uniform number in [0, 1) and walks the cumulative
/// probabilities. A draw landing on a candidate already in the pool is
/// redrawn on the wheel of the remaining candidates.
pub fn roulette_wheel<R: Rng + ?Sized>(
    weighted: &Weighted<'_>,
    pool_size: usize,
    rng: &mut R,
) -> Result<Vec<Candidate>, SelectionError> {
    if weighted.is_empty() {
        return Err(SelectionError::EmptyPopulation);
    }
    let eligible = weighted.iter().filter(|(p, _)| *p > 0.0).count();
    if pool_size > eligible {
        return Err(SelectionError::PoolTooLarge {
            pool: pool_size,
            eligible,
        });
    }

    let mut chosen: HashSet<CandidateId> = HashSet::with_capacity(pool_size);
    let mut pool = Vec::with_capacity(pool_size);

    while pool.len() < pool_size {
        let mut index = walk(weighted, rng.gen::<f64>());
        if weighted[index].0 <= 0.0 || chosen.contains(&weighted[index].1.id) {
            // Only short when the weighted list repeats a candidate.
            index = walk_open(weighted, &chosen, rng.gen::<f64>()).ok_or(
                SelectionError::PoolTooLarge {
                    pool: pool_size,
                    eligible: pool.len(),
                },
            )?;
        }
        let candidate = weighted[index].1;
        chosen.insert(candidate.id);
        pool.push(candidate.clone());
    }

    Ok(pool)
}

/// Stochastic universal sampling.
///
/// One offset drawn from [0, 1/pool_size) followed by `pool_size` equally
/// spaced pointers; each pointer selects exactly one candidate, so repeats
/// are possible.
pub fn stochastic_universal<R: Rng + ?Sized>(
    weighted: &Weighted<'_>,
    pool_size: usize,
    rng: &mut R,
) -> Result<Vec<Candidate>, SelectionError> {
    if weighted.is_empty() {
        return Err(SelectionError::EmptyPopulation);
    }
    if pool_size == 0 {
        return Ok(Vec::new());
    }

    let spacing = 1.0 / pool_size as f64;
    let start = rng.gen_range(0.0..spacing);
    let last = weighted.len() - 1;

    let mut pool = Vec::with_capacity(pool_size);
    let mut index = 0;
    let mut cumulative = weighted[0].0;
    for i in 0..pool_size {
        let pointer = start + i as f64 * spacing;
        while cumulative < pointer && index < last {
            index += 1;
            cumulative += weighted[index].0;
        }
        pool.push(weighted[index].1.clone());
    }

    Ok(pool)
}
