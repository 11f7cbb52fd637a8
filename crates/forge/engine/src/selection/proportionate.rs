use super::{normalize, uniform, Weighted};
use crate::candidate::Candidate;
use std::collections::VecDeque;

/// Trailing minima of population fitness, oldest first.
#[derive(Clone, Debug)]
pub struct FitnessWindow {
    capacity: usize,
    minima: VecDeque<f64>,
}

impl FitnessWindow {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(1),
            minima: VecDeque::new(),
        }
    }

    /// Record one generation's minimum; non-finite values are ignored.
    pub fn record(&mut self, minimum: f64) {
        if !minimum.is_finite() {
            return;
        }
        self.minima.push_back(minimum);
        while self.minima.len() > self.capacity {
            self.minima.pop_front();
        }
    }

    pub fn len(&self) -> usize {
        self.minima.len()
    }

    pub fn is_empty(&self) -> bool {
        self.minima.is_empty()
    }

    /// Baseline: the lowest of `current_minimum` and the recorded minima.
    pub fn baseline(&self, current_minimum: f64) -> f64 {
        self.minima.iter().copied().fold(current_minimum, f64::min)
    }
}

/// Fitness values with non-finite entries replaced by the largest finite one.
///
/// `None` when nothing is finite.
fn clamped_fitness(population: &[Candidate]) -> Option<Vec<f64>> {
    let max_finite = population
        .iter()
        .map(|c| c.fitness)
        .filter(|f| f.is_finite())
        .reduce(f64::max)?;
    Some(
        population
            .iter()
            .map(|c| if c.fitness.is_finite() { c.fitness } else { max_finite })
            .collect(),
    )
}

/// Signal scaling: `f'(i) = max(f(i) - (mean - c * std), 0)`, normalized.
///
/// Probabilities are returned in population order.
pub fn signal_scaling(population: &[Candidate], c: f64) -> Weighted<'_> {
    if population.is_empty() {
        return Vec::new();
    }
    let Some(values) = clamped_fitness(population) else {
        return uniform(population);
    };

    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    let variance = values.iter().map(|f| (f - mean).powi(2)).sum::<f64>() / n;
    let offset = mean - c * variance.sqrt();

    let scaled = values.into_iter().map(|f| (f - offset).max(0.0)).collect();
    normalize(scaled, population)
}

/// Windowing: `f'(i) = f(i) - b`, where `b` is the lowest fitness seen in the
/// current population or the trailing window. Normalized, population order.
pub fn windowing<'a>(population: &'a [Candidate], window: &FitnessWindow) -> Weighted<'a> {
    if population.is_empty() {
        return Vec::new();
    }
    let Some(values) = clamped_fitness(population) else {
        return uniform(population);
    };

    let current_minimum = values.iter().copied().fold(f64::INFINITY, f64::min);
    let baseline = window.baseline(current_minimum);
    let scaled = values.into_iter().map(|f| (f - baseline).max(0.0)).collect();
    normalize(scaled, population)
}
