//! Property tests: replacement policies produce the population sizes the
//! slicing rules imply, and never invent candidates.

use promptforge_engine::{elite_count, replace, Candidate, ReplacementPolicy};
use promptforge_tests::population;
use proptest::prelude::*;
use std::collections::HashSet;

fn arb_fitness() -> impl Strategy<Value = Vec<f64>> {
    prop::collection::vec(0.0f64..50.0, 0..40)
}

/// Fitness values of the offspring that survived into `merged`, worst first.
fn surviving_offspring(merged: &[Candidate], offspring: &[Candidate]) -> Vec<f64> {
    let ids: HashSet<_> = offspring.iter().map(|c| c.id).collect();
    let mut kept: Vec<f64> = merged
        .iter()
        .filter(|c| ids.contains(&c.id))
        .map(|c| c.fitness)
        .collect();
    kept.sort_by(|a, b| b.total_cmp(a));
    kept
}

fn worst_first(fitness: &[f64]) -> Vec<f64> {
    let mut sorted = fitness.to_vec();
    sorted.sort_by(|a, b| b.total_cmp(a));
    sorted
}

proptest! {
    #[test]
    fn general_returns_offspring_verbatim(parents in arb_fitness(), children in arb_fitness()) {
        let offspring = population(&children);
        let expected: Vec<_> = offspring.iter().map(|c| c.id).collect();
        let merged = replace(ReplacementPolicy::General, population(&parents), offspring);
        let ids: Vec<_> = merged.iter().map(|c| c.id).collect();
        prop_assert_eq!(ids, expected);
    }

    #[test]
    fn gradual_size(parents in arb_fitness(), children in arb_fitness()) {
        let m = elite_count(parents.len());
        let merged = replace(
            ReplacementPolicy::Gradual,
            population(&parents),
            population(&children),
        );
        let expected = if m == 0 {
            parents.len() + children.len()
        } else {
            parents.len() - m + m.min(children.len())
        };
        prop_assert_eq!(merged.len(), expected);
    }

    #[test]
    fn elitism_size(parents in arb_fitness(), children in arb_fitness()) {
        let m = elite_count(parents.len());
        let merged = replace(
            ReplacementPolicy::Elitism,
            population(&parents),
            population(&children),
        );
        let expected = if m == 0 {
            parents.len() + children.len()
        } else {
            m + children.len().saturating_sub(m)
        };
        prop_assert_eq!(merged.len(), expected);
    }

    #[test]
    fn merged_candidates_come_from_inputs(
        parents in arb_fitness(),
        children in arb_fitness(),
        elitism in any::<bool>(),
    ) {
        let parents = population(&parents);
        let children = population(&children);
        let known: HashSet<_> = parents.iter().chain(children.iter()).map(|c| c.id).collect();
        let policy = if elitism { ReplacementPolicy::Elitism } else { ReplacementPolicy::Gradual };

        let merged = replace(policy, parents, children);
        let ids: HashSet<_> = merged.iter().map(|c| c.id).collect();
        prop_assert_eq!(ids.len(), merged.len());
        prop_assert!(ids.is_subset(&known));
    }

    #[test]
    fn elitism_keeps_the_best_parents(parents in prop::collection::vec(0.0f64..50.0, 5..40)) {
        let m = elite_count(parents.len());
        let mut sorted = parents.clone();
        sorted.sort_by(|a, b| a.total_cmp(b));

        let merged = replace(ReplacementPolicy::Elitism, population(&parents), Vec::new());
        let mut kept: Vec<f64> = merged.iter().map(|c| c.fitness).collect();
        kept.sort_by(|a, b| a.total_cmp(b));
        prop_assert_eq!(kept, sorted[..m].to_vec());
    }

    #[test]
    fn gradual_excludes_the_best_offspring(
        parents in prop::collection::vec(0.0f64..50.0, 5..40),
        children in prop::collection::vec(0.0f64..50.0, 0..40),
    ) {
        let m = elite_count(parents.len());
        let offspring = population(&children);
        let merged = replace(ReplacementPolicy::Gradual, population(&parents), offspring.clone());

        // Only the m worst offspring survive.
        let kept = surviving_offspring(&merged, &offspring);
        let sorted = worst_first(&children);
        prop_assert_eq!(&kept, &sorted[..m.min(sorted.len())].to_vec());
        if children.len() >= 2 * m {
            let best_m = &sorted[sorted.len() - m..];
            let threshold = best_m.iter().copied().fold(f64::NEG_INFINITY, f64::max);
            prop_assert!(kept.iter().all(|f| *f >= threshold));
        }
    }

    #[test]
    fn elitism_drops_the_best_offspring(
        parents in prop::collection::vec(0.0f64..50.0, 5..40),
        children in prop::collection::vec(0.0f64..50.0, 0..40),
    ) {
        let m = elite_count(parents.len());
        let offspring = population(&children);
        let merged = replace(ReplacementPolicy::Elitism, population(&parents), offspring.clone());

        let kept = surviving_offspring(&merged, &offspring);
        let sorted = worst_first(&children);
        prop_assert_eq!(&kept, &sorted[..children.len().saturating_sub(m)].to_vec());
    }
}
