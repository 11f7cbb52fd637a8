//! Property tests: mating pools have the requested size, and the
//! repeat-free schemes never select a candidate twice.

use promptforge_engine::selection::{
    rank_based, roulette_wheel, stochastic_universal, tournament,
};
use promptforge_engine::RankingMode;
use promptforge_tests::population;
use proptest::prelude::*;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::collections::HashSet;

// ---------------------------------------------------------------------------
// Strategies
// ---------------------------------------------------------------------------

fn arb_fitness(min: usize, max: usize) -> impl Strategy<Value = Vec<f64>> {
    prop::collection::vec(0.0f64..100.0, min..max)
}

/// Population plus a tournament size and a pool the tournament can fill.
fn arb_tournament() -> impl Strategy<Value = (Vec<f64>, usize, usize)> {
    arb_fitness(6, 30).prop_flat_map(|fitness| {
        let n = fitness.len();
        (Just(fitness), 1usize..=3, 1usize..=(n / 3))
    })
}

// ---------------------------------------------------------------------------
// Properties
// ---------------------------------------------------------------------------

proptest! {
    #[test]
    fn tournament_pool_is_distinct((fitness, k, pool) in arb_tournament(), seed in any::<u64>()) {
        let population = population(&fitness);
        let mut rng = StdRng::seed_from_u64(seed);
        let selected = tournament(&population, k, pool, &mut rng).unwrap();

        prop_assert_eq!(selected.len(), pool);
        let ids: HashSet<_> = selected.iter().map(|c| c.id).collect();
        prop_assert_eq!(ids.len(), pool);
    }

    #[test]
    fn tournament_never_picks_the_k_minus_one_worst(
        (fitness, k, pool) in arb_tournament(),
        seed in any::<u64>(),
    ) {
        let population = population(&fitness);
        let mut rng = StdRng::seed_from_u64(seed);
        let selected = tournament(&population, k, pool, &mut rng).unwrap();

        let mut sorted = fitness.clone();
        sorted.sort_by(|a, b| a.total_cmp(b));
        // Any winner beat k - 1 other entrants.
        let worst_possible = sorted[sorted.len() - k];
        prop_assert!(selected.iter().all(|c| c.fitness <= worst_possible));
    }

    #[test]
    fn linear_ranking_is_a_distribution(fitness in arb_fitness(1, 40), s in 1.01f64..2.0) {
        let population = population(&fitness);
        let weighted = rank_based(&population, RankingMode::Linear, s).unwrap();

        let total: f64 = weighted.iter().map(|(p, _)| p).sum();
        prop_assert!((total - 1.0).abs() < 1e-9);
        prop_assert!(weighted.iter().all(|(p, _)| *p > 0.0));
        // Ordered best first, probabilities non-increasing.
        prop_assert!(weighted.windows(2).all(|w| w[0].0 >= w[1].0 - 1e-12));
        prop_assert!(weighted.windows(2).all(|w| w[0].1.fitness <= w[1].1.fitness));
    }

    #[test]
    fn exponential_ranking_is_a_distribution(fitness in arb_fitness(1, 40), s in 0.05f64..5.0) {
        let population = population(&fitness);
        let weighted = rank_based(&population, RankingMode::Exponential, s).unwrap();

        let total: f64 = weighted.iter().map(|(p, _)| p).sum();
        prop_assert!((total - 1.0).abs() < 1e-9);
        prop_assert!(weighted.windows(2).all(|w| w[0].0 >= w[1].0));
    }

    #[test]
    fn roulette_pool_has_no_repeats(
        fitness in arb_fitness(2, 30),
        s in 1.1f64..1.9,
        fraction in 0.1f64..1.0,
        seed in any::<u64>(),
    ) {
        let population = population(&fitness);
        let weighted = rank_based(&population, RankingMode::Linear, s).unwrap();
        let pool = ((population.len() as f64 * fraction) as usize).max(1);
        let mut rng = StdRng::seed_from_u64(seed);
        let selected = roulette_wheel(&weighted, pool, &mut rng).unwrap();

        prop_assert_eq!(selected.len(), pool);
        let ids: HashSet<_> = selected.iter().map(|c| c.id).collect();
        prop_assert_eq!(ids.len(), pool);
    }

    #[test]
    fn sus_pool_has_exact_size(
        fitness in arb_fitness(1, 30),
        pool in 1usize..60,
        seed in any::<u64>(),
    ) {
        let population = population(&fitness);
        let weighted = rank_based(&population, RankingMode::Exponential, 1.0).unwrap();
        let mut rng = StdRng::seed_from_u64(seed);
        let selected = stochastic_universal(&weighted, pool, &mut rng).unwrap();
        prop_assert_eq!(selected.len(), pool);
    }
}
