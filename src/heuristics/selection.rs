//! Parent selection.

use super::population::Individual;
use rand::seq::index;
use rand::RngCore;

/// Picks two parents for one mating.
pub trait ParentSelector {
    fn select<'a>(&self, population: &'a [Individual], rng: &mut dyn RngCore) -> (&'a Individual, &'a Individual);
}

/// Pure random mating: two distinct positions drawn uniformly, no fitness weighting.
///
/// Every call samples from the full population, so one individual can parent
/// several pairs in the same generation.
#[derive(Debug, Clone, Copy, Default)]
pub struct UniformPairSelector;

impl UniformPairSelector {
    pub fn new() -> Self {
        UniformPairSelector
    }
}

impl ParentSelector for UniformPairSelector {
    fn select<'a>(&self, population: &'a [Individual], rng: &mut dyn RngCore) -> (&'a Individual, &'a Individual) {
        // a lone individual mates with itself
        if population.len() < 2 {
            return (&population[0], &population[0]);
        }

        let picked = index::sample(rng, population.len(), 2);
        (&population[picked.index(0)], &population[picked.index(1)])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn population(size: usize) -> Vec<Individual> {
        (0..size).map(|i| Individual::new(vec![i])).collect()
    }

    #[test]
    fn test_parents_are_distinct_positions() {
        let population = population(6);
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        let selector = UniformPairSelector::new();

        for _ in 0..200 {
            let (a, b) = selector.select(&population, &mut rng);
            assert_ne!(a.tour, b.tour);
        }
    }

    #[test]
    fn test_every_individual_gets_picked() {
        let population = population(5);
        let mut rng = ChaCha8Rng::seed_from_u64(8);
        let selector = UniformPairSelector::new();

        let mut counts = [0usize; 5];
        for _ in 0..500 {
            let (a, b) = selector.select(&population, &mut rng);
            counts[a.tour[0]] += 1;
            counts[b.tour[0]] += 1;
        }
        assert!(counts.iter().all(|&c| c > 100));
    }

    #[test]
    fn test_pair_population() {
        let population = population(2);
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let (a, b) = UniformPairSelector::new().select(&population, &mut rng);
        let mut picked = vec![a.tour[0], b.tour[0]];
        picked.sort();
        assert_eq!(picked, vec![0, 1]);
    }
}
