//! Mutation operators.

use super::population::Individual;
use rand::{Rng, RngCore};
use serde::{Deserialize, Serialize};

/// Mutation operator types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MutationType {
    /// Replace genes with uniformly random vertices
    RandomReset,
    /// Swap genes with random positions (keeps permutations)
    Swap,
}

impl MutationType {
    pub fn build(self) -> Box<dyn MutationOperator> {
        match self {
            MutationType::RandomReset => Box::new(RandomResetMutation),
            MutationType::Swap => Box::new(SwapMutation),
        }
    }
}

/// Perturbs one individual in place.
pub trait MutationOperator {
    fn mutate(&self, individual: &mut Individual, mutation_rate: f64, rng: &mut dyn RngCore);
}

/// Each position is, with probability `mutation_rate`, replaced by a uniform
/// index in `[0, n)`. Position 0 is not protected and duplicates are allowed.
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomResetMutation;

impl MutationOperator for RandomResetMutation {
    fn mutate(&self, individual: &mut Individual, mutation_rate: f64, rng: &mut dyn RngCore) {
        let n = individual.len();
        for gene in individual.tour.iter_mut() {
            if rng.gen::<f64>() < mutation_rate {
                *gene = rng.gen_range(0..n);
            }
        }
    }
}

/// Each position after the first is, with probability `mutation_rate`,
/// swapped with another random position after the first.
#[derive(Debug, Clone, Copy, Default)]
pub struct SwapMutation;

impl MutationOperator for SwapMutation {
    fn mutate(&self, individual: &mut Individual, mutation_rate: f64, rng: &mut dyn RngCore) {
        let n = individual.len();
        if n < 3 {
            return;
        }

        for i in 1..n {
            if rng.gen::<f64>() < mutation_rate {
                let j = rng.gen_range(1..n);
                individual.tour.swap(i, j);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_zero_rate_is_identity() {
        let original = Individual::new(vec![0, 4, 2, 3, 1]);
        let mut rng = ChaCha8Rng::seed_from_u64(7);

        for operator in [MutationType::RandomReset.build(), MutationType::Swap.build()] {
            let mut individual = original.clone();
            for _ in 0..100 {
                operator.mutate(&mut individual, 0.0, &mut rng);
            }
            assert_eq!(individual, original);
        }
    }

    #[test]
    fn test_full_rate_redraws_every_position() {
        let mut individual = Individual::new(vec![0; 50]);
        let mut rng = ChaCha8Rng::seed_from_u64(13);
        let mut replay = rng.clone();

        RandomResetMutation.mutate(&mut individual, 1.0, &mut rng);

        let expected: Vec<usize> = (0..50)
            .map(|_| {
                let _: f64 = replay.gen();
                replay.gen_range(0..50)
            })
            .collect();
        assert_eq!(individual.tour, expected);
        assert!(individual.tour.iter().filter(|&&v| v != 0).count() > 25);
    }

    #[test]
    fn test_random_reset_stays_in_range() {
        let mut individual = Individual::new((0..10).collect());
        let mut rng = ChaCha8Rng::seed_from_u64(17);

        for _ in 0..50 {
            RandomResetMutation.mutate(&mut individual, 0.3, &mut rng);
            assert_eq!(individual.len(), 10);
            assert!(individual.tour.iter().all(|&v| v < 10));
        }
    }

    #[test]
    fn test_swap_keeps_permutation_and_anchor() {
        let mut individual = Individual::new((0..9).collect());
        let mut rng = ChaCha8Rng::seed_from_u64(23);

        for _ in 0..50 {
            SwapMutation.mutate(&mut individual, 0.5, &mut rng);
            assert!(individual.is_permutation(9));
            assert_eq!(individual.tour[0], 0);
        }
    }
}
