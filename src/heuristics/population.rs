//! Individuals, populations and generation-0 initialization.

use crate::fitness::{evaluate, Fitness};
use crate::graph::WeightedGraph;
use rand::seq::SliceRandom;
use rand::RngCore;
use serde::{Deserialize, Serialize};

/// One candidate tour: an ordered sequence of vertex indices.
///
/// Only generation-0 individuals are guaranteed to be permutations; crossover
/// and mutation may introduce repeated vertices.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Individual {
    pub tour: Vec<usize>,
}

impl Individual {
    pub fn new(tour: Vec<usize>) -> Self {
        Individual { tour }
    }

    pub fn len(&self) -> usize {
        self.tour.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tour.is_empty()
    }

    pub fn fitness(&self, graph: &WeightedGraph) -> Fitness {
        evaluate(&self.tour, graph)
    }

    /// Check if the tour visits every vertex of `[0, n)` exactly once
    pub fn is_permutation(&self, n: usize) -> bool {
        if self.tour.len() != n {
            return false;
        }

        let mut seen = vec![false; n];
        for &vertex in &self.tour {
            if vertex >= n || seen[vertex] {
                return false;
            }
            seen[vertex] = true;
        }
        true
    }

    /// The tour closed into a cycle by repeating its first vertex
    pub fn closed_cycle(&self) -> Vec<usize> {
        let mut path = self.tour.clone();
        if let Some(&first) = self.tour.first() {
            path.push(first);
        }
        path
    }
}

impl From<Vec<usize>> for Individual {
    fn from(tour: Vec<usize>) -> Self {
        Individual::new(tour)
    }
}

pub type Population = Vec<Individual>;

/// Builds the generation-0 population.
pub trait PopulationInitializer {
    fn initialize(&self, graph: &WeightedGraph, population_size: usize, rng: &mut dyn RngCore) -> Population;
}

/// Random permutations anchored at vertex 0.
///
/// Each individual is `[0]` followed by a uniform shuffle of `1..n`.
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomPermutationInitializer;

impl RandomPermutationInitializer {
    pub fn new() -> Self {
        RandomPermutationInitializer
    }

    fn random_tour(n: usize, rng: &mut dyn RngCore) -> Vec<usize> {
        let mut rest: Vec<usize> = (1..n).collect();
        rest.shuffle(rng);

        let mut tour = Vec::with_capacity(n);
        tour.push(0);
        tour.extend(rest);
        tour
    }
}

impl PopulationInitializer for RandomPermutationInitializer {
    fn initialize(&self, graph: &WeightedGraph, population_size: usize, rng: &mut dyn RngCore) -> Population {
        let n = graph.dimension();
        (0..population_size)
            .map(|_| Individual::new(Self::random_tour(n, rng)))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_initial_population_is_anchored_permutations() {
        let graph = WeightedGraph::new(7);
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let population = RandomPermutationInitializer::new().initialize(&graph, 30, &mut rng);

        assert_eq!(population.len(), 30);
        for individual in &population {
            assert_eq!(individual.len(), 7);
            assert_eq!(individual.tour[0], 0);
            assert!(individual.is_permutation(7));
        }
    }

    #[test]
    fn test_initial_population_is_shuffled() {
        let graph = WeightedGraph::new(8);
        let mut rng = ChaCha8Rng::seed_from_u64(11);
        let population = RandomPermutationInitializer::new().initialize(&graph, 20, &mut rng);

        let distinct: std::collections::HashSet<&Vec<usize>> = population.iter().map(|i| &i.tour).collect();
        assert!(distinct.len() > 1);
    }

    #[test]
    fn test_single_vertex_graph() {
        let graph = WeightedGraph::new(1);
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        let population = RandomPermutationInitializer::new().initialize(&graph, 4, &mut rng);
        assert!(population.iter().all(|i| i.tour == vec![0]));
    }

    #[test]
    fn test_is_permutation() {
        assert!(Individual::new(vec![0, 2, 1]).is_permutation(3));
        assert!(!Individual::new(vec![0, 2, 2]).is_permutation(3));
        assert!(!Individual::new(vec![0, 3, 1]).is_permutation(3));
        assert!(!Individual::new(vec![0, 1]).is_permutation(3));
    }

    #[test]
    fn test_closed_cycle() {
        assert_eq!(Individual::new(vec![2, 0, 1]).closed_cycle(), vec![2, 0, 1, 2]);
    }
}
