//! Crossover operators.
//!
//! [`SinglePointCrossover`] splices parents positionally and may produce
//! children with repeated vertices. [`OrderCrossover`] preserves permutations
//! and can be swapped in through the same trait.

use super::population::Individual;
use rand::{Rng, RngCore};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Crossover operator types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CrossoverType {
    /// Single-point positional crossover
    SinglePoint,
    /// Order Crossover (OX)
    Order,
}

impl CrossoverType {
    pub fn build(self) -> Box<dyn CrossoverOperator> {
        match self {
            CrossoverType::SinglePoint => Box::new(SinglePointCrossover),
            CrossoverType::Order => Box::new(OrderCrossover),
        }
    }
}

/// Combines two parents into two children.
pub trait CrossoverOperator {
    fn crossover(&self, parent1: &Individual, parent2: &Individual, rng: &mut dyn RngCore) -> (Individual, Individual);
}

/// One cut point `k` drawn uniformly from `[0, n)`:
/// `child1 = p1[..k] ++ p2[k..]` and `child2 = p2[..k] ++ p1[k..]`.
#[derive(Debug, Clone, Copy, Default)]
pub struct SinglePointCrossover;

impl SinglePointCrossover {
    /// Splice both parents at `point`.
    pub fn splice(parent1: &Individual, parent2: &Individual, point: usize) -> (Individual, Individual) {
        let point = point.min(parent1.len()).min(parent2.len());

        let mut child1 = Vec::with_capacity(parent2.len());
        child1.extend_from_slice(&parent1.tour[..point]);
        child1.extend_from_slice(&parent2.tour[point..]);

        let mut child2 = Vec::with_capacity(parent1.len());
        child2.extend_from_slice(&parent2.tour[..point]);
        child2.extend_from_slice(&parent1.tour[point..]);

        (Individual::new(child1), Individual::new(child2))
    }
}

impl CrossoverOperator for SinglePointCrossover {
    fn crossover(&self, parent1: &Individual, parent2: &Individual, rng: &mut dyn RngCore) -> (Individual, Individual) {
        let n = parent1.len();
        let point = if n == 0 { 0 } else { rng.gen_range(0..n) };
        Self::splice(parent1, parent2, point)
    }
}

/// Order Crossover (OX).
///
/// The first position is kept, a random segment is copied from one parent and
/// the remaining positions are filled in the other parent's order. Parents
/// that are not permutations sharing the same first vertex are returned as-is.
#[derive(Debug, Clone, Copy, Default)]
pub struct OrderCrossover;

impl OrderCrossover {
    fn child(segment_parent: &[usize], fill_parent: &[usize], start: usize, end: usize) -> Vec<usize> {
        let n = segment_parent.len();
        let mut child = vec![usize::MAX; n];
        child[0] = segment_parent[0];
        child[start..=end].copy_from_slice(&segment_parent[start..=end]);

        let used: HashSet<usize> = child.iter().cloned().filter(|&x| x != usize::MAX).collect();
        let mut fill = fill_parent.iter().filter(|&&x| !used.contains(&x)).cloned();

        for slot in child.iter_mut().skip(1) {
            if *slot == usize::MAX {
                if let Some(vertex) = fill.next() {
                    *slot = vertex;
                }
            }
        }

        child
    }
}

impl CrossoverOperator for OrderCrossover {
    fn crossover(&self, parent1: &Individual, parent2: &Individual, rng: &mut dyn RngCore) -> (Individual, Individual) {
        let n = parent1.len();
        let compatible = n >= 4
            && parent1.is_permutation(n)
            && parent2.is_permutation(n)
            && parent1.tour[0] == parent2.tour[0];
        if !compatible {
            return (parent1.clone(), parent2.clone());
        }

        let start = rng.gen_range(1..n - 1);
        let end = rng.gen_range(start + 1..n);

        (
            Individual::new(Self::child(&parent1.tour, &parent2.tour, start, end)),
            Individual::new(Self::child(&parent2.tour, &parent1.tour, start, end)),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_splice() {
        let p1 = Individual::new(vec![0, 1, 2, 3, 4]);
        let p2 = Individual::new(vec![0, 4, 3, 2, 1]);

        let (c1, c2) = SinglePointCrossover::splice(&p1, &p2, 2);
        assert_eq!(c1.tour, vec![0, 1, 3, 2, 1]);
        assert_eq!(c2.tour, vec![0, 4, 2, 3, 4]);

        // a cut at 0 swaps the parents entirely
        let (c1, c2) = SinglePointCrossover::splice(&p1, &p2, 0);
        assert_eq!(c1, p2);
        assert_eq!(c2, p1);
    }

    #[test]
    fn test_identical_parents_give_identical_children() {
        let p = Individual::new(vec![0, 3, 1, 4, 2]);
        let mut rng = ChaCha8Rng::seed_from_u64(21);

        for _ in 0..50 {
            let (c1, c2) = SinglePointCrossover.crossover(&p, &p, &mut rng);
            assert_eq!(c1, p);
            assert_eq!(c2, p);

            let (c1, c2) = OrderCrossover.crossover(&p, &p, &mut rng);
            assert_eq!(c1, p);
            assert_eq!(c2, p);
        }
    }

    #[test]
    fn test_single_point_keeps_length_and_genes_per_position() {
        let p1 = Individual::new(vec![0, 1, 2, 3, 4, 5]);
        let p2 = Individual::new(vec![0, 5, 4, 3, 2, 1]);
        let mut rng = ChaCha8Rng::seed_from_u64(4);

        for _ in 0..50 {
            let (c1, c2) = SinglePointCrossover.crossover(&p1, &p2, &mut rng);
            assert_eq!(c1.len(), 6);
            assert_eq!(c2.len(), 6);
            for i in 0..6 {
                // each position comes from one parent, the other child gets the other
                let mut genes = vec![c1.tour[i], c2.tour[i]];
                let mut expected = vec![p1.tour[i], p2.tour[i]];
                genes.sort();
                expected.sort();
                assert_eq!(genes, expected);
            }
        }
    }

    #[test]
    fn test_order_crossover_preserves_permutations() {
        let p1 = Individual::new(vec![0, 1, 2, 3, 4, 5, 6, 7]);
        let p2 = Individual::new(vec![0, 7, 5, 3, 1, 6, 4, 2]);
        let mut rng = ChaCha8Rng::seed_from_u64(99);

        for _ in 0..100 {
            let (c1, c2) = OrderCrossover.crossover(&p1, &p2, &mut rng);
            assert!(c1.is_permutation(8));
            assert!(c2.is_permutation(8));
            assert_eq!(c1.tour[0], 0);
            assert_eq!(c2.tour[0], 0);
        }
    }

    #[test]
    fn test_order_crossover_rejects_invalid_parents() {
        let p1 = Individual::new(vec![0, 1, 1, 3, 4]);
        let p2 = Individual::new(vec![0, 4, 3, 2, 1]);
        let mut rng = ChaCha8Rng::seed_from_u64(2);

        let (c1, c2) = OrderCrossover.crossover(&p1, &p2, &mut rng);
        assert_eq!(c1, p1);
        assert_eq!(c2, p2);
    }
}
