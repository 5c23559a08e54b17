//! Tour fitness: the total edge cost of an individual, or `NoPath` when the
//! tour uses an edge that does not exist.

use crate::graph::WeightedGraph;
use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// Fitness of a tour. Lower is better.
///
/// `NoPath` orders after every finite cost.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub enum Fitness {
    Finite(f64),
    NoPath,
}

impl Fitness {
    pub fn is_finite(&self) -> bool {
        matches!(self, Fitness::Finite(_))
    }

    /// The cost, if the tour is traversable
    pub fn value(&self) -> Option<f64> {
        match *self {
            Fitness::Finite(cost) => Some(cost),
            Fitness::NoPath => None,
        }
    }

    /// Mean over a set of fitness values. `NoPath` as soon as one value is `NoPath`.
    pub fn mean(values: &[Fitness]) -> Fitness {
        if values.is_empty() {
            return Fitness::NoPath;
        }

        let mut total = 0.0;
        for fitness in values {
            match *fitness {
                Fitness::Finite(cost) => total += cost,
                Fitness::NoPath => return Fitness::NoPath,
            }
        }
        Fitness::Finite(total / values.len() as f64)
    }
}

impl PartialEq for Fitness {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Fitness {}

impl PartialOrd for Fitness {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Fitness {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Fitness::Finite(a), Fitness::Finite(b)) => OrderedFloat(*a).cmp(&OrderedFloat(*b)),
            (Fitness::Finite(_), Fitness::NoPath) => Ordering::Less,
            (Fitness::NoPath, Fitness::Finite(_)) => Ordering::Greater,
            (Fitness::NoPath, Fitness::NoPath) => Ordering::Equal,
        }
    }
}

impl std::fmt::Display for Fitness {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Fitness::Finite(cost) => write!(f, "{:.2}", cost),
            Fitness::NoPath => write!(f, "no path"),
        }
    }
}

/// Score a tour against the graph.
///
/// Sums every consecutive edge plus the closing edge back to the first vertex.
/// Repeated vertices are not checked, only edge existence.
pub fn evaluate(tour: &[usize], graph: &WeightedGraph) -> Fitness {
    let n = tour.len();
    if n == 0 {
        return Fitness::Finite(0.0);
    }

    let mut distance = 0.0;
    for i in 0..n {
        let from = tour[i];
        let to = tour[(i + 1) % n];
        match graph.weight(from, to) {
            Some(w) => distance += w,
            None => return Fitness::NoPath,
        }
    }

    Fitness::Finite(distance)
}
