//! Solution representation and the per-generation convergence trace.
//!
//! A [`Solution`] is assembled from the final individual once the GA loop is
//! over: the tour is closed into a cycle and scored against the graph.

use crate::error::Result;
use crate::fitness::Fitness;
use crate::graph::WeightedGraph;
use crate::heuristics::population::Individual;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::path::Path;

/// Summary of one generation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationRecord {
    /// Generation index, starting at 0
    pub generation: usize,
    /// Mean fitness of the population, `NoPath` if any individual has no path
    pub mean_fitness: Fitness,
    /// Best fitness of the population
    pub best_fitness: Fitness,
    /// Number of individuals with a finite fitness
    pub valid_count: usize,
}

impl GenerationRecord {
    pub fn from_scores(generation: usize, scores: &[Fitness]) -> Self {
        GenerationRecord {
            generation,
            mean_fitness: Fitness::mean(scores),
            best_fitness: scores.iter().cloned().min().unwrap_or(Fitness::NoPath),
            valid_count: scores.iter().filter(|f| f.is_finite()).count(),
        }
    }
}

/// Best individual seen across every evaluated generation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BestTour {
    pub tour: Vec<usize>,
    pub fitness: Fitness,
    /// Generation in which it was first seen
    pub generation: usize,
}

/// Flat CSV row for the convergence trace
#[derive(Debug, Serialize)]
struct HistoryRow {
    generation: usize,
    mean_fitness: Option<f64>,
    best_fitness: Option<f64>,
    valid_count: usize,
}

/// Final answer of a GA run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Solution {
    /// The final tour closed into a cycle (first vertex repeated at the end)
    pub path: Vec<usize>,
    /// Fitness of the final tour
    pub path_distance: Fitness,
    /// Whether the final tour visits every vertex exactly once
    pub hamiltonian: bool,
    /// One record per generation
    pub generation_history: Vec<GenerationRecord>,
    /// Running best across all evaluated generations (diagnostic)
    pub best_so_far: Option<BestTour>,
    /// Algorithm that generated this solution
    pub algorithm: String,
    /// Number of generations executed
    pub generations: usize,
    /// Seed driving the run
    pub seed: u64,
}

impl Solution {
    /// Close `individual` into a cycle and score it.
    pub fn assemble(
        individual: &Individual,
        graph: &WeightedGraph,
        generation_history: Vec<GenerationRecord>,
        best_so_far: Option<BestTour>,
        seed: u64,
    ) -> Self {
        Solution {
            path: individual.closed_cycle(),
            path_distance: individual.fitness(graph),
            hamiltonian: individual.is_permutation(graph.dimension()),
            generations: generation_history.len(),
            generation_history,
            best_so_far,
            algorithm: "GeneticAlgorithm".to_string(),
            seed,
        }
    }

    /// The open tour (path without the repeated closing vertex)
    pub fn tour(&self) -> &[usize] {
        match self.path.len() {
            0 => &self.path,
            len => &self.path[..len - 1],
        }
    }

    /// Mean fitness per generation, `None` for generations with an untraversable tour
    pub fn mean_fitness_trace(&self) -> Vec<Option<f64>> {
        self.generation_history.iter().map(|r| r.mean_fitness.value()).collect()
    }

    /// Export the convergence trace to CSV
    pub fn export_history_csv<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let file = File::create(path)?;
        let mut writer = csv::Writer::from_writer(file);

        for record in &self.generation_history {
            writer.serialize(HistoryRow {
                generation: record.generation,
                mean_fitness: record.mean_fitness.value(),
                best_fitness: record.best_fitness.value(),
                valid_count: record.valid_count,
            })?;
        }

        writer.flush()?;
        Ok(())
    }
}

impl std::fmt::Display for Solution {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Solution ({})", self.algorithm)?;
        writeln!(f, "  Path distance: {}", self.path_distance)?;
        writeln!(f, "  Hamiltonian: {}", self.hamiltonian)?;
        writeln!(f, "  Generations: {}", self.generations)?;
        writeln!(f, "  Seed: {}", self.seed)?;
        if let Some(best) = &self.best_so_far {
            writeln!(f, "  Best seen: {} (generation {})", best.fitness, best.generation)?;
        }
        writeln!(f, "  Path: {:?}", self.path)
    }
}
