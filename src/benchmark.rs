//! Repeated seeded runs of the GA on one graph.
//!
//! Runs seeds `seed, seed + 1, ...` and collects final and best-seen
//! distances so the spread of the heuristic can be measured.

use crate::error::Result;
use crate::graph::WeightedGraph;
use crate::heuristics::genetic::{GAConfig, GeneticAlgorithm};

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::path::Path;

/// Result of a single seeded run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunResult {
    /// Seed driving the run
    pub seed: u64,
    /// Distance of the tour taken from the last population
    pub path_distance: Option<f64>,
    /// Distance of the best tour seen across all generations
    pub best_so_far_distance: Option<f64>,
    /// Whether the final tour visits every vertex exactly once
    pub hamiltonian: bool,
    /// Mean fitness of the last evaluated generation
    pub final_mean: Option<f64>,
}

/// Aggregated statistics over all runs with a traversable final tour
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BenchmarkStatistics {
    pub num_runs: usize,
    pub num_valid: usize,
    pub best: f64,
    pub worst: f64,
    pub mean: f64,
    pub std_dev: f64,
    /// Mean of the best-seen distances, over runs that saw one
    pub mean_best_so_far: Option<f64>,
}

/// Benchmark configuration
#[derive(Debug, Clone)]
pub struct BenchmarkConfig {
    /// Number of seeded runs
    pub num_runs: usize,
    /// Run seeds in parallel
    pub parallel: bool,
}

impl Default for BenchmarkConfig {
    fn default() -> Self {
        BenchmarkConfig {
            num_runs: 5,
            parallel: true,
        }
    }
}

/// Benchmarking engine
pub struct Benchmark {
    config: BenchmarkConfig,
    results: Vec<RunResult>,
}

impl Benchmark {
    pub fn new(config: BenchmarkConfig) -> Self {
        Benchmark {
            config,
            results: Vec::new(),
        }
    }

    fn run_one(graph: &WeightedGraph, ga_config: &GAConfig, seed: u64) -> Result<RunResult> {
        let config = GAConfig { seed, ..ga_config.clone() };
        let mut ga = GeneticAlgorithm::new(graph, config)?;
        let solution = ga.run();

        Ok(RunResult {
            seed,
            path_distance: solution.path_distance.value(),
            best_so_far_distance: solution.best_so_far.as_ref().and_then(|b| b.fitness.value()),
            hamiltonian: solution.hamiltonian,
            final_mean: solution
                .generation_history
                .last()
                .and_then(|r| r.mean_fitness.value()),
        })
    }

    /// Run `num_runs` seeded runs and record their results
    pub fn run(&mut self, graph: &WeightedGraph, ga_config: &GAConfig) -> Result<()> {
        ga_config.validate()?;
        log::info!(
            "Running {} seeded runs on graph '{}' (parallel: {})",
            self.config.num_runs,
            graph.name,
            self.config.parallel
        );

        let seeds: Vec<u64> = (0..self.config.num_runs as u64)
            .map(|i| ga_config.seed.wrapping_add(i))
            .collect();

        let mut results = if self.config.parallel {
            seeds
                .par_iter()
                .map(|&seed| Self::run_one(graph, ga_config, seed))
                .collect::<Result<Vec<_>>>()?
        } else {
            seeds
                .iter()
                .map(|&seed| Self::run_one(graph, ga_config, seed))
                .collect::<Result<Vec<_>>>()?
        };

        self.results.append(&mut results);
        Ok(())
    }

    /// Compute statistics over runs whose final tour is traversable
    pub fn compute_statistics(&self) -> Option<BenchmarkStatistics> {
        let distances: Vec<f64> = self.results.iter().filter_map(|r| r.path_distance).collect();
        if distances.is_empty() {
            return None;
        }

        let mean = distances.iter().sum::<f64>() / distances.len() as f64;
        let variance = distances.iter()
            .map(|d| (d - mean).powi(2))
            .sum::<f64>() / distances.len() as f64;

        let best_seen: Vec<f64> = self.results.iter().filter_map(|r| r.best_so_far_distance).collect();
        let mean_best_so_far = if best_seen.is_empty() {
            None
        } else {
            Some(best_seen.iter().sum::<f64>() / best_seen.len() as f64)
        };

        Some(BenchmarkStatistics {
            num_runs: self.results.len(),
            num_valid: distances.len(),
            best: distances.iter().cloned().fold(f64::INFINITY, f64::min),
            worst: distances.iter().cloned().fold(0.0, f64::max),
            mean,
            std_dev: variance.sqrt(),
            mean_best_so_far,
        })
    }

    /// Export results to CSV
    pub fn export_to_csv<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let file = File::create(path)?;
        let mut writer = csv::Writer::from_writer(file);

        for result in &self.results {
            writer.serialize(result)?;
        }

        writer.flush()?;
        Ok(())
    }

    /// Generate summary report
    pub fn generate_report(&self) -> String {
        let mut report = String::new();

        report.push_str("========================================\n");
        report.push_str("        GA-TSP Benchmark Report\n");
        report.push_str("========================================\n\n");

        report.push_str(&format!("{:>8} {:>14} {:>14} {:>12}\n", "Seed", "Final", "Best seen", "Hamiltonian"));
        report.push_str("-".repeat(52).as_str());
        report.push('\n');

        let show = |d: Option<f64>| d.map(|d| format!("{:.2}", d)).unwrap_or_else(|| "no path".to_string());
        for result in &self.results {
            report.push_str(&format!("{:>8} {:>14} {:>14} {:>12}\n",
                result.seed,
                show(result.path_distance),
                show(result.best_so_far_distance),
                result.hamiltonian));
        }

        report.push_str("-".repeat(52).as_str());
        report.push('\n');

        match self.compute_statistics() {
            Some(stats) => {
                report.push_str(&format!("Valid runs: {}/{}\n", stats.num_valid, stats.num_runs));
                report.push_str(&format!("Best: {:.2}  Worst: {:.2}  Mean: {:.2}  Std: {:.2}\n",
                    stats.best, stats.worst, stats.mean, stats.std_dev));
                if let Some(mean_best) = stats.mean_best_so_far {
                    report.push_str(&format!("Mean best seen: {:.2}\n", mean_best));
                }
            }
            None => report.push_str("No run produced a traversable tour\n"),
        }

        report
    }

    /// Get all results
    pub fn results(&self) -> &[RunResult] {
        &self.results
    }
}
