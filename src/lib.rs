//! GA-TSP Solver Library
//! 
//! Approximates a minimum-cost Hamiltonian cycle over a weighted, possibly
//! asymmetric and incomplete graph with a genetic algorithm.
//! 
//! # Features
//! 
//! - Adjacency-list graph loader with typed errors
//! - Explicit `Finite` / `NoPath` fitness
//! - Pluggable initialization, selection, crossover and mutation operators
//! - Seeded, reproducible runs with a per-generation convergence trace
//! - Batch runs over several seeds and SVG convergence plots
//! 
//! # Example
//! 
//! ```no_run
//! use ga_tsp_solver::graph::WeightedGraph;
//! use ga_tsp_solver::heuristics::genetic::{GAConfig, GeneticAlgorithm};
//! 
//! // Load graph
//! let graph = WeightedGraph::from_file("complete_graph_n08.txt").unwrap();
//! 
//! // Run the GA
//! let config = GAConfig { max_generations: 100, population_size: 100, mutation_rate: 0.1, ..Default::default() };
//! let mut ga = GeneticAlgorithm::new(&graph, config).unwrap();
//! let solution = ga.run();
//! 
//! println!("Path: {:?}  distance: {}", solution.path, solution.path_distance);
//! ```

pub mod error;
pub mod graph;
pub mod fitness;
pub mod solution;
pub mod heuristics;
pub mod benchmark;
pub mod visualization;

pub use error::{Result, SolverError};
pub use fitness::Fitness;
pub use graph::WeightedGraph;
pub use solution::Solution;
