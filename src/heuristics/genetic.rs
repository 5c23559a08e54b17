//! Genetic Algorithm for the minimum-cost Hamiltonian cycle.
//!
//! Each generation evaluates the population, records the mean fitness,
//! breeds `population_size / 2` random pairs into as many children, mutates
//! every child and replaces the population wholesale. There is no elitism
//! and no early stop: the run lasts exactly `max_generations` generations.
//!
//! The final answer is the best individual of the *last* population. The best
//! individual seen across all generations is tracked separately and exposed
//! through [`GeneticAlgorithm::best_so_far`] and [`Solution::best_so_far`].

use crate::error::{Result, SolverError};
use crate::fitness::Fitness;
use crate::graph::WeightedGraph;
use crate::heuristics::crossover::{CrossoverOperator, CrossoverType};
use crate::heuristics::mutation::{MutationOperator, MutationType};
use crate::heuristics::population::{
    Individual, Population, PopulationInitializer, RandomPermutationInitializer,
};
use crate::heuristics::selection::{ParentSelector, UniformPairSelector};
use crate::solution::{BestTour, GenerationRecord, Solution};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Genetic Algorithm configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GAConfig {
    /// Number of generations
    pub max_generations: usize,
    /// Population size, must be even
    pub population_size: usize,
    /// Per-gene mutation probability
    pub mutation_rate: f64,
    /// Accepted for interface compatibility. No operator reads it.
    pub explore_rate: f64,
    /// Random seed
    pub seed: u64,
    /// Crossover operator
    pub crossover_type: CrossoverType,
    /// Mutation operator
    pub mutation_type: MutationType,
    /// Evaluate fitness with rayon
    pub parallel_evaluation: bool,
}

impl Default for GAConfig {
    fn default() -> Self {
        GAConfig {
            max_generations: 150,
            population_size: 200,
            mutation_rate: 0.02,
            explore_rate: 0.6,
            seed: 42,
            crossover_type: CrossoverType::SinglePoint,
            mutation_type: MutationType::RandomReset,
            parallel_evaluation: false,
        }
    }
}

impl GAConfig {
    /// Load a configuration from a JSON file. Missing fields take their default.
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }

    pub fn validate(&self) -> Result<()> {
        if self.max_generations == 0 {
            return Err(SolverError::Configuration(
                "max_generations must be positive".to_string(),
            ));
        }
        if self.population_size == 0 || self.population_size % 2 != 0 {
            return Err(SolverError::Configuration(format!(
                "population_size must be a positive even number, got {}",
                self.population_size
            )));
        }
        if !(0.0..=1.0).contains(&self.mutation_rate) {
            return Err(SolverError::Configuration(format!(
                "mutation_rate must lie in [0, 1], got {}",
                self.mutation_rate
            )));
        }
        Ok(())
    }
}

/// Genetic Algorithm implementation
pub struct GeneticAlgorithm<'g> {
    config: GAConfig,
    graph: &'g WeightedGraph,
    initializer: Box<dyn PopulationInitializer>,
    selector: Box<dyn ParentSelector>,
    crossover: Box<dyn CrossoverOperator>,
    mutation: Box<dyn MutationOperator>,
    rng: ChaCha8Rng,
    population: Population,
    best: Option<BestTour>,
    history: Vec<GenerationRecord>,
    generation: usize,
}

impl<'g> GeneticAlgorithm<'g> {
    /// Build a GA over `graph`. Fails if the configuration is invalid.
    pub fn new(graph: &'g WeightedGraph, config: GAConfig) -> Result<Self> {
        config.validate()?;

        let rng = ChaCha8Rng::seed_from_u64(config.seed);
        let crossover = config.crossover_type.build();
        let mutation = config.mutation_type.build();

        Ok(GeneticAlgorithm {
            config,
            graph,
            initializer: Box::new(RandomPermutationInitializer::new()),
            selector: Box::new(UniformPairSelector::new()),
            crossover,
            mutation,
            rng,
            population: Vec::new(),
            best: None,
            history: Vec::new(),
            generation: 0,
        })
    }

    pub fn with_initializer(mut self, initializer: impl PopulationInitializer + 'static) -> Self {
        self.initializer = Box::new(initializer);
        self
    }

    pub fn with_selector(mut self, selector: impl ParentSelector + 'static) -> Self {
        self.selector = Box::new(selector);
        self
    }

    pub fn with_crossover(mut self, crossover: impl CrossoverOperator + 'static) -> Self {
        self.crossover = Box::new(crossover);
        self
    }

    pub fn with_mutation(mut self, mutation: impl MutationOperator + 'static) -> Self {
        self.mutation = Box::new(mutation);
        self
    }

    /// Build generation 0 and reset the run state
    fn initialize_population(&mut self) {
        self.population = self
            .initializer
            .initialize(self.graph, self.config.population_size, &mut self.rng);
        self.best = None;
        self.history.clear();
        self.generation = 0;

        if self.population.len() != self.config.population_size {
            log::warn!(
                "[GA] Initializer produced {} individuals, expected {}",
                self.population.len(),
                self.config.population_size
            );
        }
    }

    /// Fitness of every individual of the current population
    fn evaluate_population(&self) -> Vec<Fitness> {
        let graph = self.graph;
        if self.config.parallel_evaluation {
            self.population.par_iter().map(|ind| ind.fitness(graph)).collect()
        } else {
            self.population.iter().map(|ind| ind.fitness(graph)).collect()
        }
    }

    /// Update the running best with every strictly better individual
    fn track_best(&mut self, scores: &[Fitness]) {
        let mut current = self
            .best
            .as_ref()
            .map(|b| b.fitness)
            .unwrap_or(Fitness::NoPath);

        for (individual, &fitness) in self.population.iter().zip(scores) {
            if fitness < current {
                current = fitness;
                self.best = Some(BestTour {
                    tour: individual.tour.clone(),
                    fitness,
                    generation: self.generation,
                });
            }
        }
    }

    /// Run one generation: evaluate, record, breed, mutate, replace
    fn evolve(&mut self) {
        let scores = self.evaluate_population();
        self.track_best(&scores);

        let record = GenerationRecord::from_scores(self.generation, &scores);
        log::debug!(
            "[GA] Gen {}  Mean {}  Best {}  Valid {}/{}",
            self.generation,
            record.mean_fitness,
            record.best_fitness,
            record.valid_count,
            scores.len()
        );
        self.history.push(record);

        let pairs: Vec<(&Individual, &Individual)> = (0..self.config.population_size / 2)
            .map(|_| self.selector.select(&self.population, &mut self.rng))
            .collect();

        let mut offspring = Vec::with_capacity(self.config.population_size);
        for (parent1, parent2) in pairs {
            let (child1, child2) = self.crossover.crossover(parent1, parent2, &mut self.rng);
            offspring.push(child1);
            offspring.push(child2);
        }

        for child in offspring.iter_mut() {
            self.mutation.mutate(child, self.config.mutation_rate, &mut self.rng);
        }

        self.population = offspring;
        self.generation += 1;
    }

    /// Run the genetic algorithm
    pub fn run(&mut self) -> Solution {
        log::info!(
            "[GA] Starting on '{}' ({} vertices): population {}, generations {}, mutation rate {}, seed {}",
            self.graph.name,
            self.graph.dimension(),
            self.config.population_size,
            self.config.max_generations,
            self.config.mutation_rate,
            self.config.seed
        );

        self.initialize_population();
        while self.generation < self.config.max_generations {
            self.evolve();
        }

        let solution = self.assemble_result();
        if solution.path_distance.is_finite() {
            log::info!(
                "[GA] Finished after {} generations: distance {}",
                self.generation,
                solution.path_distance
            );
        } else {
            log::warn!(
                "[GA] Finished after {} generations without a traversable tour in the last population",
                self.generation
            );
        }
        solution
    }

    /// Package the first minimum-fitness individual of the current population
    fn assemble_result(&self) -> Solution {
        let graph = self.graph;
        let chosen = self
            .population
            .iter()
            .min_by_key(|ind| ind.fitness(graph));
        let fallback = Individual::new(Vec::new());

        Solution::assemble(
            chosen.unwrap_or(&fallback),
            graph,
            self.history.clone(),
            self.best.clone(),
            self.config.seed,
        )
    }

    /// Best individual seen across all evaluated generations
    pub fn best_so_far(&self) -> Option<&BestTour> {
        self.best.as_ref()
    }

    /// Get current generation
    pub fn current_generation(&self) -> usize {
        self.generation
    }

    pub fn population(&self) -> &[Individual] {
        &self.population
    }

    pub fn history(&self) -> &[GenerationRecord] {
        &self.history
    }

    pub fn config(&self) -> &GAConfig {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::heuristics::crossover::SinglePointCrossover;
    use crate::heuristics::mutation::RandomResetMutation;
    use rand::RngCore;

    fn complete_graph(n: usize) -> WeightedGraph {
        let mut graph = WeightedGraph::new(n);
        for i in 0..n {
            for j in 0..n {
                graph.set_weight(i, j, ((i * 7 + j * 3) % 11 + 1) as f64).unwrap();
            }
        }
        graph
    }

    /// Fixed generation 0, ignoring the rng
    struct FixedPopulation(Vec<Vec<usize>>);

    impl PopulationInitializer for FixedPopulation {
        fn initialize(&self, _: &WeightedGraph, _: usize, _: &mut dyn RngCore) -> Population {
            self.0.iter().cloned().map(Individual::new).collect()
        }
    }

    /// Pairs (0, 1), (2, 3), ... in order
    struct SequentialPairs {
        next: std::cell::Cell<usize>,
    }

    impl ParentSelector for SequentialPairs {
        fn select<'a>(&self, population: &'a [Individual], _: &mut dyn RngCore) -> (&'a Individual, &'a Individual) {
            let i = self.next.get() % population.len();
            self.next.set(i + 2);
            (&population[i], &population[i + 1])
        }
    }

    /// Single-point crossover with a fixed cut
    struct FixedCut(usize);

    impl CrossoverOperator for FixedCut {
        fn crossover(&self, parent1: &Individual, parent2: &Individual, _: &mut dyn RngCore) -> (Individual, Individual) {
            SinglePointCrossover::splice(parent1, parent2, self.0)
        }
    }

    #[test]
    fn test_config_validation() {
        assert!(GAConfig::default().validate().is_ok());

        let invalid = [
            GAConfig { population_size: 0, ..Default::default() },
            GAConfig { population_size: 7, ..Default::default() },
            GAConfig { max_generations: 0, ..Default::default() },
            GAConfig { mutation_rate: -0.1, ..Default::default() },
            GAConfig { mutation_rate: 1.5, ..Default::default() },
            GAConfig { mutation_rate: f64::NAN, ..Default::default() },
        ];
        for config in invalid {
            let graph = complete_graph(4);
            assert!(matches!(
                GeneticAlgorithm::new(&graph, config).err(),
                Some(SolverError::Configuration(_))
            ));
        }
    }

    #[test]
    fn test_config_from_json_uses_defaults() {
        let path = std::env::temp_dir().join(format!("ga-tsp-config-{}.json", std::process::id()));
        std::fs::write(&path, r#"{ "population_size": 10, "crossover_type": "Order" }"#).unwrap();
        let config = GAConfig::from_json_file(&path).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(config.population_size, 10);
        assert_eq!(config.crossover_type, CrossoverType::Order);
        assert_eq!(config.max_generations, 150);
        assert_eq!(config.explore_rate, 0.6);
    }

    #[test]
    fn test_population_invariants_hold_every_generation() {
        let graph = complete_graph(6);
        let config = GAConfig {
            population_size: 12,
            max_generations: 1,
            mutation_rate: 0.3,
            seed: 9,
            ..Default::default()
        };
        let mut ga = GeneticAlgorithm::new(&graph, config).unwrap();

        ga.initialize_population();
        assert!(ga.population().iter().all(|i| i.tour[0] == 0 && i.is_permutation(6)));

        for generation in 0..25 {
            assert_eq!(ga.current_generation(), generation);
            assert_eq!(ga.population().len(), 12);
            assert!(ga.population().iter().all(|i| i.len() == 6));
            ga.evolve();
        }
        assert_eq!(ga.history().len(), 25);
    }

    #[test]
    fn test_run_length_and_history() {
        let graph = complete_graph(5);
        let config = GAConfig {
            population_size: 8,
            max_generations: 17,
            ..Default::default()
        };
        let mut ga = GeneticAlgorithm::new(&graph, config).unwrap();
        let solution = ga.run();

        assert_eq!(solution.generations, 17);
        assert_eq!(solution.generation_history.len(), 17);
        for (i, record) in solution.generation_history.iter().enumerate() {
            assert_eq!(record.generation, i);
        }
        assert_eq!(solution.path.len(), 6);
        assert_eq!(solution.path.first(), solution.path.last());
        // complete graph: every tour is traversable
        assert!(solution.path_distance.is_finite());
    }

    #[test]
    fn test_hand_computed_single_generation() {
        // symmetric complete graph on 4 vertices
        let graph = WeightedGraph::from_matrix(vec![
            vec![Some(0.0), Some(1.0), Some(4.0), Some(2.0)],
            vec![Some(1.0), Some(0.0), Some(3.0), Some(5.0)],
            vec![Some(4.0), Some(3.0), Some(0.0), Some(6.0)],
            vec![Some(2.0), Some(5.0), Some(6.0), Some(0.0)],
        ])
        .unwrap();
        let config = GAConfig {
            population_size: 4,
            max_generations: 1,
            mutation_rate: 0.0,
            seed: 1,
            ..Default::default()
        };

        let mut ga = GeneticAlgorithm::new(&graph, config)
            .unwrap()
            .with_initializer(FixedPopulation(vec![
                vec![0, 1, 2, 3], // 12
                vec![0, 2, 3, 1], // 16
                vec![0, 3, 1, 2], // 14
                vec![0, 1, 3, 2], // 16
            ]))
            .with_selector(SequentialPairs { next: std::cell::Cell::new(0) })
            .with_crossover(FixedCut(2));
        let solution = ga.run();

        // children: [0,1,3,1]=12, [0,2,2,3]=12, [0,3,3,2]=12, [0,1,1,2]=8
        assert_eq!(solution.path, vec![0, 1, 1, 2, 0]);
        assert_eq!(solution.path_distance, Fitness::Finite(8.0));
        assert!(!solution.hamiltonian);
        assert_eq!(solution.generation_history.len(), 1);
        assert_eq!(solution.generation_history[0].mean_fitness, Fitness::Finite(14.5));

        // the running best only covers evaluated generations
        let best = ga.best_so_far().unwrap();
        assert_eq!(best.tour, vec![0, 1, 2, 3]);
        assert_eq!(best.fitness, Fitness::Finite(12.0));
        assert_eq!(best.generation, 0);
    }

    #[test]
    fn test_identical_population_is_stable() {
        let graph = complete_graph(5);
        let config = GAConfig {
            population_size: 6,
            max_generations: 10,
            mutation_rate: 0.0,
            ..Default::default()
        };
        let tour = vec![0, 2, 4, 1, 3];
        let expected = crate::fitness::evaluate(&tour, &graph);

        let mut ga = GeneticAlgorithm::new(&graph, config)
            .unwrap()
            .with_initializer(FixedPopulation(vec![tour.clone(); 6]));
        let solution = ga.run();

        assert_eq!(solution.tour(), tour.as_slice());
        assert_eq!(solution.path_distance, expected);
        assert!(solution.generation_history.iter().all(|r| r.mean_fitness == expected));
    }

    #[test]
    fn test_first_minimum_wins_ties() {
        let graph = complete_graph(4);
        let config = GAConfig {
            population_size: 2,
            max_generations: 1,
            mutation_rate: 0.0,
            ..Default::default()
        };
        // both children equal their parents: cut at 0 swaps them
        let mut ga = GeneticAlgorithm::new(&graph, config)
            .unwrap()
            .with_initializer(FixedPopulation(vec![vec![0, 1, 2, 3], vec![0, 3, 2, 1]]))
            .with_selector(SequentialPairs { next: std::cell::Cell::new(0) })
            .with_crossover(FixedCut(0));
        let solution = ga.run();

        let a = crate::fitness::evaluate(&[0, 1, 2, 3], &graph);
        let b = crate::fitness::evaluate(&[0, 3, 2, 1], &graph);
        // last population is [p2, p1]
        let expected = if b <= a { vec![0, 3, 2, 1, 0] } else { vec![0, 1, 2, 3, 0] };
        assert_eq!(solution.path, expected);
    }

    #[test]
    fn test_untraversable_graph() {
        let graph = WeightedGraph::new(4);
        let config = GAConfig {
            population_size: 4,
            max_generations: 5,
            mutation_rate: 0.0,
            ..Default::default()
        };
        let mut ga = GeneticAlgorithm::new(&graph, config).unwrap();
        let solution = ga.run();

        assert!(ga.best_so_far().is_none());
        assert_eq!(solution.path_distance, Fitness::NoPath);
        assert!(solution.generation_history.iter().all(|r| r.mean_fitness == Fitness::NoPath));
    }

    #[test]
    fn test_parallel_evaluation_matches_sequential() {
        let graph = complete_graph(7);
        let base = GAConfig {
            population_size: 20,
            max_generations: 30,
            mutation_rate: 0.05,
            seed: 77,
            ..Default::default()
        };
        let parallel = GAConfig { parallel_evaluation: true, ..base.clone() };

        let a = GeneticAlgorithm::new(&graph, base).unwrap().run();
        let b = GeneticAlgorithm::new(&graph, parallel).unwrap().run();

        assert_eq!(a.path, b.path);
        assert_eq!(a.generation_history, b.generation_history);
    }

    #[test]
    fn test_same_seed_same_run() {
        let graph = complete_graph(8);
        let config = GAConfig {
            population_size: 30,
            max_generations: 40,
            mutation_rate: 0.1,
            seed: 2024,
            ..Default::default()
        };

        let a = GeneticAlgorithm::new(&graph, config.clone()).unwrap().run();
        let b = GeneticAlgorithm::new(&graph, config).unwrap().run();

        assert_eq!(a.path, b.path);
        assert_eq!(a.path_distance, b.path_distance);
        assert_eq!(a.generation_history, b.generation_history);
        assert_eq!(a.best_so_far, b.best_so_far);
    }

    #[test]
    fn test_finds_the_only_traversable_tour() {
        // directed ring 0 -> 1 -> 2 -> 3 -> 4 -> 0 is the only Hamiltonian cycle.
        // Permutation-preserving operators rule out repeated-vertex tours of cost 0.
        let graph = WeightedGraph::parse("5\n0 1 3\n1 2 5\n2 3 2\n3 4 7\n4 0 4\n").unwrap();

        let found = (0..5u64)
            .filter(|&seed| {
                let config = GAConfig {
                    population_size: 100,
                    max_generations: 200,
                    crossover_type: CrossoverType::Order,
                    mutation_type: MutationType::Swap,
                    seed,
                    ..Default::default()
                };
                let mut ga = GeneticAlgorithm::new(&graph, config).unwrap();
                ga.run();
                assert!(ga.population().iter().all(|i| i.is_permutation(5)));
                ga.best_so_far()
                    .map(|b| b.fitness == Fitness::Finite(21.0) && b.tour == vec![0, 1, 2, 3, 4])
                    .unwrap_or(false)
            })
            .count();

        assert!(found >= 4, "ring found in only {} of 5 runs", found);
    }

    #[test]
    fn test_default_pipeline_follows_the_draw_order() {
        let graph = complete_graph(5);
        let config = GAConfig {
            population_size: 4,
            max_generations: 1,
            mutation_rate: 0.0,
            seed: 13,
            ..Default::default()
        };
        let solution = GeneticAlgorithm::new(&graph, config.clone()).unwrap().run();

        // replay: initialize, every selection, one crossover per pair, one mutation per child
        let mut rng = ChaCha8Rng::seed_from_u64(config.seed);
        let population = RandomPermutationInitializer::new().initialize(&graph, 4, &mut rng);
        let selector = UniformPairSelector::new();
        let pairs: Vec<(&Individual, &Individual)> =
            (0..2).map(|_| selector.select(&population, &mut rng)).collect();

        let mut children = Vec::new();
        for (parent1, parent2) in pairs {
            let (child1, child2) = SinglePointCrossover.crossover(parent1, parent2, &mut rng);
            children.push(child1);
            children.push(child2);
        }
        for child in children.iter_mut() {
            RandomResetMutation.mutate(child, 0.0, &mut rng);
        }

        let scores: Vec<Fitness> = population.iter().map(|i| i.fitness(&graph)).collect();
        let expected = children.iter().min_by_key(|c| c.fitness(&graph)).unwrap();

        assert_eq!(solution.path, expected.closed_cycle());
        assert_eq!(solution.path_distance, expected.fitness(&graph));
        assert_eq!(solution.generation_history[0].mean_fitness, Fitness::mean(&scores));
    }
}
