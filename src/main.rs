//! GA-TSP Solver - Command Line Interface
//!
//! Approximates a minimum-cost Hamiltonian cycle with a genetic algorithm.

use clap::{Args, Parser, Subcommand, ValueEnum};
use ga_tsp_solver::benchmark::{Benchmark, BenchmarkConfig};
use ga_tsp_solver::graph::WeightedGraph;
use ga_tsp_solver::heuristics::crossover::CrossoverType;
use ga_tsp_solver::heuristics::genetic::{GAConfig, GeneticAlgorithm};
use ga_tsp_solver::heuristics::mutation::MutationType;
use ga_tsp_solver::visualization::Visualizer;
use ga_tsp_solver::Result;

use std::path::{Path, PathBuf};
use std::time::Instant;

#[derive(Parser)]
#[command(name = "ga-tsp-solver")]
#[command(author = "M2 AI2D Student")]
#[command(version = "1.0")]
#[command(about = "A genetic algorithm solver for minimum-cost Hamiltonian cycles")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the genetic algorithm on a graph
    Solve {
        #[command(flatten)]
        params: GaParams,

        /// Output solution to file (JSON)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Write the convergence trace to a CSV file
        #[arg(long)]
        history: Option<PathBuf>,

        /// Write an SVG convergence plot
        #[arg(long)]
        plot: Option<PathBuf>,

        /// Verbose output
        #[arg(short, long)]
        verbose: bool,
    },

    /// Print statistics about a graph
    Analyze {
        /// Path to the graph file
        #[arg(short, long)]
        graph: PathBuf,
    },

    /// Run the GA with several consecutive seeds
    Benchmark {
        #[command(flatten)]
        params: GaParams,

        /// Number of seeded runs
        #[arg(short, long, default_value = "10")]
        runs: usize,

        /// Run seeds one after the other instead of in parallel
        #[arg(long)]
        sequential: bool,

        /// Output CSV file
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[derive(Args)]
struct GaParams {
    /// Path to the graph file
    #[arg(short, long)]
    graph: PathBuf,

    /// JSON configuration file; flags below override its values
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Number of generations
    #[arg(long)]
    generations: Option<usize>,

    /// Population size (even)
    #[arg(short, long)]
    population: Option<usize>,

    /// Per-gene mutation probability
    #[arg(short, long)]
    mutation_rate: Option<f64>,

    /// Explore rate (accepted, currently unused)
    #[arg(long)]
    explore_rate: Option<f64>,

    /// Random seed
    #[arg(short, long)]
    seed: Option<u64>,

    /// Crossover operator
    #[arg(long, value_enum)]
    crossover: Option<Crossover>,

    /// Mutation operator
    #[arg(long, value_enum)]
    mutation: Option<Mutation>,

    /// Evaluate fitness in parallel
    #[arg(long)]
    parallel: bool,
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum, Debug)]
enum Crossover {
    /// Single-point positional crossover
    SinglePoint,
    /// Order crossover (keeps permutations)
    Order,
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum, Debug)]
enum Mutation {
    /// Replace genes with random vertices
    RandomReset,
    /// Swap genes (keeps permutations)
    Swap,
}

impl GaParams {
    fn to_config(&self) -> Result<GAConfig> {
        let mut config = match &self.config {
            Some(path) => GAConfig::from_json_file(path)?,
            None => GAConfig::default(),
        };

        if let Some(generations) = self.generations {
            config.max_generations = generations;
        }
        if let Some(population) = self.population {
            config.population_size = population;
        }
        if let Some(rate) = self.mutation_rate {
            config.mutation_rate = rate;
        }
        if let Some(rate) = self.explore_rate {
            config.explore_rate = rate;
        }
        if let Some(seed) = self.seed {
            config.seed = seed;
        }
        if let Some(crossover) = self.crossover {
            config.crossover_type = match crossover {
                Crossover::SinglePoint => CrossoverType::SinglePoint,
                Crossover::Order => CrossoverType::Order,
            };
        }
        if let Some(mutation) = self.mutation {
            config.mutation_type = match mutation {
                Mutation::RandomReset => MutationType::RandomReset,
                Mutation::Swap => MutationType::Swap,
            };
        }
        if self.parallel {
            config.parallel_evaluation = true;
        }

        config.validate()?;
        Ok(config)
    }
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();

    let outcome = match cli.command {
        Commands::Solve { params, output, history, plot, verbose } => {
            solve(&params, output, history, plot, verbose)
        }

        Commands::Analyze { graph } => analyze(&graph),

        Commands::Benchmark { params, runs, sequential, output } => {
            run_benchmark(&params, runs, !sequential, output)
        }
    };

    if let Err(e) = outcome {
        log::error!("{}", e);
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn load_graph(path: &Path) -> Result<WeightedGraph> {
    println!("Loading graph from {:?}...", path);
    let graph = WeightedGraph::from_file(path)?;
    println!("  {} vertices", graph.dimension());
    Ok(graph)
}

fn solve(
    params: &GaParams,
    output: Option<PathBuf>,
    history: Option<PathBuf>,
    plot: Option<PathBuf>,
    verbose: bool,
) -> Result<()> {
    let graph = load_graph(&params.graph)?;
    let config = params.to_config()?;

    if verbose {
        println!("{}", graph.statistics());
        println!("Configuration: {:?}", config);
    }

    let start = Instant::now();
    let mut ga = GeneticAlgorithm::new(&graph, config)?;
    let solution = ga.run();
    let elapsed = start.elapsed();

    println!("\n========== Results ==========");
    println!("Algorithm: {}", solution.algorithm);
    println!("Path: {:?}", solution.path);
    println!("Path distance: {}", solution.path_distance);
    println!("Hamiltonian: {}", solution.hamiltonian);
    if let Some(best) = &solution.best_so_far {
        println!("Best seen: {} (generation {})", best.fitness, best.generation);
    }
    println!("Generations: {}", solution.generations);
    println!("GenAlgo runtime: {:.2}s", elapsed.as_secs_f64());

    if verbose {
        println!("\nMean fitness per generation:");
        for record in &solution.generation_history {
            println!("  {:>5}  {}", record.generation, record.mean_fitness);
        }
    }

    if let Some(out_path) = output {
        let json = serde_json::to_string_pretty(&solution)?;
        std::fs::write(&out_path, json)?;
        println!("\nSolution saved to {:?}", out_path);
    }

    if let Some(history_path) = history {
        solution.export_history_csv(&history_path)?;
        println!("Convergence trace saved to {:?}", history_path);
    }

    if let Some(plot_path) = plot {
        let viz = Visualizer::new();
        let svg = viz.convergence_svg(&solution);
        viz.save_svg(&svg, &plot_path)?;
        println!("Convergence plot saved to {:?}", plot_path);
    }

    Ok(())
}

fn analyze(path: &Path) -> Result<()> {
    let graph = load_graph(path)?;
    println!("{}", graph.statistics());
    Ok(())
}

fn run_benchmark(params: &GaParams, runs: usize, parallel: bool, output: Option<PathBuf>) -> Result<()> {
    let graph = load_graph(&params.graph)?;
    let config = params.to_config()?;

    let mut benchmark = Benchmark::new(BenchmarkConfig { num_runs: runs, parallel });
    benchmark.run(&graph, &config)?;

    println!("{}", benchmark.generate_report());

    if let Some(out_path) = output {
        benchmark.export_to_csv(&out_path)?;
        println!("Results saved to {:?}", out_path);
    }

    Ok(())
}
