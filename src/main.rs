//! TSP Annealing - Command Line Interface
//!
//! Approximates short closed tours over TSP-LIB coordinate files with Simulated Annealing.

use clap::{Args, Parser, Subcommand};
use tsp_annealing::benchmark::{load_instances_from_dir, Benchmark, BenchmarkConfig};
use tsp_annealing::heuristics::annealing::{AnnealingConfig, SimulatedAnnealing};
use tsp_annealing::instance::TspInstance;
use tsp_annealing::visualization::Visualizer;

use std::error::Error;
use std::path::{Path, PathBuf};
use std::time::Instant;

#[derive(Parser)]
#[command(name = "tsp-annealing")]
#[command(author = "M2 AI2D Student")]
#[command(version = "1.0")]
#[command(about = "Simulated Annealing solver for the Euclidean TSP")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Annealing parameters; each flag overrides the config file value
#[derive(Args, Debug, Clone)]
struct AnnealingArgs {
    /// JSON file with annealing parameters
    #[arg(long)]
    config: Option<PathBuf>,

    /// Initial temperature [default: 10000]
    #[arg(long)]
    init_temp: Option<f64>,

    /// Cooling rate in (0, 1) [default: 0.999]
    #[arg(long)]
    cool_rate: Option<f64>,

    /// Number of iterations [default: 10000]
    #[arg(long)]
    max_iter: Option<usize>,
}

impl AnnealingArgs {
    fn to_config(&self) -> Result<AnnealingConfig, Box<dyn Error>> {
        let mut config = match &self.config {
            Some(path) => AnnealingConfig::from_json_file(path)?,
            None => AnnealingConfig::default(),
        };
        if let Some(t) = self.init_temp {
            config.initial_temp = t;
        }
        if let Some(rate) = self.cool_rate {
            config.cooling_rate = rate;
        }
        if let Some(n) = self.max_iter {
            config.max_iterations = n;
        }
        config.validate()?;
        Ok(config)
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Solve one instance
    Solve {
        /// Path to the instance file
        #[arg(short, long)]
        instance: PathBuf,

        #[command(flatten)]
        annealing: AnnealingArgs,

        /// Random seed (drawn from entropy when omitted)
        #[arg(short, long)]
        seed: Option<u64>,

        /// Output solution to JSON file
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Generate SVG visualization next to the instance file
        #[arg(long)]
        visualize: bool,

        /// Verbose output
        #[arg(short, long)]
        verbose: bool,
    },

    /// Run repeated seeded runs on a directory of instances
    Benchmark {
        /// Directory containing instance files
        #[arg(short, long)]
        dir: PathBuf,

        /// Output directory for results
        #[arg(short, long, default_value = "results")]
        output: PathBuf,

        /// Number of runs per instance
        #[arg(short, long, default_value = "5")]
        runs: usize,

        /// Maximum instance size
        #[arg(long)]
        max_size: Option<usize>,

        #[command(flatten)]
        annealing: AnnealingArgs,
    },

    /// Analyze an instance
    Analyze {
        /// Path to the instance file
        #[arg(short, long)]
        instance: PathBuf,
    },
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();

    let outcome = match cli.command {
        Commands::Solve { instance, annealing, seed, output, visualize, verbose } => {
            solve_instance(&instance, &annealing, seed, output, visualize, verbose)
        }

        Commands::Benchmark { dir, output, runs, max_size, annealing } => {
            run_benchmark(&dir, &output, runs, max_size, &annealing)
        }

        Commands::Analyze { instance } => analyze_instance(&instance),
    };

    if let Err(e) = outcome {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn solve_instance(
    path: &Path,
    annealing: &AnnealingArgs,
    seed: Option<u64>,
    output: Option<PathBuf>,
    visualize: bool,
    verbose: bool,
) -> Result<(), Box<dyn Error>> {
    println!("Loading instance from {:?}...", path);
    let instance = TspInstance::from_file(path)?;

    let mut config = annealing.to_config()?;
    if seed.is_some() {
        config.seed = seed;
    }

    if verbose {
        println!("{}", instance.statistics());
        println!(
            "Parameters: T0={}, cooling rate={}, iterations={}",
            config.initial_temp, config.cooling_rate, config.max_iterations
        );
    }

    println!("Solving with Simulated Annealing...");
    let start = Instant::now();
    let solution = SimulatedAnnealing::with_config(config).solve(&instance)?;
    let elapsed = start.elapsed();

    println!("\n========== Results ==========");
    println!("Instance: {} ({} cities)", instance.name, instance.dimension);
    println!("Final cost: {:.4}", solution.cost);
    println!("Time: {:.4}s", elapsed.as_secs_f64());
    if let Some(iter) = solution.iterations {
        println!("Iterations: {}", iter);
    }
    println!("Solution [seq of cities]: {}", solution.tour_string());

    if let Some(out_path) = output {
        let json = serde_json::to_string_pretty(&solution)?;
        std::fs::write(&out_path, json)?;
        println!("\nSolution saved to {:?}", out_path);
    }

    if visualize {
        let viz = Visualizer::new();
        let svg = viz.generate_svg(&instance, &solution);
        let svg_path = path.with_extension("svg");
        viz.save_svg(&svg, &svg_path)?;
        println!("Visualization saved to {:?}", svg_path);
    }

    Ok(())
}

fn run_benchmark(
    dir: &Path,
    output: &Path,
    runs: usize,
    max_size: Option<usize>,
    annealing: &AnnealingArgs,
) -> Result<(), Box<dyn Error>> {
    println!("Loading instances from {:?}...", dir);

    let mut instances = load_instances_from_dir(dir);

    if let Some(max) = max_size {
        instances.retain(|i| i.dimension <= max);
    }

    println!("Found {} instances", instances.len());

    if instances.is_empty() {
        return Err(format!("no .tsp instances found in {:?}", dir).into());
    }

    std::fs::create_dir_all(output)?;

    let config = BenchmarkConfig {
        num_runs: runs,
        annealing: annealing.to_config()?,
        ..Default::default()
    };

    let mut benchmark = Benchmark::new(config);

    for (i, instance) in instances.iter().enumerate() {
        println!(
            "\n[{}/{}] Processing {} (n={})...",
            i + 1,
            instances.len(),
            instance.name,
            instance.dimension
        );

        benchmark.run_on_instance(instance)?;
    }

    let results_path = output.join("results.csv");
    benchmark.export_to_csv(&results_path)?;
    println!("\nResults exported to {:?}", results_path);

    let stats_path = output.join("statistics.csv");
    benchmark.export_statistics_csv(&stats_path)?;
    println!("Statistics exported to {:?}", stats_path);

    let report = benchmark.generate_report();
    println!("\n{}", report);

    let report_path = output.join("report.txt");
    std::fs::write(&report_path, &report)?;
    println!("Report saved to {:?}", report_path);

    Ok(())
}

fn analyze_instance(path: &Path) -> Result<(), Box<dyn Error>> {
    let instance = TspInstance::from_file(path)?;

    println!("========== Instance Analysis ==========\n");
    println!("{}", instance.statistics());
    if !instance.comment.is_empty() {
        println!("Comment: {}", instance.comment);
    }

    Ok(())
}
