//! Benchmarking and experimentation module.
//!
//! Runs Simulated Annealing several times per instance with seeds
//! `0..num_runs`, collects per-run results and aggregates them into
//! per-instance statistics, CSV files and a text report.

use crate::error::ConfigError;
use crate::heuristics::annealing::{AnnealingConfig, SimulatedAnnealing};
use crate::instance::TspInstance;

use indicatif::{ProgressBar, ProgressStyle};
use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};
use statrs::statistics::Statistics;
use std::collections::HashMap;
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// Result of a single annealing run on an instance
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunResult {
    /// Instance name
    pub instance: String,
    /// Instance dimension
    pub dimension: usize,
    /// Seed of the run
    pub seed: u64,
    /// Solution cost
    pub cost: f64,
    /// Computation time in seconds
    pub time: f64,
    /// Number of iterations
    pub iterations: usize,
    /// Gap to best known in percent (if available)
    pub gap_to_best: Option<f64>,
}

/// Aggregated statistics for an instance
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunStatistics {
    pub instance: String,
    pub dimension: usize,
    pub num_runs: usize,
    pub best_cost: f64,
    pub avg_cost: f64,
    pub worst_cost: f64,
    /// Sample standard deviation of cost (0 for a single run)
    pub std_cost: f64,
    pub avg_time: f64,
    /// Seed that produced `best_cost`
    pub best_seed: u64,
}

/// Benchmark configuration
#[derive(Debug, Clone)]
pub struct BenchmarkConfig {
    /// Number of runs per instance
    pub num_runs: usize,
    /// Annealing parameters shared by all runs; the seed is overridden per run
    pub annealing: AnnealingConfig,
    /// Show a progress bar while running
    pub show_progress: bool,
}

impl Default for BenchmarkConfig {
    fn default() -> Self {
        BenchmarkConfig {
            num_runs: 5,
            annealing: AnnealingConfig::default(),
            show_progress: true,
        }
    }
}

/// Benchmarking engine
pub struct Benchmark {
    config: BenchmarkConfig,
    results: Vec<RunResult>,
    best_known: HashMap<String, f64>,
}

impl Benchmark {
    pub fn new(config: BenchmarkConfig) -> Self {
        Benchmark {
            config,
            results: Vec::new(),
            best_known: HashMap::new(),
        }
    }

    /// Set best known solution for an instance
    pub fn set_best_known(&mut self, instance_name: &str, cost: f64) {
        self.best_known.insert(instance_name.to_string(), cost);
    }

    /// Run `num_runs` seeded annealing runs on an instance
    pub fn run_on_instance(&mut self, instance: &TspInstance) -> Result<(), ConfigError> {
        log::info!("Running benchmark on instance: {}", instance.name);
        self.config.annealing.validate()?;

        let progress = if self.config.show_progress {
            ProgressBar::new(self.config.num_runs as u64)
        } else {
            ProgressBar::hidden()
        };
        if let Ok(style) = ProgressStyle::with_template("{msg} [{bar:40}] {pos}/{len} ({elapsed})") {
            progress.set_style(style.progress_chars("=> "));
        }
        progress.set_message(instance.name.clone());

        for seed in 0..self.config.num_runs as u64 {
            let sa = SimulatedAnnealing::with_config(self.config.annealing.clone().with_seed(seed));
            let solution = sa.solve(instance)?;

            let gap_to_best = self
                .best_known
                .get(&instance.name)
                .map(|&best| (solution.cost - best) / best * 100.0);

            self.results.push(RunResult {
                instance: instance.name.clone(),
                dimension: instance.dimension,
                seed,
                cost: solution.cost,
                time: solution.computation_time,
                iterations: solution.iterations.unwrap_or(0),
                gap_to_best,
            });
            progress.inc(1);
        }

        progress.finish_and_clear();
        Ok(())
    }

    /// Run benchmark on multiple instances
    pub fn run_on_instances(&mut self, instances: &[TspInstance]) -> Result<(), ConfigError> {
        for instance in instances {
            self.run_on_instance(instance)?;
        }
        Ok(())
    }

    /// Compute statistics for each instance, ordered by dimension
    pub fn compute_statistics(&self) -> Vec<RunStatistics> {
        let mut by_instance: HashMap<&str, Vec<&RunResult>> = HashMap::new();
        for result in &self.results {
            by_instance.entry(result.instance.as_str()).or_default().push(result);
        }

        let mut statistics: Vec<RunStatistics> = by_instance
            .into_iter()
            .filter_map(|(name, runs)| {
                let best = runs.iter().min_by_key(|r| OrderedFloat(r.cost))?;
                let worst = runs.iter().max_by_key(|r| OrderedFloat(r.cost))?;
                let costs: Vec<f64> = runs.iter().map(|r| r.cost).collect();
                let times: Vec<f64> = runs.iter().map(|r| r.time).collect();

                let std_cost = if costs.len() > 1 { costs.iter().std_dev() } else { 0.0 };

                Some(RunStatistics {
                    instance: name.to_string(),
                    dimension: best.dimension,
                    num_runs: runs.len(),
                    best_cost: best.cost,
                    avg_cost: costs.iter().mean(),
                    worst_cost: worst.cost,
                    std_cost,
                    avg_time: times.iter().mean(),
                    best_seed: best.seed,
                })
            })
            .collect();

        statistics.sort_by(|a, b| a.dimension.cmp(&b.dimension).then_with(|| a.instance.cmp(&b.instance)));
        statistics
    }

    /// Write per-run results as CSV
    pub fn write_csv<W: Write>(&self, writer: W) -> std::io::Result<()> {
        let mut writer = csv::Writer::from_writer(writer);
        for result in &self.results {
            writer.serialize(result)?;
        }
        writer.flush()?;
        Ok(())
    }

    /// Export results to CSV
    pub fn export_to_csv<P: AsRef<Path>>(&self, path: P) -> std::io::Result<()> {
        self.write_csv(File::create(path)?)
    }

    /// Export statistics to CSV
    pub fn export_statistics_csv<P: AsRef<Path>>(&self, path: P) -> std::io::Result<()> {
        let file = File::create(path)?;
        let mut writer = csv::Writer::from_writer(file);

        for stat in self.compute_statistics() {
            writer.serialize(stat)?;
        }

        writer.flush()?;
        Ok(())
    }

    /// Generate summary report
    pub fn generate_report(&self) -> String {
        let mut report = String::new();

        report.push_str("========================================\n");
        report.push_str("   TSP Simulated Annealing Benchmark\n");
        report.push_str("========================================\n");
        report.push_str(&format!(
            "Generated: {}\n",
            chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
        ));
        let sa = &self.config.annealing;
        report.push_str(&format!(
            "Parameters: T0={}, cooling={}, iterations={}, runs={}\n\n",
            sa.initial_temp, sa.cooling_rate, sa.max_iterations, self.config.num_runs
        ));

        report.push_str(&"-".repeat(80));
        report.push('\n');
        report.push_str(&format!(
            "{:<20} {:>6} {:>12} {:>12} {:>12} {:>8} {:>6}\n",
            "Instance", "N", "Best", "Average", "Worst", "Std", "Time"
        ));
        report.push_str(&"-".repeat(80));
        report.push('\n');

        for stat in self.compute_statistics() {
            report.push_str(&format!(
                "{:<20} {:>6} {:>12.2} {:>12.2} {:>12.2} {:>8.2} {:>6.3}\n",
                stat.instance,
                stat.dimension,
                stat.best_cost,
                stat.avg_cost,
                stat.worst_cost,
                stat.std_cost,
                stat.avg_time
            ));
            if let Some(&best) = self.best_known.get(&stat.instance) {
                report.push_str(&format!(
                    "{:<20} best known {:.2}, gap {:.2}%\n",
                    "",
                    best,
                    (stat.best_cost - best) / best * 100.0
                ));
            }
        }

        report.push_str(&"-".repeat(80));
        report.push('\n');
        report
    }

    /// Get all results
    pub fn results(&self) -> &[RunResult] {
        &self.results
    }
}

/// Helper function to load instances from a directory
pub fn load_instances_from_dir<P: AsRef<Path>>(dir: P) -> Vec<TspInstance> {
    let mut instances = Vec::new();

    if let Ok(entries) = std::fs::read_dir(dir) {
        for entry in entries.flatten() {
            let path = entry.path();
            if path.extension().map(|e| e == "tsp").unwrap_or(false) {
                match TspInstance::from_file(&path) {
                    Ok(instance) => instances.push(instance),
                    Err(e) => log::warn!("Skipping {:?}: {}", path, e),
                }
            }
        }
    }

    // Sort by dimension
    instances.sort_by_key(|i| i.dimension);

    instances
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Point;

    fn quiet_config(runs: usize) -> BenchmarkConfig {
        BenchmarkConfig {
            num_runs: runs,
            annealing: AnnealingConfig::new(1000.0, 0.995, 5000),
            show_progress: false,
        }
    }

    fn square() -> TspInstance {
        TspInstance::from_points(
            "square",
            vec![
                Point::new(0.0, 0.0),
                Point::new(0.0, 2.0),
                Point::new(2.0, 2.0),
                Point::new(2.0, 0.0),
            ],
        )
    }

    #[test]
    fn test_benchmark_config() {
        let config = BenchmarkConfig::default();
        assert_eq!(config.num_runs, 5);
        assert!(config.annealing.validate().is_ok());
    }

    #[test]
    fn test_run_and_statistics() {
        let mut benchmark = Benchmark::new(quiet_config(4));
        benchmark.set_best_known("square", 8.0);
        benchmark.run_on_instance(&square()).unwrap();

        assert_eq!(benchmark.results().len(), 4);
        let seeds: Vec<u64> = benchmark.results().iter().map(|r| r.seed).collect();
        assert_eq!(seeds, vec![0, 1, 2, 3]);
        assert!(benchmark.results().iter().all(|r| r.gap_to_best.is_some()));

        let stats = benchmark.compute_statistics();
        assert_eq!(stats.len(), 1);
        let stat = &stats[0];
        assert_eq!(stat.num_runs, 4);
        assert!(stat.best_cost <= stat.avg_cost + 1e-9);
        assert!(stat.avg_cost <= stat.worst_cost + 1e-9);
        assert!(stat.std_cost >= 0.0);

        let report = benchmark.generate_report();
        assert!(report.contains("square"));
        assert!(report.contains("best known 8.00"));
    }

    #[test]
    fn test_single_run_has_zero_std() {
        let mut benchmark = Benchmark::new(quiet_config(1));
        benchmark.run_on_instance(&square()).unwrap();
        assert_eq!(benchmark.compute_statistics()[0].std_cost, 0.0);
    }

    #[test]
    fn test_statistics_ordered_by_dimension() {
        let triangle = TspInstance::from_points(
            "triangle",
            vec![Point::new(0.0, 0.0), Point::new(3.0, 0.0), Point::new(3.0, 4.0)],
        );
        let mut benchmark = Benchmark::new(quiet_config(2));
        benchmark.run_on_instances(&[square(), triangle]).unwrap();

        let stats = benchmark.compute_statistics();
        let names: Vec<&str> = stats.iter().map(|s| s.instance.as_str()).collect();
        assert_eq!(names, vec!["triangle", "square"]);
        assert!((stats[0].best_cost - 12.0).abs() < 1e-9);
    }

    #[test]
    fn test_invalid_annealing_config() {
        let mut config = quiet_config(2);
        config.annealing.cooling_rate = 1.0;
        let mut benchmark = Benchmark::new(config);
        assert!(benchmark.run_on_instance(&square()).is_err());
        assert!(benchmark.results().is_empty());
    }

    #[test]
    fn test_write_csv() {
        let mut benchmark = Benchmark::new(quiet_config(2));
        benchmark.run_on_instance(&square()).unwrap();

        let mut buffer = Vec::new();
        benchmark.write_csv(&mut buffer).unwrap();
        let text = String::from_utf8(buffer).unwrap();
        let mut lines = text.lines();
        assert_eq!(
            lines.next(),
            Some("instance,dimension,seed,cost,time,iterations,gap_to_best")
        );
        assert_eq!(lines.count(), 2);
    }
}
