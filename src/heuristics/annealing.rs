//! Simulated Annealing for the Euclidean TSP.
//!
//! The search starts from a uniformly random permutation and perturbs it
//! with single transpositions (swap the cities at two distinct positions).
//! Improving moves are always accepted; worsening moves are accepted with
//! probability `exp((cost - candidate) / temperature)`. The temperature is
//! multiplied by the cooling rate once per iteration, whatever the outcome.
//!
//! A single working tour is kept. Since improving moves are never rejected,
//! it also serves as the reported solution.

use crate::error::{ConfigError, ConfigFileError};
use crate::geometry::{is_permutation, tour_cost, Point};
use crate::instance::TspInstance;
use crate::solution::Solution;
use rand::prelude::*;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use std::time::Instant;

/// Simulated Annealing configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnnealingConfig {
    /// Initial temperature
    pub initial_temp: f64,
    /// Geometric cooling factor applied every iteration, in (0, 1)
    pub cooling_rate: f64,
    /// Number of iterations (one neighbor evaluation each)
    pub max_iterations: usize,
    /// Random seed; drawn from entropy when absent
    pub seed: Option<u64>,
}

impl Default for AnnealingConfig {
    fn default() -> Self {
        AnnealingConfig {
            initial_temp: 10_000.0,
            cooling_rate: 0.999,
            max_iterations: 10_000,
            seed: None,
        }
    }
}

impl AnnealingConfig {
    pub fn new(initial_temp: f64, cooling_rate: f64, max_iterations: usize) -> Self {
        AnnealingConfig {
            initial_temp,
            cooling_rate,
            max_iterations,
            seed: None,
        }
    }

    pub fn with_initial_temp(mut self, t: f64) -> Self {
        self.initial_temp = t;
        self
    }

    pub fn with_cooling_rate(mut self, rate: f64) -> Self {
        self.cooling_rate = rate;
        self
    }

    pub fn with_max_iterations(mut self, n: usize) -> Self {
        self.max_iterations = n;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Load a configuration from a JSON file. Missing fields take their defaults.
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigFileError> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|source| ConfigFileError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_reader(BufReader::new(file)).map_err(|source| ConfigFileError::Json {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Reject parameters that would make the schedule meaningless
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.initial_temp > 0.0 && self.initial_temp.is_finite()) {
            return Err(ConfigError::NonPositiveTemperature(self.initial_temp));
        }
        if !(self.cooling_rate > 0.0 && self.cooling_rate < 1.0) {
            return Err(ConfigError::CoolingRateOutOfRange(self.cooling_rate));
        }
        Ok(())
    }

    /// Temperature after `k` iterations
    pub fn temperature_at(&self, k: usize) -> f64 {
        self.initial_temp * self.cooling_rate.powf(k as f64)
    }
}

/// Outcome of one annealing run
#[derive(Debug, Clone, PartialEq)]
pub struct AnnealingRun {
    /// Best tour found
    pub tour: Vec<usize>,
    /// Cost of `tour`
    pub cost: f64,
    /// Iterations performed (always the configured count)
    pub iterations: usize,
    /// Temperature after the last iteration
    pub final_temperature: f64,
    /// Moves accepted, improving or not
    pub accepted_moves: usize,
    /// Moves that strictly lowered the cost
    pub improving_moves: usize,
}

/// Probability of moving from a tour of cost `current` to one of cost `candidate`
#[inline]
pub fn acceptance_probability(current: f64, candidate: f64, temperature: f64) -> f64 {
    if candidate < current {
        1.0
    } else {
        ((current - candidate) / temperature).exp()
    }
}

/// Run Simulated Annealing over `cities` using `rng` as the only source of randomness.
///
/// Fails before searching when the configuration is invalid or `cities` is
/// empty. Otherwise exactly `config.max_iterations` iterations are
/// performed. With one or two cities every tour is optimal and iterations
/// only cool the temperature.
pub fn anneal<R: Rng>(
    cities: &[Point],
    config: &AnnealingConfig,
    rng: &mut R,
) -> Result<AnnealingRun, ConfigError> {
    config.validate()?;
    let n = cities.len();
    if n == 0 {
        return Err(ConfigError::EmptyInstance);
    }

    let mut tour: Vec<usize> = (0..n).collect();
    tour.shuffle(rng);
    let mut cost = tour_cost(cities, &tour);
    let mut temp = config.initial_temp;

    let mut accepted_moves = 0;
    let mut improving_moves = 0;
    let log_every = (config.max_iterations / 10).max(1);

    for iteration in 0..config.max_iterations {
        if n >= 2 {
            let i = rng.gen_range(0..n);
            let j = (i + rng.gen_range(1..n)) % n;

            tour.swap(i, j);
            let candidate = tour_cost(cities, &tour);

            if candidate < cost {
                cost = candidate;
                accepted_moves += 1;
                improving_moves += 1;
            } else if acceptance_probability(cost, candidate, temp) > rng.gen::<f64>() {
                cost = candidate;
                accepted_moves += 1;
            } else {
                tour.swap(i, j);
            }
        }

        temp *= config.cooling_rate;

        if (iteration + 1) % log_every == 0 {
            log::debug!(
                "iteration {}: cost={:.4}, temperature={:.6e}, accepted={}",
                iteration + 1,
                cost,
                temp,
                accepted_moves
            );
        }
    }

    debug_assert!(is_permutation(&tour, n));

    Ok(AnnealingRun {
        tour,
        cost,
        iterations: config.max_iterations,
        final_temperature: temp,
        accepted_moves,
        improving_moves,
    })
}

/// Simulated Annealing solver bound to a configuration
pub struct SimulatedAnnealing {
    pub config: AnnealingConfig,
}

impl SimulatedAnnealing {
    pub fn new() -> Self {
        SimulatedAnnealing {
            config: AnnealingConfig::default(),
        }
    }

    pub fn with_config(config: AnnealingConfig) -> Self {
        SimulatedAnnealing { config }
    }

    /// Solve with a `ChaCha8Rng` seeded from the configuration, or from entropy
    pub fn solve(&self, instance: &TspInstance) -> Result<Solution, ConfigError> {
        let seed = self.config.seed.unwrap_or_else(rand::random);
        log::info!("Annealing {} with seed {}", instance.name, seed);
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        self.solve_with_rng(instance, &mut rng)
    }

    /// Solve using a caller-provided random source
    pub fn solve_with_rng<R: Rng>(
        &self,
        instance: &TspInstance,
        rng: &mut R,
    ) -> Result<Solution, ConfigError> {
        let start = Instant::now();
        let run = anneal(&instance.cities, &self.config, rng)?;
        let elapsed = start.elapsed().as_secs_f64();

        log::info!(
            "{}: cost {:.2} after {} iterations ({} accepted, {} improving), final temperature {:.3e}, {:.3}s",
            instance.name,
            run.cost,
            run.iterations,
            run.accepted_moves,
            run.improving_moves,
            run.final_temperature,
            elapsed
        );

        Ok(Solution {
            tour: run.tour,
            cost: run.cost,
            algorithm: self.name().to_string(),
            computation_time: elapsed,
            iterations: Some(run.iterations),
        })
    }

    pub fn name(&self) -> &str {
        "SimulatedAnnealing"
    }
}

impl Default for SimulatedAnnealing {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::distance;

    fn unit_square() -> Vec<Point> {
        vec![
            Point::new(0.0, 0.0),
            Point::new(0.0, 1.0),
            Point::new(1.0, 1.0),
            Point::new(1.0, 0.0),
        ]
    }

    fn random_cities(n: usize, seed: u64) -> Vec<Point> {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        (0..n)
            .map(|_| Point::new(rng.gen_range(0.0..100.0), rng.gen_range(0.0..100.0)))
            .collect()
    }

    #[test]
    fn test_validate() {
        assert!(AnnealingConfig::default().validate().is_ok());
        assert!(AnnealingConfig::new(1.0, 0.5, 0).validate().is_ok());

        for temp in [0.0, -5.0, f64::NAN, f64::INFINITY] {
            let config = AnnealingConfig::default().with_initial_temp(temp);
            assert!(matches!(config.validate(), Err(ConfigError::NonPositiveTemperature(_))));
        }
        for rate in [0.0, 1.0, 1.5, -0.2, f64::NAN] {
            let config = AnnealingConfig::default().with_cooling_rate(rate);
            assert!(matches!(config.validate(), Err(ConfigError::CoolingRateOutOfRange(_))));
        }
    }

    #[test]
    fn test_invalid_config_fails_before_search() {
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        let config = AnnealingConfig::new(0.0, 0.9, 100);
        assert_eq!(
            anneal(&unit_square(), &config, &mut rng),
            Err(ConfigError::NonPositiveTemperature(0.0))
        );
    }

    #[test]
    fn test_empty_instance_rejected() {
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        let config = AnnealingConfig::new(10.0, 0.9, 100);
        assert_eq!(anneal(&[], &config, &mut rng), Err(ConfigError::EmptyInstance));
    }

    #[test]
    fn test_acceptance_probability() {
        assert_eq!(acceptance_probability(10.0, 5.0, 1.0), 1.0);
        assert_eq!(acceptance_probability(10.0, 10.0, 1.0), 1.0);
        let p = acceptance_probability(10.0, 12.0, 4.0);
        assert!((p - (-0.5f64).exp()).abs() < 1e-12);
        // colder means less likely
        assert!(acceptance_probability(10.0, 12.0, 1.0) < p);
    }

    #[test]
    fn test_single_city() {
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let config = AnnealingConfig::new(100.0, 0.9, 50);
        let run = anneal(&[Point::new(4.0, 4.0)], &config, &mut rng).unwrap();
        assert_eq!(run.tour, vec![0]);
        assert_eq!(run.cost, 0.0);
        assert_eq!(run.iterations, 50);
        assert_eq!(run.accepted_moves, 0);
    }

    #[test]
    fn test_two_cities() {
        let cities = [Point::new(0.0, 0.0), Point::new(6.0, 8.0)];
        for seed in 0..5 {
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            let config = AnnealingConfig::new(1000.0, 0.99, 200);
            let run = anneal(&cities, &config, &mut rng).unwrap();
            assert!(is_permutation(&run.tour, 2));
            assert!((run.cost - 2.0 * distance(&cities[0], &cities[1])).abs() < 1e-10);
        }
    }

    #[test]
    fn test_zero_iterations_returns_initial_permutation() {
        let cities = random_cities(12, 1);
        let mut rng = ChaCha8Rng::seed_from_u64(9);
        let config = AnnealingConfig::new(50.0, 0.9, 0);
        let run = anneal(&cities, &config, &mut rng).unwrap();
        assert!(is_permutation(&run.tour, 12));
        assert_eq!(run.cost, tour_cost(&cities, &run.tour));
        assert_eq!(run.final_temperature, 50.0);
        assert_eq!(run.accepted_moves, 0);
    }

    #[test]
    fn test_result_is_consistent_permutation() {
        let cities = random_cities(30, 2);
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        let config = AnnealingConfig::new(100.0, 0.995, 3000);
        let run = anneal(&cities, &config, &mut rng).unwrap();
        assert!(is_permutation(&run.tour, 30));
        assert!((run.cost - tour_cost(&cities, &run.tour)).abs() < 1e-9);
        assert_eq!(run.iterations, 3000);
        assert!(run.improving_moves <= run.accepted_moves);
        assert!(run.accepted_moves <= run.iterations);
    }

    #[test]
    fn test_temperature_decays_geometrically() {
        let cities = random_cities(8, 3);
        for k in [0usize, 1, 10, 1000] {
            let config = AnnealingConfig::new(250.0, 0.97, k);
            let mut rng = ChaCha8Rng::seed_from_u64(11);
            let run = anneal(&cities, &config, &mut rng).unwrap();
            let expected = config.temperature_at(k);
            assert!((run.final_temperature - expected).abs() <= 1e-9 * expected);
        }
    }

    #[test]
    fn test_deterministic_with_seeded_rng() {
        let cities = random_cities(25, 4);
        let config = AnnealingConfig::new(500.0, 0.99, 2000);

        let mut rng_a = ChaCha8Rng::seed_from_u64(1234);
        let mut rng_b = ChaCha8Rng::seed_from_u64(1234);
        let a = anneal(&cities, &config, &mut rng_a).unwrap();
        let b = anneal(&cities, &config, &mut rng_b).unwrap();
        assert_eq!(a, b);

        let instance = TspInstance::from_points("random", cities);
        let sa = SimulatedAnnealing::with_config(config.with_seed(77));
        let first = sa.solve(&instance).unwrap();
        let second = sa.solve(&instance).unwrap();
        assert_eq!(first.tour, second.tour);
        assert_eq!(first.cost, second.cost);
    }

    #[test]
    fn test_cold_search_never_worsens_start() {
        let cities = random_cities(20, 6);
        let start = anneal(&cities, &AnnealingConfig::new(1e-12, 0.5, 0), &mut ChaCha8Rng::seed_from_u64(8))
            .unwrap();
        let run = anneal(&cities, &AnnealingConfig::new(1e-12, 0.5, 2000), &mut ChaCha8Rng::seed_from_u64(8))
            .unwrap();
        assert!(run.cost <= start.cost + 1e-9);
    }

    #[test]
    fn test_square_converges_to_perimeter() {
        let cities = unit_square();
        let config = AnnealingConfig::new(1000.0, 0.995, 5000);
        let optimal = (0..20u64)
            .filter(|&seed| {
                let mut rng = ChaCha8Rng::seed_from_u64(seed);
                let run = anneal(&cities, &config, &mut rng).unwrap();
                (run.cost - 4.0).abs() < 1e-9
            })
            .count();
        assert!(optimal >= 18, "only {optimal}/20 runs reached the perimeter");
    }

    #[test]
    fn test_solve_reports_solution() {
        let instance = TspInstance::from_points("square", unit_square());
        let sa = SimulatedAnnealing::with_config(AnnealingConfig::new(1000.0, 0.995, 5000).with_seed(42));
        let solution = sa.solve(&instance).unwrap();
        assert!(solution.is_complete(&instance));
        assert_eq!(solution.algorithm, "SimulatedAnnealing");
        assert_eq!(solution.iterations, Some(5000));
        assert!((solution.cost - tour_cost(&instance.cities, &solution.tour)).abs() < 1e-9);
    }

    #[test]
    fn test_config_from_json() {
        let config: AnnealingConfig =
            serde_json::from_str(r#"{"initial_temp": 5.0, "max_iterations": 10}"#).unwrap();
        assert_eq!(config.initial_temp, 5.0);
        assert_eq!(config.cooling_rate, 0.999);
        assert_eq!(config.max_iterations, 10);
        assert_eq!(config.seed, None);

        let err = AnnealingConfig::from_json_file("/no/such/config.json").unwrap_err();
        assert!(matches!(err, ConfigFileError::Io { .. }));
    }
}
