//! TSP Annealing Library
//!
//! Approximates a minimal-cost closed tour over a set of 2D points with
//! Simulated Annealing.
//!
//! # Features
//!
//! - TSP-LIB coordinate file loading (`NODE_COORD_SECTION` ... `EOF`)
//! - Euclidean distance and closed-tour cost evaluation
//! - Simulated Annealing with swap moves and geometric cooling
//! - Seeded, swappable random source for reproducible runs
//! - Benchmarking over repeated runs and SVG visualization
//!
//! # Example
//!
//! ```no_run
//! use tsp_annealing::instance::TspInstance;
//! use tsp_annealing::heuristics::annealing::{AnnealingConfig, SimulatedAnnealing};
//!
//! // Load instance
//! let instance = TspInstance::from_file("xqg237.tsp").unwrap();
//!
//! // Anneal
//! let config = AnnealingConfig::new(10_000.0, 0.999, 10_000).with_seed(42);
//! let solution = SimulatedAnnealing::with_config(config).solve(&instance).unwrap();
//!
//! println!("Solution cost: {:.2}", solution.cost);
//! ```

pub mod error;
pub mod geometry;
pub mod instance;
pub mod solution;
pub mod heuristics;
pub mod benchmark;
pub mod visualization;

pub use geometry::{distance, tour_cost, Point};
pub use heuristics::annealing::{anneal, AnnealingConfig, AnnealingRun, SimulatedAnnealing};
pub use instance::TspInstance;
pub use solution::Solution;
