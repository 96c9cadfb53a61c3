//! Solution representation for the TSP.
//!
//! A `Solution` is what the solver reports back to its caller: the tour,
//! its cost, and bookkeeping about the run that produced it.

use crate::geometry::{is_permutation, tour_cost};
use crate::instance::TspInstance;
use serde::{Deserialize, Serialize};

/// Represents a solution to the TSP
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Solution {
    /// The tour as a cyclic sequence of city indices
    pub tour: Vec<usize>,
    /// Total tour length
    pub cost: f64,
    /// Algorithm that generated this solution
    pub algorithm: String,
    /// Computation time in seconds
    pub computation_time: f64,
    /// Number of iterations (if applicable)
    pub iterations: Option<usize>,
}

impl Solution {
    /// Create a new empty solution
    pub fn new() -> Self {
        Solution {
            tour: Vec::new(),
            cost: f64::INFINITY,
            algorithm: String::new(),
            computation_time: 0.0,
            iterations: None,
        }
    }

    /// Create a solution from a tour
    pub fn from_tour(instance: &TspInstance, tour: Vec<usize>, algorithm: &str) -> Self {
        let cost = tour_cost(&instance.cities, &tour);
        Solution {
            tour,
            cost,
            algorithm: algorithm.to_string(),
            computation_time: 0.0,
            iterations: None,
        }
    }

    /// Check if all cities are visited exactly once
    pub fn is_complete(&self, instance: &TspInstance) -> bool {
        is_permutation(&self.tour, instance.dimension)
    }

    /// Tour as space-separated city indices
    pub fn tour_string(&self) -> String {
        let cities: Vec<String> = self.tour.iter().map(|c| c.to_string()).collect();
        cities.join(" ")
    }
}

impl Default for Solution {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for Solution {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Solution ({})", self.algorithm)?;
        writeln!(f, "  Cost: {:.2}", self.cost)?;
        writeln!(f, "  Time: {:.4}s", self.computation_time)?;
        if let Some(iter) = self.iterations {
            writeln!(f, "  Iterations: {}", iter)?;
        }
        writeln!(f, "  Tour: {}", self.tour_string())
    }
}
