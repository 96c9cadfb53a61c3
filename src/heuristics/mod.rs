//! Heuristics module for the TSP.
//!
//! This module exports the Simulated Annealing solver.

pub mod annealing;

pub use annealing::*;
