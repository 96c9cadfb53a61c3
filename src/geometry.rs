//! Points, Euclidean distances and closed-tour costs.
//!
//! `tour_cost` sits on the annealing hot path and is evaluated once per
//! iteration, so it does not validate its input. Tours are produced only by
//! the engine, which keeps them permutations; debug builds assert it.

use serde::{Deserialize, Serialize};

/// A city location on the plane
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Point { x, y }
    }
}

/// Euclidean distance between two points
#[inline]
pub fn distance(a: &Point, b: &Point) -> f64 {
    let dx = a.x - b.x;
    let dy = a.y - b.y;
    (dx * dx + dy * dy).sqrt()
}

/// Length of the closed tour visiting `cities` in `tour` order.
///
/// The last city connects back to the first. An empty tour costs 0, and so
/// does a single-city tour.
pub fn tour_cost(cities: &[Point], tour: &[usize]) -> f64 {
    debug_assert!(
        is_permutation(tour, cities.len()),
        "tour is not a permutation of 0..{}",
        cities.len()
    );

    let n = tour.len();
    let mut length = 0.0;
    for i in 0..n {
        let from = tour[i];
        let to = tour[(i + 1) % n];
        length += distance(&cities[from], &cities[to]);
    }
    length
}

/// Check that `tour` visits every index of `0..n` exactly once
pub fn is_permutation(tour: &[usize], n: usize) -> bool {
    if tour.len() != n {
        return false;
    }
    let mut seen = vec![false; n];
    for &city in tour {
        if city >= n || seen[city] {
            return false;
        }
        seen[city] = true;
    }
    true
}
