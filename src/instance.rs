//! Module for parsing and representing TSP instances.
//!
//! This module handles the TSP-LIB coordinate files (`NODE_COORD_SECTION`
//! followed by `<id> <x> <y>` lines and a closing `EOF`). Only the ordered
//! coordinates matter to the solver; the 1-based ids in the file are ignored.

use crate::error::InstanceError;
use crate::geometry::{distance, Point};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

/// Represents a complete TSP instance
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TspInstance {
    /// Name of the instance
    pub name: String,
    /// Comment/description
    pub comment: String,
    /// Number of cities
    pub dimension: usize,
    /// City coordinates, 0-indexed in file order
    pub cities: Vec<Point>,
}

impl TspInstance {
    /// Build an instance directly from coordinates
    pub fn from_points(name: &str, cities: Vec<Point>) -> Self {
        TspInstance {
            name: name.to_string(),
            comment: String::new(),
            dimension: cities.len(),
            cities,
        }
    }

    /// Parse an instance from a TSP-LIB format file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, InstanceError> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|source| InstanceError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let mut instance = Self::from_reader(BufReader::new(file))?;
        if instance.name.is_empty() {
            instance.name = path
                .file_stem()
                .map(|s| s.to_string_lossy().to_string())
                .unwrap_or_default();
        }

        log::info!(
            "Loaded instance {} ({} cities) from {:?}",
            instance.name,
            instance.dimension,
            path
        );
        Ok(instance)
    }

    /// Parse an instance from any buffered reader.
    ///
    /// Lines before `NODE_COORD_SECTION` are headers; the ones that are not
    /// understood are skipped. Inside the section every non-blank line must
    /// hold an id and two coordinates, until `EOF` or the end of input.
    pub fn from_reader<R: BufRead>(reader: R) -> Result<Self, InstanceError> {
        let mut name = String::new();
        let mut comment = String::new();
        let mut declared_dimension: Option<usize> = None;
        let mut cities = Vec::new();
        let mut in_coords = false;

        for (index, line) in reader.lines().enumerate() {
            let line = line?;
            let line = line.trim();

            if !in_coords {
                if line.starts_with("NODE_COORD_SECTION") {
                    in_coords = true;
                } else if let Some(value) = header_value(line, "NAME") {
                    name = value.to_string();
                } else if let Some(value) = header_value(line, "COMMENT") {
                    comment = value.to_string();
                } else if let Some(value) = header_value(line, "DIMENSION") {
                    match value.parse() {
                        Ok(d) => declared_dimension = Some(d),
                        Err(_) => log::warn!("Ignoring invalid DIMENSION value {:?}", value),
                    }
                }
                continue;
            }

            if line == "EOF" {
                break;
            }
            if line.is_empty() {
                continue;
            }

            cities.push(parse_coordinate(line).ok_or_else(|| {
                InstanceError::InvalidCoordinate {
                    line: index + 1,
                    content: line.to_string(),
                }
            })?);
        }

        if cities.is_empty() {
            return Err(InstanceError::NoCoordinates);
        }

        if let Some(declared) = declared_dimension {
            if declared != cities.len() {
                log::warn!(
                    "DIMENSION says {} but {} coordinates were read; using {}",
                    declared,
                    cities.len(),
                    cities.len()
                );
            }
        }

        Ok(TspInstance {
            name,
            comment,
            dimension: cities.len(),
            cities,
        })
    }

    /// Get the distance between two cities
    #[inline]
    pub fn distance(&self, i: usize, j: usize) -> f64 {
        distance(&self.cities[i], &self.cities[j])
    }

    /// Get statistics about the instance
    pub fn statistics(&self) -> InstanceStatistics {
        let mut min_x = f64::INFINITY;
        let mut max_x = f64::NEG_INFINITY;
        let mut min_y = f64::INFINITY;
        let mut max_y = f64::NEG_INFINITY;
        for city in &self.cities {
            min_x = min_x.min(city.x);
            max_x = max_x.max(city.x);
            min_y = min_y.min(city.y);
            max_y = max_y.max(city.y);
        }

        let mut pairs = 0usize;
        let mut total = 0.0;
        let mut min_distance = f64::INFINITY;
        let mut max_distance = 0.0f64;
        for i in 0..self.dimension {
            for j in i + 1..self.dimension {
                let d = self.distance(i, j);
                total += d;
                pairs += 1;
                min_distance = min_distance.min(d);
                max_distance = max_distance.max(d);
            }
        }

        let (avg_distance, min_distance) = if pairs == 0 {
            (0.0, 0.0)
        } else {
            (total / pairs as f64, min_distance)
        };

        InstanceStatistics {
            name: self.name.clone(),
            dimension: self.dimension,
            min_x,
            max_x,
            min_y,
            max_y,
            avg_distance,
            min_distance,
            max_distance,
        }
    }
}

/// Value of a `KEY : value` / `KEY: value` header line
fn header_value<'a>(line: &'a str, key: &str) -> Option<&'a str> {
    let rest = line.strip_prefix(key)?.trim_start();
    rest.strip_prefix(':').map(str::trim)
}

fn parse_coordinate(line: &str) -> Option<Point> {
    let mut parts = line.split_whitespace();
    parts.next()?.parse::<usize>().ok()?;
    let x = parts.next()?.parse().ok()?;
    let y = parts.next()?.parse().ok()?;
    Some(Point::new(x, y))
}

/// Statistics about a TSP instance
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InstanceStatistics {
    pub name: String,
    pub dimension: usize,
    pub min_x: f64,
    pub max_x: f64,
    pub min_y: f64,
    pub max_y: f64,
    pub avg_distance: f64,
    pub min_distance: f64,
    pub max_distance: f64,
}

impl std::fmt::Display for InstanceStatistics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Instance: {}", self.name)?;
        writeln!(f, "  Cities: {}", self.dimension)?;
        writeln!(f, "  X range: [{:.2}, {:.2}]", self.min_x, self.max_x)?;
        writeln!(f, "  Y range: [{:.2}, {:.2}]", self.min_y, self.max_y)?;
        writeln!(f, "  Avg distance: {:.2}", self.avg_distance)?;
        writeln!(f, "  Min distance: {:.2}", self.min_distance)?;
        writeln!(f, "  Max distance: {:.2}", self.max_distance)
    }
}
