//! Error types shared by the instance loader and the annealing engine.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while loading a coordinate file.
#[derive(Debug, Error)]
pub enum InstanceError {
    /// The file could not be opened.
    #[error("cannot open instance file {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    /// A line could not be read from the underlying reader.
    #[error("read error: {0}")]
    Read(#[from] io::Error),
    /// A line inside NODE_COORD_SECTION is not `<id> <x> <y>`.
    #[error("invalid coordinate line {line}: {content:?}")]
    InvalidCoordinate { line: usize, content: String },
    /// The file contains no coordinates at all.
    #[error("no coordinates found (missing NODE_COORD_SECTION?)")]
    NoCoordinates,
}

/// Errors raised when annealing parameters are rejected before the search starts.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("initial temperature must be positive and finite, got {0}")]
    NonPositiveTemperature(f64),
    #[error("cooling rate must be in (0, 1), got {0}")]
    CoolingRateOutOfRange(f64),
    #[error("cannot anneal an empty city set")]
    EmptyInstance,
}

/// Errors raised while reading an annealing configuration file.
#[derive(Debug, Error)]
pub enum ConfigFileError {
    #[error("cannot read config file {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("invalid config file {path:?}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}
