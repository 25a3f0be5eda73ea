use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Failures constructing the resource grid. All of them abort a run before
/// the first tick.
#[derive(Debug, Error)]
pub enum GridError {
    #[error("grid file {path} could not be read; place it there and rerun: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("grid has no rows")]
    Empty,
    #[error("grid row {row} has {found} values, expected {expected}")]
    Ragged {
        row: usize,
        expected: usize,
        found: usize,
    },
    #[error("grid row {row} column {column}: '{value}' is not a number")]
    Unparsable {
        row: usize,
        column: usize,
        value: String,
    },
    #[error("grid row {row} column {column}: {value} is not a finite non-negative quantity")]
    InvalidQuantity { row: usize, column: usize, value: f64 },
}

/// Failures retrieving seed coordinates. Always recoverable: the caller falls
/// back to random placement.
#[derive(Debug, Error)]
pub enum SeedError {
    #[error("seed request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("seed source answered with status {0}")]
    Status(u16),
    #[error("seed source lists {available} coordinate pair(s), {requested} needed")]
    Insufficient { available: usize, requested: usize },
    #[error("seed coordinate '{0}' is not an integer")]
    Unparsable(String),
    #[error("seed coordinate ({x}, {y}) lies outside the domain")]
    OutOfDomain { x: i64, y: i64 },
}

/// Invalid run configuration, detected before the first tick.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("parameter file {path} could not be read: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("parameter file {path} is malformed: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("{field} = {value} does not fit in a parameter")]
    OutOfRange { field: &'static str, value: i64 },
    #[error("{field} must be at least 1")]
    ZeroThreshold { field: &'static str },
}
