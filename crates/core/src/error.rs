//! Error types for SkiSlope

use thiserror::Error;

/// Main error type for SkiSlope operations
#[derive(Error, Debug)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Malformed input at line {line}: {reason}")]
    MalformedInput { line: usize, reason: String },

    #[error("Degenerate grid {rows}x{cols}: {purpose} needs at least {min_rows}x{min_cols}")]
    DegenerateGrid {
        rows: usize,
        cols: usize,
        min_rows: usize,
        min_cols: usize,
        purpose: &'static str,
    },

    #[error("Invalid raster dimensions: {rows}x{cols}")]
    InvalidDimensions { rows: usize, cols: usize },

    #[error("Index out of bounds: ({row}, {col}) in raster of size ({rows}, {cols})")]
    IndexOutOfBounds {
        row: usize,
        col: usize,
        rows: usize,
        cols: usize,
    },

    #[error("Invalid parameter: {name} = {value} ({reason})")]
    InvalidParameter {
        name: &'static str,
        value: String,
        reason: String,
    },

    #[error("{0}")]
    Other(String),
}

/// Result type alias for SkiSlope operations
pub type Result<T> = std::result::Result<T, Error>;
