//! Error types for reelwrap-core

use thiserror::Error;

/// Main error type for the reelwrap-core library
#[derive(Error, Debug)]
pub enum Error {
    /// IO error (missing or unreadable input)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Structural CSV error (unequal row lengths, bad encoding)
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// A cell that cannot be interpreted for its column
    #[error("malformed row at line {line}: column `{column}` has invalid value {value:?}")]
    MalformedRow {
        line: u64,
        column: String,
        value: String,
    },

    /// A hand-built record that violates the record invariants
    #[error("invalid record at index {index}: {message}")]
    InvalidRecord { index: usize, message: String },

    /// A query date that is not `YYYY-MM-DD`
    #[error("invalid date {0:?}, expected YYYY-MM-DD")]
    InvalidDate(String),

    /// No timestamped records to draw from
    #[error("no viewing data found")]
    NoViewingData,

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Weighted draw over an empty or zero-weight table
    #[error("sampling error: {0}")]
    Sampling(#[from] rand::distributions::WeightedError),

    /// Configuration error
    #[error("configuration error: {0}")]
    Config(String),
}

/// Result type alias for reelwrap-core
pub type Result<T> = std::result::Result<T, Error>;
