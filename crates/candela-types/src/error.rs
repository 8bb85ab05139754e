//! Error types for candela.

use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::{Granularity, UnsupportedGranularity};

/// Result type alias for candela operations.
pub type Result<T> = std::result::Result<T, CandelaError>;

/// Errors that can occur while ingesting, aggregating or enriching bars.
#[derive(Error, Debug)]
pub enum CandelaError {
    /// A required column is absent from the input schema.
    #[error("Missing column: {0}")]
    MissingColumn(String),

    /// The input has no header and no rows.
    #[error("Input is empty")]
    EmptyInput,

    /// Unknown aggregation or period unit.
    #[error(transparent)]
    UnsupportedGranularity(#[from] UnsupportedGranularity),

    /// Target buckets are not whole multiples of the source granularity.
    #[error("Cannot aggregate {input} bars into {target} bars")]
    IncompatibleGranularity {
        /// Granularity of the input bars.
        input: Granularity,
        /// Requested output granularity.
        target: Granularity,
    },

    /// Smoothing period of zero bars.
    #[error("Period must be a positive number of bars")]
    InvalidPeriod,

    /// A bar is earlier than the bar before it.
    #[error("Unsorted input at bar {index}: {current} precedes {previous}")]
    UnsortedInput {
        /// Position of the offending bar.
        index: usize,
        /// Timestamp of the preceding bar.
        previous: DateTime<Utc>,
        /// Timestamp of the offending bar.
        current: DateTime<Utc>,
    },

    /// A row could not be parsed.
    #[error("Parse error on line {line}: {message}")]
    Parse {
        /// 1-based line number in the source, header included.
        line: u64,
        /// What went wrong.
        message: String,
    },

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV reader error.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// JSON serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
