//! Error types for loading and reporting.
//!
//! [`Error`] is fatal: it aborts the stage that produced it and is handed
//! back to the caller. [`RowError`] is per-row: the loaders report it to the
//! diagnostics sink and carry on with the next row.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for pipeline operations
pub type Result<T> = std::result::Result<T, Error>;

/// Fatal errors that stop the pipeline
#[derive(Error, Debug)]
pub enum Error {
    /// The database file could not be opened or created
    #[error("Failed to open database {path:?}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: rusqlite::Error,
    },

    /// CREATE TABLE / CREATE INDEX failed
    #[error("Failed to create table {table}: {source}")]
    Schema {
        table: String,
        #[source]
        source: rusqlite::Error,
    },

    /// The CSV file could not be opened
    #[error("Failed to open {path:?}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The CSV file could not be parsed at all
    #[error("Error reading CSV {path:?}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    /// The insert statement for a table could not be prepared
    #[error("Failed to prepare insert for {table}: {source}")]
    Prepare {
        table: String,
        #[source]
        source: rusqlite::Error,
    },

    /// The report query failed to run or a result row failed to decode
    #[error("Report query failed: {0}")]
    Query(#[source] rusqlite::Error),
}

/// Reasons a single CSV row is not stored
#[derive(Error, Debug)]
pub enum RowError {
    #[error("not enough columns (expected {expected}, found {found})")]
    TooFewFields { expected: usize, found: usize },

    #[error("invalid year format ({0})")]
    InvalidYear(#[source] std::num::ParseIntError),

    #[error("invalid rating format ({0})")]
    InvalidRating(#[source] std::num::ParseFloatError),

    /// The store rejected an otherwise well-formed row
    #[error("insert failed: {0}")]
    Insert(#[from] rusqlite::Error),
}

impl RowError {
    /// True when the row was rejected by validation rather than by the store
    pub fn is_validation(&self) -> bool {
        !matches!(self, RowError::Insert(_))
    }
}
