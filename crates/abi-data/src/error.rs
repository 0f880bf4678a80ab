//! Error types for abi-data

use thiserror::Error;

/// Data store error type
#[derive(Debug, Error)]
pub enum Error {
    /// A required table file is missing
    #[error("required data file not found: {0}")]
    MissingTable(String),

    /// CSV parsing failed
    #[error("csv error in {table}: {source}")]
    Csv {
        /// Table being parsed
        table: String,
        /// Underlying parser error
        #[source]
        source: csv::Error,
    },

    /// Referential or key integrity violation
    #[error("integrity error: {0}")]
    Integrity(String),

    /// IO error
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;
