//! Error types for abi-replay

use thiserror::Error;

/// Replay error type
#[derive(Debug, Error)]
pub enum Error {
    /// Trace could not be serialized
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;
