//! Error types for abi-llm

use std::time::Duration;
use thiserror::Error;

/// Failure of a model call
#[derive(Debug, Error)]
pub enum Error {
    /// Credentials or provider settings are missing
    #[error("provider not configured: {0}")]
    NotConfigured(String),

    /// The provider answered with a non-success status
    #[error("provider rejected the request (HTTP {status}): {message}")]
    Api {
        /// HTTP status code
        status: u16,
        /// Redacted provider message
        message: String,
    },

    /// HTTP 429 or exhausted quota
    #[error("rate limited by provider")]
    RateLimit,

    /// The body could not be read as a provider response
    #[error("unreadable provider response: {0}")]
    InvalidResponse(String),

    /// The request never reached the provider
    #[error("network failure: {0}")]
    Network(String),

    /// No answer within the configured timeout
    #[error("no response within {0:?}")]
    Timeout(Duration),
}

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;
