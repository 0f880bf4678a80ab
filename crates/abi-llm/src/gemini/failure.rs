//! Mapping of failed Gemini calls onto [`Error`]
//!
//! Provider messages are redacted before they leave the crate: anything about
//! credentials or quota is replaced by a fixed hint, long text is cut.

use crate::error::Error;
use serde::Deserialize;
use std::time::Duration;

const MAX_DETAIL_CHARS: usize = 300;

const CREDENTIAL_HINTS: [&str; 6] = [
    "api key",
    "api_key",
    "apikey",
    "unauthenticated",
    "unauthorized",
    "permission denied",
];

const QUOTA_HINTS: [&str; 3] = ["quota", "resource_exhausted", "rate limit"];

#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: ErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ErrorDetail {
    #[serde(default)]
    status: String,
    #[serde(default)]
    message: String,
}

/// Error for a non-success HTTP status and its body
pub(crate) fn from_status(status: u16, body: &str) -> Error {
    if status == 429 {
        return Error::RateLimit;
    }
    let detail = match serde_json::from_str::<ErrorBody>(body) {
        Ok(ErrorBody { error }) => format!("{}: {}", error.status, error.message),
        // raw bodies may echo the request
        Err(_) => "no error detail".to_string(),
    };
    Error::Api {
        status,
        message: redact(&detail),
    }
}

/// Error for a call that produced no readable response
pub(crate) fn from_transport(error: reqwest::Error, timeout: Duration) -> Error {
    if error.is_timeout() {
        Error::Timeout(timeout)
    } else {
        // the URL carries the key
        Error::Network(error.without_url().to_string())
    }
}

pub(crate) fn redact(detail: &str) -> String {
    let lower = detail.to_lowercase();
    if CREDENTIAL_HINTS.iter().any(|hint| lower.contains(hint)) {
        return "authentication failed; check the configured API key".to_string();
    }
    if QUOTA_HINTS.iter().any(|hint| lower.contains(hint)) {
        return "quota exhausted; try again later".to_string();
    }
    match detail.char_indices().nth(MAX_DETAIL_CHARS) {
        Some((cut, _)) => format!("{}...", &detail[..cut]),
        None => detail.to_string(),
    }
}
