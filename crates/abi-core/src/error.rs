//! Error types for abi-core
//!
//! This module provides error types and user-friendly error formatting.

use thiserror::Error;

/// Answer shown when the model cannot be reached after the retry
pub const GENERIC_FAILURE_MESSAGE: &str =
    "Sorry, I couldn't complete that request right now. Please try again in a moment.";

/// Core error type
#[derive(Debug, Error)]
pub enum Error {
    /// The submitted utterance was empty or whitespace
    #[error("utterance is empty")]
    EmptyUtterance,

    /// Invalid configuration
    #[error("configuration error: {0}")]
    Configuration(String),

    /// Data loading error
    #[error("data error: {0}")]
    Data(#[from] abi_data::Error),

    /// LLM provider error
    #[error("llm error: {0}")]
    Llm(#[from] abi_llm::Error),
}

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;

/// Trait for user-friendly error messages
pub trait UserFriendlyError {
    /// Get a user-friendly error message
    fn user_message(&self) -> String;

    /// Get a suggestion for how to fix the error
    fn suggestion(&self) -> Option<String>;
}

impl UserFriendlyError for Error {
    fn user_message(&self) -> String {
        match self {
            Error::EmptyUtterance => "💬 Please type a question first.".to_string(),
            Error::Configuration(msg) => format!("⚙️ Configuration error: {msg}"),
            Error::Data(e) => format!("📂 Could not load business data: {e}"),
            Error::Llm(abi_llm::Error::NotConfigured(_)) => {
                "🔑 The language model is not configured.".to_string()
            }
            Error::Llm(e) => format!("🤖 LLM error: {e}"),
        }
    }

    fn suggestion(&self) -> Option<String> {
        match self {
            Error::Configuration(_) => Some(
                "💡 Check config/default.toml, config/local.toml or ABI_* environment variables."
                    .to_string(),
            ),
            Error::Data(_) => Some(
                "💡 Make sure data.directory points at customers.csv, products.csv, orders.csv and revenue.csv."
                    .to_string(),
            ),
            Error::Llm(abi_llm::Error::NotConfigured(_)) => Some(
                "💡 Set GEMINI_API_KEY (or add it to .env), or run with ABI_LLM__PROVIDER=mock."
                    .to_string(),
            ),
            _ => None,
        }
    }
}

/// Format an error for display in the CLI
pub fn format_error_for_cli(error: &Error) -> String {
    let mut output = error.user_message();
    if let Some(suggestion) = error.suggestion() {
        output.push_str("\n\n");
        output.push_str(&suggestion);
    }
    output
}
