//! Gemini - Google Gemini over the `generateContent` REST endpoint

mod config;
mod failure;
mod provider;
mod wire;

#[cfg(test)]
mod tests;

pub use config::{GeminiConfig, DEFAULT_MODEL};
pub use provider::GeminiProvider;
