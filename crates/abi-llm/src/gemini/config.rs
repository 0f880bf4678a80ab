//! Gemini provider configuration

use crate::error::{Error, Result};
use std::fmt;
use std::time::Duration;

const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Model used when neither the config nor the request names one
pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";

/// Connection settings for the Gemini REST API
#[derive(Clone)]
pub struct GeminiConfig {
    /// API key, sent as the `key` query parameter
    pub api_key: String,
    /// API root
    pub base_url: String,
    /// Model for requests that leave it empty
    pub default_model: String,
    /// Output token cap for requests that set none
    pub default_max_tokens: u32,
    /// Per-request HTTP timeout
    pub timeout: Duration,
}

impl fmt::Debug for GeminiConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GeminiConfig")
            .field("api_key", &masked(&self.api_key))
            .field("base_url", &self.base_url)
            .field("default_model", &self.default_model)
            .finish_non_exhaustive()
    }
}

impl GeminiConfig {
    /// Settings for `api_key` with the public endpoint
    #[must_use]
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            default_model: DEFAULT_MODEL.to_string(),
            default_max_tokens: 8192,
            timeout: Duration::from_secs(60),
        }
    }

    /// Read `GEMINI_API_KEY` (or `GOOGLE_API_KEY`)
    ///
    /// `GEMINI_BASE_URL` and `GEMINI_MODEL` override the defaults when set.
    pub fn from_env() -> Result<Self> {
        let api_key = std::env::var("GEMINI_API_KEY")
            .or_else(|_| std::env::var("GOOGLE_API_KEY"))
            .map_err(|_| Error::NotConfigured("GEMINI_API_KEY is not set".to_string()))?;

        let mut config = Self::new(api_key);
        if let Ok(base_url) = std::env::var("GEMINI_BASE_URL") {
            config.base_url = base_url;
        }
        if let Ok(model) = std::env::var("GEMINI_MODEL") {
            config.default_model = model;
        }
        Ok(config)
    }

    /// Use another default model
    #[must_use]
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.default_model = model.into();
        self
    }

    /// Use another output token cap
    #[must_use]
    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.default_max_tokens = max_tokens;
        self
    }

    /// Use another HTTP timeout
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// `generateContent` URL for `model`; contains the key, never log it
    pub(crate) fn endpoint(&self, model: &str) -> String {
        format!(
            "{}/models/{model}:generateContent?key={}",
            self.base_url.trim_end_matches('/'),
            self.api_key
        )
    }
}

fn masked(key: &str) -> String {
    if key.len() > 8 && key.is_ascii() {
        format!("{}...{}", &key[..4], &key[key.len() - 4..])
    } else {
        "****".to_string()
    }
}
