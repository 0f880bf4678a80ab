//! Application configuration types

use abi_core::OrchestratorConfig;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub data: DataConfig,
    #[serde(default)]
    pub llm: LlmConfig,
    #[serde(default)]
    pub orchestrator: OrchestratorConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Business data location
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataConfig {
    /// Directory holding the four CSV tables
    #[serde(default = "default_data_directory")]
    pub directory: PathBuf,
    /// Fixed "today" for delay checks; the local date when unset
    #[serde(default)]
    pub reference_date: Option<NaiveDate>,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            directory: default_data_directory(),
            reference_date: None,
        }
    }
}

fn default_data_directory() -> PathBuf {
    PathBuf::from("data")
}

/// Model provider settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    /// `gemini` or `mock`
    #[serde(default = "default_provider")]
    pub provider: String,
    /// Model name; the provider default when unset
    #[serde(default)]
    pub model: Option<String>,
    /// API key; falls back to GEMINI_API_KEY / GOOGLE_API_KEY
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default)]
    pub temperature: f32,
    #[serde(default)]
    pub max_tokens: Option<u32>,
    #[serde(default = "default_llm_timeout")]
    pub timeout_secs: u64,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            provider: default_provider(),
            model: None,
            api_key: None,
            temperature: 0.0,
            max_tokens: None,
            timeout_secs: default_llm_timeout(),
        }
    }
}

fn default_provider() -> String {
    "gemini".to_string()
}

fn default_llm_timeout() -> u64 {
    60
}

/// Log output settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// `EnvFilter` directive used when RUST_LOG is unset
    #[serde(default = "default_filter")]
    pub filter: String,
    /// Emit JSON lines instead of human-readable text
    #[serde(default)]
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: default_filter(),
            json: false,
        }
    }
}

fn default_filter() -> String {
    "abi=info,abi_core=info".to_string()
}
