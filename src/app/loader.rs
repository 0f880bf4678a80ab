//! Configuration loading
//!
//! Handles loading configuration from embedded defaults, files, and environment.

use super::config::AppConfig;
use anyhow::{Context, Result};
use config::{Config, Environment, File, FileFormat};

/// Embedded default configuration (compiled into binary)
pub const DEFAULT_CONFIG: &str = include_str!("../../config/default.toml");

/// Load configuration from files and environment
pub fn load_config() -> Result<AppConfig> {
    let config = Config::builder()
        // 1. Embedded defaults (always available)
        .add_source(File::from_str(DEFAULT_CONFIG, FileFormat::Toml))
        // 2. External overrides (optional)
        .add_source(File::with_name("config/default").required(false))
        .add_source(
            File::with_name(&format!(
                "config/{}",
                std::env::var("ABI_ENV").unwrap_or_else(|_| "development".to_string())
            ))
            .required(false),
        )
        .add_source(File::with_name("config/local").required(false))
        // 3. Environment variables (highest priority), e.g. ABI_LLM__PROVIDER=mock
        .add_source(
            Environment::with_prefix("ABI")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        )
        .build()
        .context("Failed to build configuration")?;

    config
        .try_deserialize()
        .context("Failed to deserialize configuration")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_embedded_defaults_deserialize() {
        let config: AppConfig = Config::builder()
            .add_source(File::from_str(DEFAULT_CONFIG, FileFormat::Toml))
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap();

        assert_eq!(config.llm.provider, "gemini");
        assert_eq!(config.orchestrator.max_iterations, 5);
        assert_eq!(config.orchestrator.tool_timeout_secs, 30);
        assert_eq!(config.data.directory, std::path::PathBuf::from("data"));
        assert!(config.data.reference_date.is_none());
        assert_eq!(config.logging.filter, "abi=info,abi_core=info");
    }

    #[test]
    fn test_overrides_layer_on_defaults() {
        let config: AppConfig = Config::builder()
            .add_source(File::from_str(DEFAULT_CONFIG, FileFormat::Toml))
            .add_source(File::from_str(
                "[llm]\nprovider = \"mock\"\n[orchestrator]\nmax_iterations = 8\n[data]\nreference_date = \"2025-03-15\"\n",
                FileFormat::Toml,
            ))
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap();

        assert_eq!(config.llm.provider, "mock");
        assert_eq!(config.orchestrator.max_iterations, 8);
        assert_eq!(
            config.data.reference_date,
            chrono::NaiveDate::from_ymd_opt(2025, 3, 15)
        );
    }

    #[test]
    fn test_retry_count_is_not_configurable() {
        let result = Config::builder()
            .add_source(File::from_str(DEFAULT_CONFIG, FileFormat::Toml))
            .add_source(File::from_str(
                "[orchestrator]\ngateway_retries = 3\n",
                FileFormat::Toml,
            ))
            .build()
            .unwrap()
            .try_deserialize::<AppConfig>();

        let err = result.unwrap_err().to_string();
        assert!(err.contains("gateway_retries"), "{err}");
    }
}
