//! Runtime initialization

use super::config::{AppConfig, LlmConfig};
use abi_core::{format_error_for_cli, Agent, LlmGateway};
use abi_data::DataStore;
use abi_llm::{GeminiConfig, GeminiProvider, LlmProvider, MockProvider};
use abi_tools::{register_builtins, BuiltinsConfig, ToolRegistry};
use anyhow::{anyhow, Context, Result};
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

/// Everything a front end needs to serve sessions
pub struct Runtime {
    pub data: Arc<DataStore>,
    pub agent: Agent,
    pub builtins: BuiltinsConfig,
}

/// Load data and build the agent
pub fn build_runtime(config: &AppConfig) -> Result<Runtime> {
    let data = Arc::new(load_data(config)?);
    let builtins = BuiltinsConfig {
        reference_date: config.data.reference_date,
    };

    let registry = build_registry(Arc::clone(&data), builtins)?;

    let provider = resolve_llm_provider(&config.llm)?;
    info!(provider = %provider.name(), "LLM provider initialized");

    let mut gateway = LlmGateway::new(provider).with_temperature(config.llm.temperature);
    if let Some(model) = &config.llm.model {
        gateway = gateway.with_model(model);
    }
    if let Some(max_tokens) = config.llm.max_tokens {
        gateway = gateway.with_max_tokens(max_tokens);
    }

    let agent = Agent::new(
        Arc::new(gateway),
        Arc::new(registry),
        config.orchestrator.clone(),
    );
    Ok(Runtime {
        data,
        agent,
        builtins,
    })
}

/// Registry holding the built-in tools
pub fn build_registry(data: Arc<DataStore>, builtins: BuiltinsConfig) -> Result<ToolRegistry> {
    let mut registry = ToolRegistry::new();
    register_builtins(&mut registry, data, builtins)
        .context("Failed to register built-in tools")?;
    info!(tools = registry.len(), "Tool registry initialized");
    Ok(registry)
}

/// Load only the data store
pub fn load_data(config: &AppConfig) -> Result<DataStore> {
    let directory = &config.data.directory;
    DataStore::load(directory)
        .map_err(friendly)
        .with_context(|| format!("Failed to load data from {}", directory.display()))
}

/// Render a core error the way the CLI shows it
fn friendly(error: impl Into<abi_core::Error>) -> anyhow::Error {
    anyhow!(format_error_for_cli(&error.into()))
}

fn resolve_llm_provider(config: &LlmConfig) -> Result<Arc<dyn LlmProvider>> {
    match config.provider.trim().to_lowercase().as_str() {
        "gemini" | "google" => {
            let mut gemini = match &config.api_key {
                Some(key) if !key.trim().is_empty() => GeminiConfig::new(key.trim()),
                _ => GeminiConfig::from_env().map_err(friendly)?,
            };
            gemini = gemini.with_timeout(Duration::from_secs(config.timeout_secs));
            if let Some(model) = &config.model {
                gemini = gemini.with_model(model);
            }
            if let Some(max_tokens) = config.max_tokens {
                gemini = gemini.with_max_tokens(max_tokens);
            }
            Ok(Arc::new(GeminiProvider::new(gemini).map_err(friendly)?))
        }
        "mock" => Ok(Arc::new(MockProvider::new())),
        other => Err(friendly(abi_core::Error::Configuration(format!(
            "unknown LLM provider '{other}' (expected 'gemini' or 'mock')"
        )))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_provider() {
        let config = LlmConfig {
            provider: "carrier-pigeon".to_string(),
            ..LlmConfig::default()
        };
        let err = resolve_llm_provider(&config).err().unwrap();
        assert!(err.to_string().contains("carrier-pigeon"));
        assert!(err.to_string().contains("Configuration error"));
    }

    #[test]
    fn test_mock_provider() {
        let config = LlmConfig {
            provider: "Mock".to_string(),
            ..LlmConfig::default()
        };
        assert_eq!(resolve_llm_provider(&config).unwrap().name(), "mock");
    }

    #[test]
    fn test_gemini_with_explicit_key() {
        let config = LlmConfig {
            api_key: Some("AIza-test-key-1234567890".to_string()),
            model: Some("gemini-2.5-pro".to_string()),
            ..LlmConfig::default()
        };
        let provider = resolve_llm_provider(&config).unwrap();
        assert_eq!(provider.name(), "gemini");
        assert_eq!(provider.default_model(), "gemini-2.5-pro");
    }

    #[test]
    fn test_missing_data_directory() {
        let mut config = AppConfig::default();
        config.data.directory = std::path::PathBuf::from("/nonexistent/abi-data");
        let err = build_runtime(&config).err().unwrap();
        let rendered = format!("{err:#}");
        assert!(rendered.contains("/nonexistent/abi-data"));
        assert!(rendered.contains("Could not load business data"));
        assert!(rendered.contains("data.directory"));
    }
}
