//! Orchestrator configuration

use abi_tools::RunnerConfig;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Configuration for the orchestration loop
///
/// A failed gateway call is retried exactly once; that is not configurable
/// and a stale `gateway_retries` key fails the load.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OrchestratorConfig {
    /// Maximum decision cycles per user turn
    pub max_iterations: usize,
    /// Per-invocation tool timeout in seconds
    pub tool_timeout_secs: u64,
}

impl Default for OrchestratorConfig {
    fn default() -> Self {
        Self {
            max_iterations: 5,
            tool_timeout_secs: 30,
        }
    }
}

impl OrchestratorConfig {
    /// Create a new configuration
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set maximum iterations
    #[must_use]
    pub fn with_max_iterations(mut self, max: usize) -> Self {
        self.max_iterations = max;
        self
    }

    /// Set the tool timeout
    #[must_use]
    pub fn with_tool_timeout(mut self, timeout: Duration) -> Self {
        self.tool_timeout_secs = timeout.as_secs();
        self
    }

    /// Tool timeout as a duration
    #[must_use]
    pub fn tool_timeout(&self) -> Duration {
        Duration::from_secs(self.tool_timeout_secs)
    }

    /// Runner configuration derived from these settings
    #[must_use]
    pub fn runner_config(&self) -> RunnerConfig {
        RunnerConfig::default().with_timeout(self.tool_timeout())
    }
}
