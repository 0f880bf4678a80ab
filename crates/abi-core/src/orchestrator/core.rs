//! Orchestrator core structure

use abi_tools::{Role, ToolRegistry, ToolRunner, ToolSpec};
use std::sync::Arc;

use super::config::OrchestratorConfig;
use crate::gateway::ModelGateway;

/// The conversational agent
///
/// An agent is shared by every session; all per-conversation state lives in
/// the [`Session`](crate::Session) passed to [`Agent::submit`].
pub struct Agent {
    pub(crate) gateway: Arc<dyn ModelGateway>,
    pub(crate) runner: ToolRunner,
    pub(crate) config: OrchestratorConfig,
}

impl Agent {
    /// Create a new agent
    #[must_use]
    pub fn new(
        gateway: Arc<dyn ModelGateway>,
        registry: Arc<ToolRegistry>,
        config: OrchestratorConfig,
    ) -> Self {
        let runner = ToolRunner::new(registry, config.runner_config());
        Self {
            gateway,
            runner,
            config,
        }
    }

    /// Get the tool runner
    #[must_use]
    pub fn runner(&self) -> &ToolRunner {
        &self.runner
    }

    /// Get the tool registry
    #[must_use]
    pub fn registry(&self) -> &ToolRegistry {
        self.runner.registry()
    }

    /// Get the configuration
    #[must_use]
    pub fn config(&self) -> &OrchestratorConfig {
        &self.config
    }

    /// Tools advertised to the model for `role`
    #[must_use]
    pub fn visible_tools(&self, role: Role) -> Vec<ToolSpec> {
        self.registry()
            .visible_tools(role)
            .into_iter()
            .cloned()
            .collect()
    }
}
