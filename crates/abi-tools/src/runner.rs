//! Runner - Tool execution engine
//!
//! The runner is the execution boundary of the registry: requests are
//! resolved, checked against the caller and validated before the handler
//! runs under a timeout. Handler errors, timeouts and panics all come back
//! as a failed [`ToolCallResult`].

use crate::error::{Error, Result};
use crate::registry::{validate_arguments, Caller, ToolCallRequest, ToolCallResult, ToolRegistry};
use futures::FutureExt;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::time::timeout;
use tracing::{debug, error, instrument, warn};

/// Configuration for the tool runner
#[derive(Debug, Clone)]
pub struct RunnerConfig {
    /// Per-invocation timeout
    pub default_timeout: Duration,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            default_timeout: Duration::from_secs(30),
        }
    }
}

impl RunnerConfig {
    /// Set the per-invocation timeout
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.default_timeout = timeout;
        self
    }
}

/// Tool runner executing registry tools on behalf of a caller
#[derive(Clone)]
pub struct ToolRunner {
    registry: Arc<ToolRegistry>,
    config: RunnerConfig,
}

impl ToolRunner {
    /// Create a new tool runner
    #[must_use]
    pub fn new(registry: Arc<ToolRegistry>, config: RunnerConfig) -> Self {
        Self { registry, config }
    }

    /// Create with default configuration
    #[must_use]
    pub fn with_defaults(registry: Arc<ToolRegistry>) -> Self {
        Self::new(registry, RunnerConfig::default())
    }

    /// Get the registry
    #[must_use]
    pub fn registry(&self) -> &ToolRegistry {
        &self.registry
    }

    /// Get the configuration
    #[must_use]
    pub fn config(&self) -> &RunnerConfig {
        &self.config
    }

    /// Invoke a tool for `caller`
    ///
    /// # Errors
    ///
    /// [`Error::UnknownTool`], [`Error::ForbiddenTool`] or
    /// [`Error::InvalidArguments`] when the request is rejected; no handler
    /// runs in that case. Handler failures are returned as `Ok` with
    /// `success == false`.
    #[instrument(skip(self, request, caller), fields(tool = %request.name, call_id = %request.id, role = %caller.role))]
    pub async fn invoke(&self, request: &ToolCallRequest, caller: &Caller) -> Result<ToolCallResult> {
        let tool = self.registry.authorize(&request.name, caller).map_err(|e| {
            warn!(error = %e, "Tool call rejected");
            e
        })?;
        let arguments = validate_arguments(tool.spec(), &request.arguments, caller).map_err(|e| {
            warn!(error = %e, "Tool call rejected");
            e
        })?;

        let start = Instant::now();
        let limit = self.config.default_timeout;
        debug!(timeout_ms = %limit.as_millis(), "Executing tool");

        let execution = AssertUnwindSafe(tool.execute(arguments)).catch_unwind();
        let outcome = match timeout(limit, execution).await {
            Ok(Ok(Ok(output))) => Ok(output),
            Ok(Ok(Err(e))) => Err(match e {
                Error::HandlerExecution { .. } => e,
                other => Error::handler(&request.name, other.to_string()),
            }),
            Ok(Err(panic)) => Err(Error::handler(
                &request.name,
                format!("handler panicked: {}", panic_message(panic.as_ref())),
            )),
            Err(_) => Err(Error::handler(
                &request.name,
                format!("timed out after {}ms", limit.as_millis()),
            )),
        };

        let duration_ms = start.elapsed().as_millis() as u64;
        let result = match outcome {
            Ok(output) => ToolCallResult::success(&request.id, &request.name, output),
            Err(e) => {
                error!(error = %e, duration_ms, "Tool execution failed");
                ToolCallResult::failure(&request.id, &request.name, e.to_string())
            }
        };

        debug!(success = %result.success, duration_ms, "Tool execution completed");
        Ok(result)
    }

    /// Invoke a tool, folding rejections into a failed result
    pub async fn invoke_or_reject(&self, request: &ToolCallRequest, caller: &Caller) -> ToolCallResult {
        match self.invoke(request, caller).await {
            Ok(result) => result,
            Err(e) => ToolCallResult::rejected(request, &e),
        }
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}
