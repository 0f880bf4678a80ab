//! Gateway - Model decision adapter
//!
//! The gateway hides the language model behind one call: given the system
//! prompt, the conversation and the tools visible to the role, return either
//! a final answer or a non-empty list of tool calls. It never retries; the
//! orchestrator owns retry policy.

use crate::session::{ConversationTurn, TurnContent, TurnRole};
use abi_llm::{ChatRequest, ChatResponse, LlmProvider, Message, ToolCall};
use abi_tools::{ToolCallRequest, ToolSpec};
use serde_json::Value;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, warn};

/// What the model wants to do next
#[derive(Debug, Clone, PartialEq)]
pub enum Decision {
    /// Answer the user and end the turn
    FinalAnswer {
        /// Answer text
        text: String,
        /// Reasoning kept apart from the answer
        rationale: Option<String>,
    },
    /// Run tools, then ask again
    ToolCalls {
        /// Requested calls, never empty
        calls: Vec<ToolCallRequest>,
        /// Free text returned alongside the calls
        rationale: Option<String>,
    },
}

/// Gateway failure; every variant counts toward the retry budget
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GatewayError {
    /// The model answered with something the protocol does not allow
    #[error("protocol error: {0}")]
    Protocol(String),

    /// The provider could not be reached or rejected the request
    #[error("provider error: {0}")]
    Provider(String),
}

impl GatewayError {
    /// Short machine-readable kind
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Protocol(_) => "protocol",
            Self::Provider(_) => "provider",
        }
    }
}

impl From<abi_llm::Error> for GatewayError {
    fn from(e: abi_llm::Error) -> Self {
        Self::Provider(e.to_string())
    }
}

/// Source of model decisions
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait ModelGateway: Send + Sync {
    /// Decide the next step for the conversation
    async fn decide(
        &self,
        system_prompt: &str,
        history: &[ConversationTurn],
        tools: &[ToolSpec],
    ) -> Result<Decision, GatewayError>;
}

/// Gateway backed by an [`LlmProvider`]
pub struct LlmGateway {
    provider: Arc<dyn LlmProvider>,
    model: String,
    temperature: Option<f32>,
    max_tokens: Option<u32>,
}

impl LlmGateway {
    /// Create a gateway using the provider's default model
    #[must_use]
    pub fn new(provider: Arc<dyn LlmProvider>) -> Self {
        Self {
            provider,
            model: String::new(),
            temperature: Some(0.0),
            max_tokens: None,
        }
    }

    /// Use a specific model
    #[must_use]
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Set the sampling temperature
    #[must_use]
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    /// Cap the response length
    #[must_use]
    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }

    /// Name of the underlying provider
    #[must_use]
    pub fn provider_name(&self) -> &str {
        self.provider.name()
    }

    /// Model requests go to; the provider default when none was set
    #[must_use]
    pub fn model(&self) -> &str {
        if self.model.is_empty() {
            self.provider.default_model()
        } else {
            &self.model
        }
    }

    fn build_request(
        &self,
        system_prompt: &str,
        history: &[ConversationTurn],
        tools: &[ToolSpec],
    ) -> ChatRequest {
        ChatRequest {
            temperature: self.temperature,
            max_tokens: self.max_tokens,
            ..ChatRequest::new(self.model(), to_messages(system_prompt, history))
                .with_tools(tools.iter().map(ToolSpec::to_llm_tool).collect())
        }
    }
}

#[async_trait::async_trait]
impl ModelGateway for LlmGateway {
    async fn decide(
        &self,
        system_prompt: &str,
        history: &[ConversationTurn],
        tools: &[ToolSpec],
    ) -> Result<Decision, GatewayError> {
        let request = self.build_request(system_prompt, history, tools);
        debug!(
            provider = %self.provider.name(),
            model = %request.model,
            messages = request.messages.len(),
            tools = request.tools.len(),
            "Requesting model decision"
        );

        let response = self.provider.chat(request).await.map_err(|e| {
            warn!(provider = %self.provider.name(), error = %e, "Provider call failed");
            GatewayError::from(e)
        })?;

        parse_response(response, next_agent_turn(history))
    }
}

/// 1-based index of the agent turn the next decision produces
fn next_agent_turn(history: &[ConversationTurn]) -> usize {
    history.iter().filter(|t| t.role == TurnRole::Agent).count() + 1
}

fn to_messages(system_prompt: &str, history: &[ConversationTurn]) -> Vec<Message> {
    let mut messages = Vec::with_capacity(history.len() + 1);
    if !system_prompt.trim().is_empty() {
        messages.push(Message::system(system_prompt));
    }

    for turn in history {
        let message = match (&turn.content, turn.role) {
            (TurnContent::Text(text), TurnRole::User) => Message::user(text),
            (TurnContent::Text(text), _) => Message::assistant(text),
            (TurnContent::ToolCalls(calls), _) => Message::requesting(
                calls
                    .iter()
                    .map(|call| ToolCall {
                        id: call.id.clone(),
                        name: call.name.clone(),
                        arguments: Value::Object(call.arguments.clone()).to_string(),
                    })
                    .collect(),
            ),
            (TurnContent::ToolResult(result), _) => {
                Message::tool_output(&result.call_id, &result.tool_name, result.to_model_content())
            }
        };
        messages.push(message);
    }
    messages
}

fn parse_response(response: ChatResponse, turn: usize) -> Result<Decision, GatewayError> {
    let text = response
        .text
        .map(|c| c.trim().to_string())
        .filter(|c| !c.is_empty());

    if response.tool_calls.is_empty() {
        return match text {
            Some(text) => Ok(Decision::FinalAnswer {
                text,
                rationale: None,
            }),
            None => Err(GatewayError::Protocol(
                "response has neither text nor tool calls".to_string(),
            )),
        };
    }

    let calls = response
        .tool_calls
        .into_iter()
        .enumerate()
        .map(|(index, call)| parse_call(call, turn, index))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Decision::ToolCalls {
        calls,
        rationale: text,
    })
}

fn parse_call(call: ToolCall, turn: usize, index: usize) -> Result<ToolCallRequest, GatewayError> {
    let name = call.name.trim();
    if name.is_empty() {
        return Err(GatewayError::Protocol(format!("tool call {index} has an empty name")));
    }

    let raw = call.arguments.trim();
    let arguments = if raw.is_empty() {
        serde_json::Map::new()
    } else {
        match serde_json::from_str::<Value>(raw) {
            Ok(Value::Object(map)) => map,
            Ok(other) => {
                return Err(GatewayError::Protocol(format!(
                    "arguments for '{name}' must be a JSON object, got {other}"
                )))
            }
            Err(e) => {
                return Err(GatewayError::Protocol(format!(
                    "arguments for '{name}' are not valid JSON: {e}"
                )))
            }
        }
    };

    let id = if call.id.is_empty() {
        format!("call_{turn}_{index}")
    } else {
        call.id
    };
    Ok(ToolCallRequest::new(id, name, arguments))
}
