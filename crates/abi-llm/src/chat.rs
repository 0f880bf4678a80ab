//! Chat - One provider-neutral model call

use crate::message::{Message, ToolCall};
use serde_json::Value;

/// Function offered to the model, described by a JSON Schema object
#[derive(Debug, Clone, PartialEq)]
pub struct ToolDefinition {
    /// Function name
    pub name: String,
    /// What the function does
    pub description: String,
    /// JSON Schema of the arguments object
    pub parameters: Value,
}

impl ToolDefinition {
    /// Describe a function
    #[must_use]
    pub fn new(name: impl Into<String>, description: impl Into<String>, parameters: Value) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            parameters,
        }
    }
}

/// The conversation so far plus the tools on offer
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChatRequest {
    /// Model name; empty selects the provider default
    pub model: String,
    /// Conversation, oldest first
    pub messages: Vec<Message>,
    /// Callable functions
    pub tools: Vec<ToolDefinition>,
    /// Sampling temperature
    pub temperature: Option<f32>,
    /// Output token cap
    pub max_tokens: Option<u32>,
}

impl ChatRequest {
    /// Request for `model` over `messages`
    #[must_use]
    pub fn new(model: impl Into<String>, messages: Vec<Message>) -> Self {
        Self {
            model: model.into(),
            messages,
            ..Self::default()
        }
    }

    /// Offer tools
    #[must_use]
    pub fn with_tools(mut self, tools: Vec<ToolDefinition>) -> Self {
        self.tools = tools;
        self
    }

    /// Set the sampling temperature
    #[must_use]
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    /// Cap the output length
    #[must_use]
    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }
}

/// The model's reply: text, tool calls, or both
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChatResponse {
    /// Text part, if any
    pub text: Option<String>,
    /// Requested calls in emission order
    pub tool_calls: Vec<ToolCall>,
    /// Model that produced the reply
    pub model: String,
}

impl ChatResponse {
    /// Plain text reply
    #[must_use]
    pub fn answer(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            ..Self::default()
        }
    }

    /// Reply requesting tool calls
    #[must_use]
    pub fn calling(tool_calls: Vec<ToolCall>) -> Self {
        Self {
            tool_calls,
            ..Self::default()
        }
    }
}
