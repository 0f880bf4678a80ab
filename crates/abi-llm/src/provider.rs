//! LLM Provider trait definition

use crate::chat::{ChatRequest, ChatResponse};
use crate::error::Result;

/// A language model reachable through one call
#[async_trait::async_trait]
pub trait LlmProvider: Send + Sync {
    /// Short provider name for logs
    fn name(&self) -> &str;

    /// Model used when a request leaves `model` empty
    fn default_model(&self) -> &str;

    /// Send the conversation and return the model's reply
    async fn chat(&self, request: ChatRequest) -> Result<ChatResponse>;
}
