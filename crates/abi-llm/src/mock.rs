//! Mock LLM Provider for testing
//!
//! Scripted replies are served first-in first-out. Every request is kept so
//! tests can check what the model was shown.

use crate::chat::{ChatRequest, ChatResponse};
use crate::error::{Error, Result};
use crate::message::ToolCall;
use crate::provider::LlmProvider;

use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard};

const MOCK_MODEL: &str = "mock-model";
const FALLBACK_REPLY: &str = "mock response";

#[derive(Default)]
struct Script {
    replies: VecDeque<Result<ChatResponse>>,
    seen: Vec<ChatRequest>,
}

/// Provider that replays a script, then answers with a fixed text
#[derive(Clone, Default)]
pub struct MockProvider {
    script: Arc<Mutex<Script>>,
}

impl MockProvider {
    /// Empty script
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn script(&self) -> MutexGuard<'_, Script> {
        self.script.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Queue a full reply
    pub fn push_response(&self, response: ChatResponse) {
        self.script().replies.push_back(Ok(response));
    }

    /// Queue a text answer
    pub fn push_answer(&self, text: impl Into<String>) {
        self.push_response(ChatResponse::answer(text));
    }

    /// Queue one tool call with JSON arguments
    pub fn push_tool_call(&self, name: impl Into<String>, arguments: serde_json::Value) {
        self.push_response(ChatResponse::calling(vec![ToolCall {
            id: String::new(),
            name: name.into(),
            arguments: arguments.to_string(),
        }]));
    }

    /// Queue a provider failure
    pub fn push_error(&self, error: Error) {
        self.script().replies.push_back(Err(error));
    }

    /// Requests received so far, oldest first
    #[must_use]
    pub fn requests(&self) -> Vec<ChatRequest> {
        self.script().seen.clone()
    }

    /// Number of requests received
    #[must_use]
    pub fn call_count(&self) -> usize {
        self.script().seen.len()
    }
}

#[async_trait::async_trait]
impl LlmProvider for MockProvider {
    fn name(&self) -> &str {
        "mock"
    }

    fn default_model(&self) -> &str {
        MOCK_MODEL
    }

    async fn chat(&self, request: ChatRequest) -> Result<ChatResponse> {
        let mut script = self.script();
        script.seen.push(request);
        let mut response = script
            .replies
            .pop_front()
            .unwrap_or_else(|| Ok(ChatResponse::answer(FALLBACK_REPLY)))?;
        if response.model.is_empty() {
            response.model = MOCK_MODEL.to_string();
        }
        Ok(response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::message::Message;

    fn request() -> ChatRequest {
        ChatRequest::new("", vec![Message::user("hi")])
    }

    #[tokio::test]
    async fn test_replies_in_order() {
        let mock = MockProvider::new();
        mock.push_tool_call("get_data_schema", serde_json::json!({}));
        mock.push_answer("done");

        let first = mock.chat(request()).await.unwrap();
        assert_eq!(first.tool_calls[0].name, "get_data_schema");
        assert_eq!(first.model, MOCK_MODEL);

        let second = mock.chat(request()).await.unwrap();
        assert_eq!(second.text.as_deref(), Some("done"));

        let fallback = mock.chat(request()).await.unwrap();
        assert_eq!(fallback.text.as_deref(), Some(FALLBACK_REPLY));
        assert_eq!(mock.call_count(), 3);
    }

    #[tokio::test]
    async fn test_queued_error_then_fallback() {
        let mock = MockProvider::new();
        mock.push_error(Error::RateLimit);

        let err = mock.chat(request()).await.unwrap_err();
        assert!(matches!(err, Error::RateLimit));
        assert!(mock.chat(request()).await.is_ok());
    }

    #[tokio::test]
    async fn test_requests_captured() {
        let mock = MockProvider::new();
        let _ = mock.chat(request()).await;

        let captured = mock.requests();
        assert_eq!(captured.len(), 1);
        assert_eq!(captured[0].messages[0].content, "hi");
    }
}
