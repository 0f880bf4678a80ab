//! ABI LLM - LLM Provider Abstraction
//!
//! This crate provides the language-model plumbing for the ABI agent:
//! - Messages and tool calls exchanged with a model
//! - `ChatRequest`/`ChatResponse`: one provider-neutral model call
//! - `LlmProvider`: the provider trait
//! - Gemini: Google Gemini over the public REST API
//! - Mock: scripted provider for tests and offline runs

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod chat;
pub mod error;
pub mod gemini;
pub mod message;
pub mod mock;
pub mod provider;

pub use chat::{ChatRequest, ChatResponse, ToolDefinition};
pub use error::{Error, Result};
pub use gemini::{GeminiConfig, GeminiProvider};
pub use message::{Message, MessageRole, ToolCall};
pub use mock::MockProvider;
pub use provider::LlmProvider;
