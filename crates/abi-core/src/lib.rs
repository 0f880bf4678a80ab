//! ABI Core - Orchestration Engine
//!
//! This crate provides the conversational core of the ABI agent:
//! - Session: one login, its conversation history and latest trace
//! - Gateway: turns history and tool specs into a model decision
//! - Prompt: role-specific system instructions
//! - Orchestrator: the bounded decide, dispatch, observe loop

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod error;
pub mod gateway;
pub mod orchestrator;
pub mod prompt;
pub mod session;

pub use error::{format_error_for_cli, Error, Result, UserFriendlyError, GENERIC_FAILURE_MESSAGE};
pub use gateway::{Decision, GatewayError, LlmGateway, ModelGateway};
pub use orchestrator::{Agent, OrchestratorConfig, TurnOutcome, TurnStatus};
pub use prompt::system_prompt;
pub use session::{ConversationHistory, ConversationTurn, Session, TurnContent, TurnRole};
