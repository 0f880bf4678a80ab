//! Session - One login and its conversation
//!
//! A session owns the append-only conversation history, the active role and
//! the trace recorder for the turn in flight. It is created at login and
//! dropped at logout; nothing outlives it.

use abi_data::normalize_id;
use abi_replay::{Trace, TraceRecorder};
use abi_tools::{Caller, Role, ToolCallRequest, ToolCallResult};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

/// Author of a conversation turn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TurnRole {
    /// The signed-in user
    User,
    /// The agent (model output)
    Agent,
    /// A tool result
    Tool,
}

/// Body of a conversation turn
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum TurnContent {
    /// Plain text
    Text(String),
    /// Tool calls the agent requested
    ToolCalls(Vec<ToolCallRequest>),
    /// Result of one tool call
    ToolResult(ToolCallResult),
}

/// One entry of the conversation history
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversationTurn {
    /// Who produced the turn
    pub role: TurnRole,
    /// What was said or done
    pub content: TurnContent,
    /// When the turn was appended
    pub timestamp: DateTime<Utc>,
}

impl ConversationTurn {
    fn new(role: TurnRole, content: TurnContent) -> Self {
        Self {
            role,
            content,
            timestamp: Utc::now(),
        }
    }

    /// A user utterance
    #[must_use]
    pub fn user(text: impl Into<String>) -> Self {
        Self::new(TurnRole::User, TurnContent::Text(text.into()))
    }

    /// An agent text answer
    #[must_use]
    pub fn agent(text: impl Into<String>) -> Self {
        Self::new(TurnRole::Agent, TurnContent::Text(text.into()))
    }

    /// An agent turn requesting tool calls
    #[must_use]
    pub fn tool_calls(calls: Vec<ToolCallRequest>) -> Self {
        Self::new(TurnRole::Agent, TurnContent::ToolCalls(calls))
    }

    /// A tool result
    #[must_use]
    pub fn tool_result(result: ToolCallResult) -> Self {
        Self::new(TurnRole::Tool, TurnContent::ToolResult(result))
    }

    /// Text body, if this is a text turn
    #[must_use]
    pub fn text(&self) -> Option<&str> {
        match &self.content {
            TurnContent::Text(text) => Some(text),
            _ => None,
        }
    }
}

/// Append-only list of turns
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConversationHistory {
    turns: Vec<ConversationTurn>,
}

impl ConversationHistory {
    /// Create an empty history
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a turn
    pub fn push(&mut self, turn: ConversationTurn) {
        self.turns.push(turn);
    }

    /// All turns, oldest first
    #[must_use]
    pub fn turns(&self) -> &[ConversationTurn] {
        &self.turns
    }

    /// Most recent turn
    #[must_use]
    pub fn last(&self) -> Option<&ConversationTurn> {
        self.turns.last()
    }

    /// Number of turns
    #[must_use]
    pub fn len(&self) -> usize {
        self.turns.len()
    }

    /// Whether the history is empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }
}

/// A signed-in user and their conversation
#[derive(Debug)]
pub struct Session {
    id: Uuid,
    role: Role,
    username: String,
    customer_id: Option<String>,
    started_at: DateTime<Utc>,
    pub(crate) history: ConversationHistory,
    pub(crate) recorder: TraceRecorder,
}

impl Session {
    fn new(role: Role, username: impl Into<String>, customer_id: Option<String>) -> Self {
        let session = Self {
            id: Uuid::new_v4(),
            role,
            username: username.into(),
            customer_id,
            started_at: Utc::now(),
            history: ConversationHistory::new(),
            recorder: TraceRecorder::new(),
        };
        info!(
            session_id = %session.id,
            role = %session.role,
            user = %session.username,
            "Session started"
        );
        session
    }

    /// Sign in a customer; the id is normalized (`" cust_001"` -> `"CUST_001"`)
    #[must_use]
    pub fn customer(username: impl Into<String>, customer_id: &str) -> Self {
        Self::new(Role::Customer, username, Some(normalize_id(customer_id)))
    }

    /// Sign in a business operator
    #[must_use]
    pub fn business(username: impl Into<String>) -> Self {
        Self::new(Role::Business, username, None)
    }

    /// Session id
    #[must_use]
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Active role
    #[must_use]
    pub fn role(&self) -> Role {
        self.role
    }

    /// Display name of the signed-in user
    #[must_use]
    pub fn username(&self) -> &str {
        &self.username
    }

    /// Customer id, for customer sessions
    #[must_use]
    pub fn customer_id(&self) -> Option<&str> {
        self.customer_id.as_deref()
    }

    /// Login time
    #[must_use]
    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    /// Conversation so far
    #[must_use]
    pub fn history(&self) -> &ConversationHistory {
        &self.history
    }

    /// Trace of the latest turn
    #[must_use]
    pub fn trace(&self) -> Trace {
        self.recorder.snapshot()
    }

    /// Tool caller for this session
    #[must_use]
    pub fn caller(&self) -> Caller {
        match &self.customer_id {
            Some(id) if self.role == Role::Customer => Caller::customer(id.clone()),
            _ => Caller::new(self.role),
        }
    }

    /// Log out; the history and trace are discarded
    pub fn end(self) {
        info!(
            session_id = %self.id,
            turns = self.history.len(),
            "Session ended"
        );
    }
}
