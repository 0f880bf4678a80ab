//! Orchestrator types

use abi_replay::Trace;
use serde::{Deserialize, Serialize};

/// How a turn ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TurnStatus {
    /// The model produced a final answer
    Completed,
    /// The decision-cycle cap was reached
    LoopLimitExceeded,
    /// The model could not be reached after the retry
    Failed,
}

impl TurnStatus {
    /// Returns the string representation
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Completed => "completed",
            Self::LoopLimitExceeded => "loop_limit_exceeded",
            Self::Failed => "failed",
        }
    }
}

impl std::fmt::Display for TurnStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Result of one submitted utterance
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TurnOutcome {
    /// Text shown to the user
    pub response: String,
    /// Glass-box trace of the turn
    pub trace: Trace,
    /// How the turn ended
    pub status: TurnStatus,
    /// Decision cycles used
    pub iterations: usize,
}
