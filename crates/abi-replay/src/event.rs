//! Event - Trace entry kinds and records
//!
//! A trace is an append-only list of entries. Payloads carry only data
//! derived from the conversation, never wall-clock values, so replaying the
//! same turn yields the same trace.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Kind of a trace entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TraceKind {
    /// The model asked for tool calls
    ModelDecision,
    /// Free text the model returned alongside tool calls
    ModelRationale,
    /// A tool call is about to be dispatched
    ToolInvocation,
    /// Outcome of a tool call
    ToolResult,
    /// The model produced the final answer
    FinalAnswer,
    /// A gateway call failed
    GatewayError,
    /// The turn hit the decision-cycle cap
    LoopLimitExceeded,
}

impl TraceKind {
    /// All kinds, in declaration order
    pub const ALL: [TraceKind; 7] = [
        Self::ModelDecision,
        Self::ModelRationale,
        Self::ToolInvocation,
        Self::ToolResult,
        Self::FinalAnswer,
        Self::GatewayError,
        Self::LoopLimitExceeded,
    ];

    /// Returns the string representation of the kind
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ModelDecision => "model_decision",
            Self::ModelRationale => "model_rationale",
            Self::ToolInvocation => "tool_invocation",
            Self::ToolResult => "tool_result",
            Self::FinalAnswer => "final_answer",
            Self::GatewayError => "gateway_error",
            Self::LoopLimitExceeded => "loop_limit_exceeded",
        }
    }
}

impl std::fmt::Display for TraceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for TraceKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|k| k.as_str() == s)
            .ok_or_else(|| format!("unknown trace kind: {s}"))
    }
}

/// A single recorded step
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TraceEntry {
    /// Step index, starting at 1
    pub step: u32,
    /// What happened
    pub kind: TraceKind,
    /// Kind-specific details
    pub payload: Value,
}

impl TraceEntry {
    /// Create a new entry
    #[must_use]
    pub fn new(step: u32, kind: TraceKind, payload: Value) -> Self {
        Self {
            step,
            kind,
            payload,
        }
    }

    /// String field of the payload, if present
    #[must_use]
    pub fn payload_str(&self, key: &str) -> Option<&str> {
        self.payload.get(key).and_then(Value::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_trace_kind_roundtrip() {
        for kind in TraceKind::ALL {
            let parsed: TraceKind = kind.as_str().parse().unwrap();
            assert_eq!(parsed, kind);
        }
        assert!("llm_request".parse::<TraceKind>().is_err());
    }

    #[test]
    fn test_trace_kind_serde_matches_as_str() {
        let json = serde_json::to_value(TraceKind::LoopLimitExceeded).unwrap();
        assert_eq!(json, "loop_limit_exceeded");
    }

    #[test]
    fn test_entry_serialization() {
        let entry = TraceEntry::new(3, TraceKind::ToolResult, json!({"tool": "get_order_status"}));
        let value = serde_json::to_value(&entry).unwrap();
        assert_eq!(
            value,
            json!({"step": 3, "kind": "tool_result", "payload": {"tool": "get_order_status"}})
        );
        assert_eq!(entry.payload_str("tool"), Some("get_order_status"));
        assert_eq!(entry.payload_str("missing"), None);
    }
}
