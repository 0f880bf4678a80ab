//! Trace - Immutable snapshot of one turn
//!
//! Payload fields read by the timeline, per kind:
//! - `model_decision`: `calls` (list of `{id, name, arguments}`)
//! - `model_rationale`, `final_answer`: `text`
//! - `tool_invocation`: `tool`, `arguments`
//! - `tool_result`: `tool`, `success`, `error`
//! - `gateway_error`: `attempt`, `message`
//! - `loop_limit_exceeded`: `max_iterations`

use crate::error::Result;
use crate::event::{TraceEntry, TraceKind};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Longest text shown in a timeline line
const SUMMARY_MAX_CHARS: usize = 80;

/// Ordered, read-only list of trace entries
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Trace {
    entries: Vec<TraceEntry>,
}

/// One rendered line of the glass-box view
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimelineEntry {
    /// Step index
    pub step: u32,
    /// Entry kind
    pub kind: TraceKind,
    /// Human-readable summary
    pub summary: String,
}

impl std::fmt::Display for TimelineEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.step, self.summary)
    }
}

impl Trace {
    /// Wrap recorded entries
    #[must_use]
    pub fn new(entries: Vec<TraceEntry>) -> Self {
        Self { entries }
    }

    /// Entries in recording order
    #[must_use]
    pub fn entries(&self) -> &[TraceEntry] {
        &self.entries
    }

    /// Number of entries
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the trace is empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of entries of `kind`
    #[must_use]
    pub fn count(&self, kind: TraceKind) -> usize {
        self.entries.iter().filter(|e| e.kind == kind).count()
    }

    /// Kinds in recording order
    #[must_use]
    pub fn kinds(&self) -> Vec<TraceKind> {
        self.entries.iter().map(|e| e.kind).collect()
    }

    /// Last entry, if any
    #[must_use]
    pub fn last(&self) -> Option<&TraceEntry> {
        self.entries.last()
    }

    /// Export as a JSON list of `{step, kind, payload}`
    #[must_use]
    pub fn to_value(&self) -> Value {
        Value::Array(
            self.entries
                .iter()
                .map(|e| {
                    serde_json::json!({
                        "step": e.step,
                        "kind": e.kind.as_str(),
                        "payload": e.payload,
                    })
                })
                .collect(),
        )
    }

    /// Pretty-printed JSON export
    ///
    /// # Errors
    ///
    /// Returns an error if a payload cannot be serialized.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(&self.to_value())?)
    }

    /// One summary line per entry
    #[must_use]
    pub fn timeline(&self) -> Vec<TimelineEntry> {
        self.entries
            .iter()
            .map(|entry| TimelineEntry {
                step: entry.step,
                kind: entry.kind,
                summary: summarize(entry),
            })
            .collect()
    }
}

fn summarize(entry: &TraceEntry) -> String {
    let payload = &entry.payload;
    match entry.kind {
        TraceKind::ModelDecision => {
            let names: Vec<&str> = payload
                .get("calls")
                .and_then(Value::as_array)
                .map(|calls| {
                    calls
                        .iter()
                        .filter_map(|c| c.get("name").and_then(Value::as_str))
                        .collect()
                })
                .unwrap_or_default();
            format!("Model requested {} tool call(s): {}", names.len(), names.join(", "))
        }
        TraceKind::ModelRationale => {
            format!("Model reasoning: {}", truncate(entry.payload_str("text").unwrap_or("")))
        }
        TraceKind::ToolInvocation => {
            let tool = entry.payload_str("tool").unwrap_or("unknown");
            let arguments = payload
                .get("arguments")
                .map(Value::to_string)
                .unwrap_or_else(|| "{}".to_string());
            format!("Calling {tool} {}", truncate(&arguments))
        }
        TraceKind::ToolResult => {
            let tool = entry.payload_str("tool").unwrap_or("unknown");
            let success = payload.get("success").and_then(Value::as_bool).unwrap_or(false);
            if success {
                format!("{tool} succeeded")
            } else {
                let error = entry.payload_str("error").unwrap_or("unknown error");
                format!("{tool} failed: {}", truncate(error))
            }
        }
        TraceKind::FinalAnswer => {
            format!("Answer: {}", truncate(entry.payload_str("text").unwrap_or("")))
        }
        TraceKind::GatewayError => {
            let attempt = payload.get("attempt").and_then(Value::as_u64).unwrap_or(1);
            let message = entry.payload_str("message").unwrap_or("unknown error");
            format!("Model call failed (attempt {attempt}): {}", truncate(message))
        }
        TraceKind::LoopLimitExceeded => {
            match payload.get("max_iterations").and_then(Value::as_u64) {
                Some(max) => format!("Stopped after {max} decision cycles"),
                None => "Stopped: decision cycle limit reached".to_string(),
            }
        }
    }
}

fn truncate(s: &str) -> String {
    match s.char_indices().nth(SUMMARY_MAX_CHARS) {
        Some((end, _)) => format!("{}...", &s[..end]),
        None => s.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recorder::TraceRecorder;
    use serde_json::json;

    fn customer_turn() -> Trace {
        let mut recorder = TraceRecorder::new();
        recorder.record(
            TraceKind::ModelDecision,
            json!({"cycle": 1, "calls": [{"id": "call_1_0", "name": "get_order_status", "arguments": {"customer_id": "CUST_001"}}]}),
        );
        recorder.record(
            TraceKind::ToolInvocation,
            json!({"call_id": "call_1_0", "tool": "get_order_status", "arguments": {"customer_id": "CUST_001"}}),
        );
        recorder.record(
            TraceKind::ToolResult,
            json!({"call_id": "call_1_0", "tool": "get_order_status", "success": true, "output": {"status": "Out for Delivery"}, "error": null}),
        );
        recorder.record(
            TraceKind::FinalAnswer,
            json!({"cycle": 2, "text": "Your order is out for delivery."}),
        );
        recorder.snapshot()
    }

    #[test]
    fn test_counts_and_kinds() {
        let trace = customer_turn();
        assert_eq!(trace.len(), 4);
        assert_eq!(trace.count(TraceKind::ToolResult), 1);
        assert_eq!(trace.count(TraceKind::GatewayError), 0);
        assert_eq!(
            trace.kinds(),
            vec![
                TraceKind::ModelDecision,
                TraceKind::ToolInvocation,
                TraceKind::ToolResult,
                TraceKind::FinalAnswer
            ]
        );
        assert_eq!(trace.last().unwrap().kind, TraceKind::FinalAnswer);
    }

    #[test]
    fn test_json_export() {
        let trace = customer_turn();
        let value = trace.to_value();
        assert_eq!(value[0]["step"], 1);
        assert_eq!(value[0]["kind"], "model_decision");
        assert_eq!(value[3]["payload"]["text"], "Your order is out for delivery.");

        let parsed: Value = serde_json::from_str(&trace.to_json().unwrap()).unwrap();
        assert_eq!(parsed, value);
    }

    #[test]
    fn test_serde_is_a_plain_list() {
        let trace = customer_turn();
        let value = serde_json::to_value(&trace).unwrap();
        assert!(value.is_array());
        let back: Trace = serde_json::from_value(value).unwrap();
        assert_eq!(back, trace);
    }

    #[test]
    fn test_timeline() {
        let lines: Vec<String> = customer_turn()
            .timeline()
            .iter()
            .map(ToString::to_string)
            .collect();
        assert_eq!(lines[0], "[1] Model requested 1 tool call(s): get_order_status");
        assert_eq!(lines[1], "[2] Calling get_order_status {\"customer_id\":\"CUST_001\"}");
        assert_eq!(lines[2], "[3] get_order_status succeeded");
        assert_eq!(lines[3], "[4] Answer: Your order is out for delivery.");
    }

    #[test]
    fn test_timeline_failures() {
        let mut recorder = TraceRecorder::new();
        recorder.record(
            TraceKind::ToolResult,
            json!({"tool": "get_customer_orders", "success": false, "error": "forbidden"}),
        );
        recorder.record(TraceKind::GatewayError, json!({"attempt": 2, "message": "rate limited"}));
        recorder.record(TraceKind::LoopLimitExceeded, json!({"max_iterations": 5}));

        let timeline = recorder.snapshot().timeline();
        assert_eq!(timeline[0].summary, "get_customer_orders failed: forbidden");
        assert_eq!(timeline[1].summary, "Model call failed (attempt 2): rate limited");
        assert_eq!(timeline[2].summary, "Stopped after 5 decision cycles");
    }

    #[test]
    fn test_truncate() {
        let long = "x".repeat(200);
        let out = truncate(&long);
        assert_eq!(out.len(), SUMMARY_MAX_CHARS + 3);
        assert!(out.ends_with("..."));
        assert_eq!(truncate("short"), "short");
    }
}
