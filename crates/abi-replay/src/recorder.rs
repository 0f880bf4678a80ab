//! TraceRecorder - Step-numbered recording during a turn

use crate::event::{TraceEntry, TraceKind};
use crate::trace::Trace;
use serde_json::Value;
use tracing::debug;

/// Records trace entries for one turn at a time
#[derive(Debug, Clone)]
pub struct TraceRecorder {
    entries: Vec<TraceEntry>,
    next_step: u32,
}

impl Default for TraceRecorder {
    fn default() -> Self {
        Self::new()
    }
}

impl TraceRecorder {
    /// Create an empty recorder
    #[must_use]
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            next_step: 1,
        }
    }

    /// Record an entry with automatic step numbering
    pub fn record(&mut self, kind: TraceKind, payload: Value) -> &TraceEntry {
        let step = self.next_step;
        self.next_step += 1;
        debug!(step, kind = %kind, "Trace entry recorded");

        self.entries.push(TraceEntry::new(step, kind, payload));
        &self.entries[self.entries.len() - 1]
    }

    /// Immutable copy of everything recorded so far
    #[must_use]
    pub fn snapshot(&self) -> Trace {
        Trace::new(self.entries.clone())
    }

    /// Forget all entries and restart numbering at 1
    pub fn reset(&mut self) {
        self.entries.clear();
        self.next_step = 1;
    }

    /// Number of entries recorded
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether nothing has been recorded
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_steps_are_monotonic() {
        let mut recorder = TraceRecorder::new();
        recorder.record(TraceKind::ModelDecision, json!({}));
        recorder.record(TraceKind::ToolInvocation, json!({}));
        let last = recorder.record(TraceKind::ToolResult, json!({}));
        assert_eq!(last.step, 3);

        let steps: Vec<u32> = recorder.snapshot().entries().iter().map(|e| e.step).collect();
        assert_eq!(steps, vec![1, 2, 3]);
    }

    #[test]
    fn test_snapshot_is_detached() {
        let mut recorder = TraceRecorder::new();
        recorder.record(TraceKind::FinalAnswer, json!({"text": "hi"}));
        let snapshot = recorder.snapshot();

        recorder.record(TraceKind::FinalAnswer, json!({"text": "again"}));
        assert_eq!(snapshot.len(), 1);
        assert_eq!(recorder.len(), 2);
    }

    #[test]
    fn test_reset_restarts_numbering() {
        let mut recorder = TraceRecorder::new();
        recorder.record(TraceKind::GatewayError, json!({}));
        recorder.record(TraceKind::GatewayError, json!({}));
        recorder.reset();
        assert!(recorder.is_empty());

        let entry = recorder.record(TraceKind::FinalAnswer, json!({}));
        assert_eq!(entry.step, 1);
    }
}
