//! Orchestrator main execution loop

use crate::error::{Error, Result, GENERIC_FAILURE_MESSAGE};
use crate::gateway::Decision;
use crate::prompt::system_prompt;
use crate::session::{ConversationHistory, ConversationTurn, Session};
use abi_replay::{TraceKind, TraceRecorder};
use abi_tools::{Caller, ToolCallRequest, ToolSpec};
use serde_json::json;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use super::core::Agent;
use super::types::{TurnOutcome, TurnStatus};

/// Extra gateway attempts after a failure, within the same cycle
const GATEWAY_RETRIES: u32 = 1;

/// Answer appended when the cycle cap is reached
pub(crate) const LOOP_LIMIT_MESSAGE: &str =
    "I'm sorry, I couldn't finish working on that request. Please try rephrasing or narrowing your question.";

impl Agent {
    /// Process one utterance for `session`
    ///
    /// Tool failures are fed back to the model and never end the turn. Only
    /// gateway failures (after the retry) end it early, with a generic answer.
    ///
    /// # Errors
    ///
    /// [`Error::EmptyUtterance`] if `utterance` is empty or whitespace; the
    /// session is left untouched in that case.
    #[tracing::instrument(skip(self, session, utterance), fields(
        session_id = %session.id(),
        role = %session.role()
    ))]
    pub async fn submit(&self, session: &mut Session, utterance: &str) -> Result<TurnOutcome> {
        let utterance = utterance.trim();
        if utterance.is_empty() {
            return Err(Error::EmptyUtterance);
        }

        let execution_id = Uuid::new_v4();
        let caller = session.caller();
        let tools = self.visible_tools(caller.role);
        let prompt = system_prompt(session.role(), session.customer_id());
        info!(
            execution_id = %execution_id,
            tools = tools.len(),
            "Starting turn"
        );

        session.recorder.reset();
        session.history.push(ConversationTurn::user(utterance));

        let Session {
            history, recorder, ..
        } = session;

        let mut cycle = 0;
        loop {
            cycle += 1;
            if cycle > self.config.max_iterations {
                warn!(
                    execution_id = %execution_id,
                    max_iterations = self.config.max_iterations,
                    "Decision cycle limit reached"
                );
                history.push(ConversationTurn::agent(LOOP_LIMIT_MESSAGE));
                recorder.record(
                    TraceKind::LoopLimitExceeded,
                    json!({ "max_iterations": self.config.max_iterations }),
                );
                return Ok(outcome(
                    recorder,
                    LOOP_LIMIT_MESSAGE,
                    TurnStatus::LoopLimitExceeded,
                    self.config.max_iterations,
                ));
            }

            debug!(execution_id = %execution_id, cycle, "Awaiting model");
            let Some(decision) = self
                .decide_with_retry(&prompt, history, recorder, &tools, cycle)
                .await
            else {
                error!(execution_id = %execution_id, cycle, "Model unavailable, ending turn");
                history.push(ConversationTurn::agent(GENERIC_FAILURE_MESSAGE));
                return Ok(outcome(recorder, GENERIC_FAILURE_MESSAGE, TurnStatus::Failed, cycle));
            };

            match decision {
                Decision::FinalAnswer { text, rationale } => {
                    history.push(ConversationTurn::agent(text.clone()));
                    let mut payload = json!({ "cycle": cycle, "text": text });
                    if let Some(rationale) = rationale {
                        payload["rationale"] = json!(rationale);
                    }
                    recorder.record(TraceKind::FinalAnswer, payload);
                    info!(execution_id = %execution_id, iterations = cycle, "Turn completed");
                    return Ok(outcome(recorder, &text, TurnStatus::Completed, cycle));
                }
                Decision::ToolCalls { calls, rationale } => {
                    info!(
                        execution_id = %execution_id,
                        cycle,
                        calls = calls.len(),
                        "Model requested tools"
                    );
                    recorder.record(
                        TraceKind::ModelDecision,
                        json!({ "cycle": cycle, "calls": calls }),
                    );
                    if let Some(text) = rationale {
                        recorder.record(
                            TraceKind::ModelRationale,
                            json!({ "cycle": cycle, "text": text }),
                        );
                    }
                    history.push(ConversationTurn::tool_calls(calls.clone()));

                    for request in &calls {
                        self.dispatch(request, &caller, history, recorder).await;
                    }
                }
            }
        }
    }

    /// Ask the gateway, retrying a failed attempt once
    async fn decide_with_retry(
        &self,
        prompt: &str,
        history: &ConversationHistory,
        recorder: &mut TraceRecorder,
        tools: &[ToolSpec],
        cycle: usize,
    ) -> Option<Decision> {
        let attempts = GATEWAY_RETRIES + 1;
        for attempt in 1..=attempts {
            match self.gateway.decide(prompt, history.turns(), tools).await {
                Ok(decision) => return Some(decision),
                Err(e) => {
                    warn!(cycle, attempt, kind = e.kind(), error = %e, "Gateway call failed");
                    recorder.record(
                        TraceKind::GatewayError,
                        json!({
                            "cycle": cycle,
                            "attempt": attempt,
                            "kind": e.kind(),
                            "message": e.to_string(),
                        }),
                    );
                }
            }
        }
        None
    }

    /// Run one tool call and append its result
    async fn dispatch(
        &self,
        request: &ToolCallRequest,
        caller: &Caller,
        history: &mut ConversationHistory,
        recorder: &mut TraceRecorder,
    ) {
        recorder.record(
            TraceKind::ToolInvocation,
            json!({
                "call_id": request.id,
                "tool": request.name,
                "arguments": request.arguments,
            }),
        );

        let result = self.runner.invoke_or_reject(request, caller).await;
        if !result.success {
            warn!(
                tool = %request.name,
                call_id = %request.id,
                error = result.error.as_deref().unwrap_or("unknown error"),
                "Tool call failed"
            );
        }

        recorder.record(
            TraceKind::ToolResult,
            json!({
                "call_id": result.call_id,
                "tool": result.tool_name,
                "success": result.success,
                "output": result.output,
                "error": result.error,
            }),
        );
        history.push(ConversationTurn::tool_result(result));
    }
}

fn outcome(recorder: &TraceRecorder, response: &str, status: TurnStatus, iterations: usize) -> TurnOutcome {
    TurnOutcome {
        response: response.to_string(),
        trace: recorder.snapshot(),
        status,
        iterations,
    }
}
