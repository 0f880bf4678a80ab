//! Wire format of `generateContent` and the mapping to [`ChatRequest`] and
//! [`ChatResponse`]

use crate::chat::{ChatRequest, ChatResponse, ToolDefinition};
use crate::error::{Error, Result};
use crate::message::{MessageRole, ToolCall};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::warn;

/// JSON Schema keywords the endpoint refuses
const REJECTED_SCHEMA_KEYS: [&str; 3] = ["$schema", "additionalProperties", "default"];

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct GenerateRequest {
    pub contents: Vec<Content>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system_instruction: Option<Content>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tools: Vec<ToolGroup>,
    pub generation_config: GenerationConfig,
}

#[derive(Debug, Default, Serialize, Deserialize)]
pub(crate) struct Content {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(default)]
    pub parts: Vec<Part>,
}

/// One part of a turn; exactly one field is set
#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct Part {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub function_call: Option<FunctionCall>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub function_response: Option<FunctionResponse>,
}

#[derive(Debug, Serialize, Deserialize)]
pub(crate) struct FunctionCall {
    pub name: String,
    #[serde(default)]
    pub args: Value,
}

#[derive(Debug, Serialize, Deserialize)]
pub(crate) struct FunctionResponse {
    pub name: String,
    pub response: Value,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ToolGroup {
    pub function_declarations: Vec<FunctionDeclaration>,
}

#[derive(Debug, Serialize)]
pub(crate) struct FunctionDeclaration {
    pub name: String,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parameters: Option<Value>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct GenerationConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
    pub max_output_tokens: u32,
}

#[derive(Debug, Deserialize)]
pub(crate) struct GenerateResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct Candidate {
    #[serde(default)]
    pub content: Option<Content>,
    #[serde(default)]
    pub finish_reason: Option<String>,
}

impl Content {
    fn turn(role: &str, parts: Vec<Part>) -> Self {
        Self {
            role: Some(role.to_string()),
            parts,
        }
    }

    fn only_function_responses(&self) -> bool {
        self.role.as_deref() == Some("user")
            && self.parts.iter().all(|p| p.function_response.is_some())
    }
}

impl Part {
    fn text(text: &str) -> Self {
        Self {
            text: Some(text.to_string()),
            ..Self::default()
        }
    }

    fn call(call: &ToolCall) -> Self {
        let args = serde_json::from_str(&call.arguments).unwrap_or_else(|_| json!({}));
        Self {
            function_call: Some(FunctionCall {
                name: call.name.clone(),
                args,
            }),
            ..Self::default()
        }
    }

    /// The endpoint wants an object; other outputs are wrapped under `result`
    fn output(tool: &str, content: &str) -> Self {
        let response = match serde_json::from_str::<Value>(content) {
            Ok(object @ Value::Object(_)) => object,
            Ok(other) => json!({ "result": other }),
            Err(_) => json!({ "result": content }),
        };
        Self {
            function_response: Some(FunctionResponse {
                name: tool.to_string(),
                response,
            }),
            ..Self::default()
        }
    }
}

/// Build the request body; `default_max_tokens` applies when the request sets none
pub(crate) fn encode(request: &ChatRequest, default_max_tokens: u32) -> GenerateRequest {
    let mut system_instruction = None;
    let mut contents: Vec<Content> = Vec::new();

    for message in &request.messages {
        match message.role {
            MessageRole::System => {
                system_instruction = Some(Content {
                    role: None,
                    parts: vec![Part::text(&message.content)],
                });
            }
            MessageRole::User => {
                if !message.content.is_empty() {
                    contents.push(Content::turn("user", vec![Part::text(&message.content)]));
                }
            }
            MessageRole::Assistant => {
                let mut parts = Vec::new();
                if !message.content.is_empty() {
                    parts.push(Part::text(&message.content));
                }
                parts.extend(message.tool_calls.iter().map(Part::call));
                if !parts.is_empty() {
                    contents.push(Content::turn("model", parts));
                }
            }
            MessageRole::Tool => {
                let Some(tool) = message.name.as_deref() else {
                    continue;
                };
                let part = Part::output(tool, &message.content);
                // outputs of one batch share a single user turn
                match contents.last_mut() {
                    Some(last) if last.only_function_responses() => last.parts.push(part),
                    _ => contents.push(Content::turn("user", vec![part])),
                }
            }
        }
    }

    GenerateRequest {
        contents,
        system_instruction,
        tools: declare(&request.tools),
        generation_config: GenerationConfig {
            temperature: request.temperature,
            max_output_tokens: request.max_tokens.unwrap_or(default_max_tokens),
        },
    }
}

fn declare(tools: &[ToolDefinition]) -> Vec<ToolGroup> {
    if tools.is_empty() {
        return Vec::new();
    }
    let function_declarations = tools
        .iter()
        .map(|tool| {
            let mut schema = tool.parameters.clone();
            scrub_schema(&mut schema);
            let takes_arguments = schema["properties"]
                .as_object()
                .is_some_and(|properties| !properties.is_empty());
            FunctionDeclaration {
                name: tool.name.clone(),
                description: tool.description.clone(),
                parameters: takes_arguments.then_some(schema),
            }
        })
        .collect();
    vec![ToolGroup {
        function_declarations,
    }]
}

pub(crate) fn scrub_schema(value: &mut Value) {
    match value {
        Value::Object(map) => {
            for key in REJECTED_SCHEMA_KEYS {
                map.remove(key);
            }
            map.values_mut().for_each(scrub_schema);
        }
        Value::Array(items) => items.iter_mut().for_each(scrub_schema),
        _ => {}
    }
}

/// Read the first candidate; Gemini assigns no call ids
pub(crate) fn decode(response: GenerateResponse, model: &str) -> Result<ChatResponse> {
    let Some(candidate) = response.candidates.into_iter().next() else {
        return Err(Error::InvalidResponse("no candidates in response".to_string()));
    };

    let mut text = String::new();
    let mut tool_calls = Vec::new();
    for part in candidate.content.map(|c| c.parts).unwrap_or_default() {
        if let Some(chunk) = part.text {
            text.push_str(&chunk);
        }
        if let Some(call) = part.function_call {
            let arguments = match call.args {
                Value::Null => "{}".to_string(),
                args => args.to_string(),
            };
            tool_calls.push(ToolCall {
                id: String::new(),
                name: call.name,
                arguments,
            });
        }
    }

    let text = (!text.trim().is_empty()).then_some(text);
    if text.is_none() && tool_calls.is_empty() {
        warn!(finish_reason = ?candidate.finish_reason, "Gemini returned an empty candidate");
    }

    Ok(ChatResponse {
        text,
        tool_calls,
        model: model.to_string(),
    })
}
