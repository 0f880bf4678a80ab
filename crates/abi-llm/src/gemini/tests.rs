use super::config::{GeminiConfig, DEFAULT_MODEL};
use super::failure::{from_status, redact};
use super::wire::{decode, encode, scrub_schema, GenerateResponse};
use super::GeminiProvider;
use crate::chat::{ChatRequest, ToolDefinition};
use crate::error::Error;
use crate::message::{Message, ToolCall};
use serde_json::{json, Value};
use std::time::Duration;

fn call(id: &str, name: &str) -> ToolCall {
    ToolCall {
        id: id.to_string(),
        name: name.to_string(),
        arguments: "{}".to_string(),
    }
}

fn body(request: &ChatRequest) -> Value {
    serde_json::to_value(encode(request, 8192)).unwrap()
}

// ============================================================================
// Configuration
// ============================================================================

#[test]
fn test_config_builder() {
    let config = GeminiConfig::new("test-key")
        .with_model("gemini-2.5-pro")
        .with_max_tokens(4096)
        .with_timeout(Duration::from_secs(30));

    assert_eq!(config.default_model, "gemini-2.5-pro");
    assert_eq!(config.default_max_tokens, 4096);
    assert_eq!(config.timeout, Duration::from_secs(30));
    assert!(config
        .endpoint("gemini-2.5-pro")
        .ends_with("/models/gemini-2.5-pro:generateContent?key=test-key"));
}

#[test]
fn test_config_debug_masks_key() {
    let config = GeminiConfig::new("AIza1234567890abcdefghij");
    let debug_str = format!("{config:?}");

    assert!(!debug_str.contains("1234567890"));
    assert!(debug_str.contains("AIza...ghij"));
    assert!(format!("{:?}", GeminiConfig::new("short")).contains("****"));
}

#[test]
fn test_empty_key_rejected() {
    let err = GeminiProvider::new(GeminiConfig::new("  ")).err();
    assert!(matches!(err, Some(Error::NotConfigured(_))));
}

// ============================================================================
// Request encoding
// ============================================================================

#[test]
fn test_system_prompt_becomes_instruction() {
    let request = ChatRequest::new(
        DEFAULT_MODEL,
        vec![
            Message::system("You are ABI"),
            Message::user("Hello"),
            Message::assistant("Hi there!"),
        ],
    )
    .with_temperature(0.2);

    let json = body(&request);
    assert_eq!(json["systemInstruction"]["parts"][0]["text"], "You are ABI");
    assert_eq!(json["contents"].as_array().unwrap().len(), 2);
    assert_eq!(json["contents"][1]["role"], "model");
    assert_eq!(json["generationConfig"]["maxOutputTokens"], 8192);
    assert!(json.get("tools").is_none());
}

#[test]
fn test_tool_outputs_share_one_user_turn() {
    let request = ChatRequest::new(
        DEFAULT_MODEL,
        vec![
            Message::user("Audit please"),
            Message::requesting(vec![
                call("call_1_0", "get_data_schema"),
                call("call_1_1", "check_critical_delays"),
            ]),
            Message::tool_output("call_1_0", "get_data_schema", r#"{"schema": "..."}"#),
            Message::tool_output("call_1_1", "check_critical_delays", "plain text"),
        ],
    );

    let json = body(&request);
    let contents = json["contents"].as_array().unwrap();
    assert_eq!(contents.len(), 3);
    assert_eq!(contents[1]["parts"][1]["functionCall"]["name"], "check_critical_delays");
    assert_eq!(contents[2]["role"], "user");
    assert_eq!(contents[2]["parts"][0]["functionResponse"]["response"]["schema"], "...");
    assert_eq!(contents[2]["parts"][1]["functionResponse"]["response"]["result"], "plain text");
}

#[test]
fn test_argumentless_tools_omit_parameters() {
    let request = ChatRequest::new(DEFAULT_MODEL, vec![Message::user("hi")]).with_tools(vec![
        ToolDefinition::new(
            "get_data_schema",
            "Describe the tables",
            json!({"type": "object", "properties": {}, "required": []}),
        ),
        ToolDefinition::new(
            "get_customer_orders",
            "List orders",
            json!({
                "type": "object",
                "properties": {"customer_id": {"type": "string"}},
                "required": ["customer_id"],
                "additionalProperties": false
            }),
        ),
    ]);

    let json = body(&request);
    let declarations = &json["tools"][0]["functionDeclarations"];
    assert!(declarations[0].get("parameters").is_none());
    assert!(declarations[1]["parameters"].get("additionalProperties").is_none());
    assert_eq!(declarations[1]["parameters"]["required"][0], "customer_id");
}

#[test]
fn test_scrub_schema_recurses() {
    let mut schema = json!({
        "type": "object",
        "$schema": "http://json-schema.org/draft-07/schema#",
        "properties": {"top_n": {"type": "integer", "default": 5}}
    });
    scrub_schema(&mut schema);
    assert!(schema.get("$schema").is_none());
    assert!(schema["properties"]["top_n"].get("default").is_none());
    assert_eq!(schema["properties"]["top_n"]["type"], "integer");
}

// ============================================================================
// Response decoding
// ============================================================================

#[test]
fn test_response_with_function_call() {
    let raw = r#"{
        "candidates": [{
            "content": {"role": "model", "parts": [
                {"text": "Let me look that up."},
                {"functionCall": {"name": "get_order_status", "args": {"customer_id": "CUST_001"}}},
                {"functionCall": {"name": "get_data_schema"}}
            ]},
            "finishReason": "STOP"
        }],
        "usageMetadata": {"totalTokenCount": 15}
    }"#;
    let response: GenerateResponse = serde_json::from_str(raw).unwrap();
    let reply = decode(response, DEFAULT_MODEL).unwrap();

    assert_eq!(reply.text.as_deref(), Some("Let me look that up."));
    assert_eq!(reply.model, DEFAULT_MODEL);
    assert_eq!(reply.tool_calls.len(), 2);
    assert!(reply.tool_calls[0].id.is_empty());
    let args: Value = serde_json::from_str(&reply.tool_calls[0].arguments).unwrap();
    assert_eq!(args["customer_id"], "CUST_001");
    assert_eq!(reply.tool_calls[1].arguments, "{}");
}

#[test]
fn test_response_without_candidates() {
    let response: GenerateResponse = serde_json::from_str(r#"{"candidates": []}"#).unwrap();
    assert!(matches!(
        decode(response, DEFAULT_MODEL),
        Err(Error::InvalidResponse(_))
    ));
}

#[test]
fn test_blocked_candidate_is_empty() {
    let response: GenerateResponse =
        serde_json::from_str(r#"{"candidates": [{"finishReason": "SAFETY"}]}"#).unwrap();
    let reply = decode(response, DEFAULT_MODEL).unwrap();
    assert!(reply.text.is_none());
    assert!(reply.tool_calls.is_empty());
}

// ============================================================================
// Failures
// ============================================================================

#[test]
fn test_status_mapping() {
    assert!(matches!(from_status(429, ""), Error::RateLimit));

    let err = from_status(
        503,
        r#"{"error": {"code": 503, "status": "UNAVAILABLE", "message": "model overloaded"}}"#,
    );
    match err {
        Error::Api { status, message } => {
            assert_eq!(status, 503);
            assert_eq!(message, "UNAVAILABLE: model overloaded");
        }
        other => panic!("unexpected error: {other:?}"),
    }

    let err = from_status(400, "<html>echo of the request</html>");
    assert!(!err.to_string().contains("echo"));
}

#[test]
fn test_redact() {
    let redacted = redact("PERMISSION_DENIED: invalid API key AIzaSecret");
    assert!(!redacted.contains("AIzaSecret"));
    assert!(redacted.contains("authentication"));

    assert!(redact("RESOURCE_EXHAUSTED: daily quota").contains("quota exhausted"));

    let long = "x".repeat(500);
    assert_eq!(redact(&long).len(), 303);
}
