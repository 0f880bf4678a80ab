//! Conversation messages as sent to a model

/// Author of a message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MessageRole {
    /// Instructions that frame the conversation
    System,
    /// The person asking
    User,
    /// The model
    Assistant,
    /// Output of a tool the model called
    Tool,
}

/// A function call emitted by the model
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolCall {
    /// Call id; empty when the provider assigns none
    pub id: String,
    /// Tool name
    pub name: String,
    /// Arguments as a JSON document
    pub arguments: String,
}

/// One message of the conversation
#[derive(Debug, Clone, PartialEq)]
pub struct Message {
    /// Author
    pub role: MessageRole,
    /// Text body; tool output for [`MessageRole::Tool`]
    pub content: String,
    /// Calls requested by an assistant message
    pub tool_calls: Vec<ToolCall>,
    /// Call answered by a tool message
    pub tool_call_id: Option<String>,
    /// Tool that produced a tool message
    pub name: Option<String>,
}

impl Message {
    fn plain(role: MessageRole, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
            tool_calls: Vec::new(),
            tool_call_id: None,
            name: None,
        }
    }

    /// System instructions
    #[must_use]
    pub fn system(content: impl Into<String>) -> Self {
        Self::plain(MessageRole::System, content)
    }

    /// User text
    #[must_use]
    pub fn user(content: impl Into<String>) -> Self {
        Self::plain(MessageRole::User, content)
    }

    /// Model text
    #[must_use]
    pub fn assistant(content: impl Into<String>) -> Self {
        Self::plain(MessageRole::Assistant, content)
    }

    /// Model turn that only requests tool calls
    #[must_use]
    pub fn requesting(tool_calls: Vec<ToolCall>) -> Self {
        Self {
            tool_calls,
            ..Self::plain(MessageRole::Assistant, "")
        }
    }

    /// Output of one tool call
    #[must_use]
    pub fn tool_output(
        call_id: impl Into<String>,
        tool: impl Into<String>,
        content: impl Into<String>,
    ) -> Self {
        Self {
            tool_call_id: Some(call_id.into()),
            name: Some(tool.into()),
            ..Self::plain(MessageRole::Tool, content)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_requesting_has_no_text() {
        let msg = Message::requesting(vec![ToolCall {
            id: "call_1_0".to_string(),
            name: "get_data_schema".to_string(),
            arguments: "{}".to_string(),
        }]);
        assert_eq!(msg.role, MessageRole::Assistant);
        assert!(msg.content.is_empty());
        assert_eq!(msg.tool_calls[0].name, "get_data_schema");
    }

    #[test]
    fn test_tool_output() {
        let msg = Message::tool_output("call_1_0", "get_order_status", r#"{"found": true}"#);
        assert_eq!(msg.role, MessageRole::Tool);
        assert_eq!(msg.tool_call_id.as_deref(), Some("call_1_0"));
        assert_eq!(msg.name.as_deref(), Some("get_order_status"));
        assert!(msg.tool_calls.is_empty());
    }
}
