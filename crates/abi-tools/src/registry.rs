//! Registry - Tool registration and discovery
//!
//! Tools are registered with a [`ToolSpec`] that names the roles allowed to
//! see them. The registry is the only access-control surface of the agent:
//! what a role cannot see, it cannot invoke.

use crate::error::{Error, Result};
use abi_data::normalize_id;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;

/// Role of the signed-in user
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Business operator with access to company-wide analytics
    Business,
    /// Retail customer limited to their own orders
    Customer,
}

impl Role {
    /// All roles
    pub const ALL: [Role; 2] = [Self::Business, Self::Customer];

    /// Returns the string representation
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Business => "business",
            Self::Customer => "customer",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "business" => Ok(Self::Business),
            "customer" => Ok(Self::Customer),
            _ => Err(format!("unknown role: {s}")),
        }
    }
}

/// JSON type of a tool parameter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParamType {
    /// JSON string
    String,
    /// Whole number
    Integer,
    /// Any number
    Number,
    /// true / false
    Boolean,
    /// JSON object
    Object,
    /// JSON array
    Array,
}

impl ParamType {
    /// JSON Schema type name
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Integer => "integer",
            Self::Number => "number",
            Self::Boolean => "boolean",
            Self::Object => "object",
            Self::Array => "array",
        }
    }

    /// Whether `value` has this type
    ///
    /// Integral floats such as `5.0` count as integers.
    #[must_use]
    pub fn matches(&self, value: &Value) -> bool {
        match self {
            Self::String => value.is_string(),
            Self::Integer => {
                value.is_i64()
                    || value.is_u64()
                    || value.as_f64().is_some_and(|f| f.fract() == 0.0)
            }
            Self::Number => value.is_number(),
            Self::Boolean => value.is_boolean(),
            Self::Object => value.is_object(),
            Self::Array => value.is_array(),
        }
    }

    /// Canonical form of a value that [`matches`](Self::matches) this type
    ///
    /// Integral floats become JSON integers so handlers can read them as `i64`.
    #[must_use]
    pub fn normalize(&self, value: &Value) -> Value {
        match (self, value.as_f64()) {
            (Self::Integer, Some(f))
                if value.is_f64() && f.fract() == 0.0 && f.abs() < 9.0e15 =>
            {
                Value::from(f as i64)
            }
            _ => value.clone(),
        }
    }
}

/// One named parameter of a tool
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParameterSpec {
    /// Parameter name
    pub name: String,
    /// Expected JSON type
    pub param_type: ParamType,
    /// Whether the parameter must be present and non-null
    pub required: bool,
    /// Description shown to the model
    pub description: String,
    /// Allowed string values (empty = unrestricted)
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub allowed_values: Vec<String>,
}

impl ParameterSpec {
    /// A required parameter
    #[must_use]
    pub fn required(name: impl Into<String>, param_type: ParamType, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            param_type,
            required: true,
            description: description.into(),
            allowed_values: Vec::new(),
        }
    }

    /// An optional parameter
    #[must_use]
    pub fn optional(name: impl Into<String>, param_type: ParamType, description: impl Into<String>) -> Self {
        Self {
            required: false,
            ..Self::required(name, param_type, description)
        }
    }

    /// Restrict a string parameter to a fixed set of values
    #[must_use]
    pub fn with_allowed_values<I, S>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.allowed_values = values.into_iter().map(Into::into).collect();
        self
    }

    fn json_schema(&self) -> Value {
        let mut schema = serde_json::json!({
            "type": self.param_type.as_str(),
            "description": self.description,
        });
        if !self.allowed_values.is_empty() {
            schema["enum"] = serde_json::json!(self.allowed_values);
        }
        schema
    }
}

/// Tool metadata: name, parameters and the roles that may use it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolSpec {
    /// Unique tool name
    pub name: String,
    /// Human-readable description
    pub description: String,
    /// Parameters in declaration order
    pub parameters: Vec<ParameterSpec>,
    /// Roles allowed to see and invoke the tool
    pub allowed_roles: Vec<Role>,
    /// Parameter that must match the caller's subject (e.g. `customer_id`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subject_param: Option<String>,
}

impl ToolSpec {
    /// Create a new tool spec with no parameters and no roles
    #[must_use]
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            parameters: Vec::new(),
            allowed_roles: Vec::new(),
            subject_param: None,
        }
    }

    /// Add a parameter
    #[must_use]
    pub fn with_parameter(mut self, parameter: ParameterSpec) -> Self {
        self.parameters.push(parameter);
        self
    }

    /// Allow a role
    #[must_use]
    pub fn allow(mut self, role: Role) -> Self {
        if !self.allowed_roles.contains(&role) {
            self.allowed_roles.push(role);
        }
        self
    }

    /// Bind a parameter to the caller's subject
    #[must_use]
    pub fn with_subject(mut self, param: impl Into<String>) -> Self {
        self.subject_param = Some(param.into());
        self
    }

    /// Whether `role` may see this tool
    #[must_use]
    pub fn is_visible_to(&self, role: Role) -> bool {
        self.allowed_roles.contains(&role)
    }

    /// Look up a parameter by name
    #[must_use]
    pub fn parameter(&self, name: &str) -> Option<&ParameterSpec> {
        self.parameters.iter().find(|p| p.name == name)
    }

    /// JSON Schema object describing the parameters
    #[must_use]
    pub fn json_schema(&self) -> Value {
        let properties: Map<String, Value> = self
            .parameters
            .iter()
            .map(|p| (p.name.clone(), p.json_schema()))
            .collect();
        let required: Vec<&str> = self
            .parameters
            .iter()
            .filter(|p| p.required)
            .map(|p| p.name.as_str())
            .collect();
        serde_json::json!({
            "type": "object",
            "properties": properties,
            "required": required,
        })
    }

    /// Convert to the provider tool format
    #[must_use]
    pub fn to_llm_tool(&self) -> abi_llm::ToolDefinition {
        abi_llm::ToolDefinition::new(&self.name, &self.description, self.json_schema())
    }
}

/// Who is invoking a tool
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Caller {
    /// Active role
    pub role: Role,
    /// Principal the caller is limited to (customer id for customers)
    pub subject: Option<String>,
}

impl Caller {
    /// A caller with no subject restriction
    #[must_use]
    pub fn new(role: Role) -> Self {
        Self {
            role,
            subject: None,
        }
    }

    /// A business operator
    #[must_use]
    pub fn business() -> Self {
        Self::new(Role::Business)
    }

    /// A customer restricted to their own id
    #[must_use]
    pub fn customer(customer_id: impl Into<String>) -> Self {
        Self {
            role: Role::Customer,
            subject: Some(customer_id.into()),
        }
    }
}

/// A tool call requested by the model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolCallRequest {
    /// Call id
    pub id: String,
    /// Tool name
    pub name: String,
    /// Arguments by parameter name
    pub arguments: Map<String, Value>,
}

impl ToolCallRequest {
    /// Create a request
    #[must_use]
    pub fn new(id: impl Into<String>, name: impl Into<String>, arguments: Map<String, Value>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            arguments,
        }
    }
}

/// Outcome of one tool call; exactly one per request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolCallResult {
    /// Id of the request this answers
    pub call_id: String,
    /// Tool name
    pub tool_name: String,
    /// Whether execution succeeded
    pub success: bool,
    /// Output data
    pub output: Value,
    /// Error message if failed
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ToolCallResult {
    /// Create a successful result
    #[must_use]
    pub fn success(call_id: impl Into<String>, tool_name: impl Into<String>, output: Value) -> Self {
        Self {
            call_id: call_id.into(),
            tool_name: tool_name.into(),
            success: true,
            output,
            error: None,
        }
    }

    /// Create a failed result
    #[must_use]
    pub fn failure(call_id: impl Into<String>, tool_name: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            call_id: call_id.into(),
            tool_name: tool_name.into(),
            success: false,
            output: Value::Null,
            error: Some(error.into()),
        }
    }

    /// Failed result for a request rejected before execution
    #[must_use]
    pub fn rejected(request: &ToolCallRequest, error: &Error) -> Self {
        Self::failure(&request.id, &request.name, error.to_string())
    }

    /// Payload handed back to the model
    #[must_use]
    pub fn to_model_content(&self) -> String {
        let payload = if self.success {
            self.output.clone()
        } else {
            serde_json::json!({ "error": self.error.as_deref().unwrap_or("unknown error") })
        };
        payload.to_string()
    }
}

/// Trait for tool implementations
#[async_trait::async_trait]
pub trait Tool: Send + Sync {
    /// Get the tool spec
    fn spec(&self) -> &ToolSpec;

    /// Execute the tool with validated arguments
    async fn execute(&self, arguments: Map<String, Value>) -> Result<Value>;
}

/// Registry for managing tools
#[derive(Default)]
pub struct ToolRegistry {
    tools: Vec<Arc<dyn Tool>>,
    index: HashMap<String, usize>,
}

impl ToolRegistry {
    /// Create a new empty registry
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a tool
    ///
    /// # Errors
    ///
    /// Returns [`Error::DuplicateTool`] if the name is taken.
    pub fn register(&mut self, tool: Arc<dyn Tool>) -> Result<()> {
        let name = tool.spec().name.clone();
        if self.index.contains_key(&name) {
            return Err(Error::DuplicateTool(name));
        }
        debug!(tool = %name, roles = ?tool.spec().allowed_roles, "Registering tool");
        self.index.insert(name, self.tools.len());
        self.tools.push(tool);
        Ok(())
    }

    /// Get a tool by name
    #[must_use]
    pub fn get(&self, name: &str) -> Option<Arc<dyn Tool>> {
        self.index.get(name).map(|&i| Arc::clone(&self.tools[i]))
    }

    /// Get a tool spec by name
    #[must_use]
    pub fn spec(&self, name: &str) -> Option<&ToolSpec> {
        self.index.get(name).map(|&i| self.tools[i].spec())
    }

    /// Check if a tool exists
    #[must_use]
    pub fn has(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// All specs in registration order
    #[must_use]
    pub fn specs(&self) -> Vec<&ToolSpec> {
        self.tools.iter().map(|t| t.spec()).collect()
    }

    /// Specs visible to `role`, in registration order
    #[must_use]
    pub fn visible_tools(&self, role: Role) -> Vec<&ToolSpec> {
        self.tools
            .iter()
            .map(|t| t.spec())
            .filter(|s| s.is_visible_to(role))
            .collect()
    }

    /// Get tool count
    #[must_use]
    pub fn len(&self) -> usize {
        self.tools.len()
    }

    /// Check if registry is empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    /// Resolve a tool the caller is allowed to use
    ///
    /// # Errors
    ///
    /// [`Error::UnknownTool`] for unregistered names, [`Error::ForbiddenTool`]
    /// when the caller's role is not allowed.
    pub fn authorize(&self, name: &str, caller: &Caller) -> Result<Arc<dyn Tool>> {
        let tool = self
            .get(name)
            .ok_or_else(|| Error::UnknownTool(name.to_string()))?;
        if !tool.spec().is_visible_to(caller.role) {
            return Err(Error::ForbiddenTool {
                tool: name.to_string(),
                role: caller.role.to_string(),
                reason: "not visible to this role".to_string(),
            });
        }
        Ok(tool)
    }
}

/// Check `arguments` against `spec` and the caller's subject
///
/// Returns the arguments with unknown keys and null optionals removed. When
/// `spec` binds a subject parameter that the model omitted, the caller's
/// subject is filled in.
///
/// # Errors
///
/// [`Error::InvalidArguments`] for missing or mistyped parameters,
/// [`Error::ForbiddenTool`] when the subject parameter names someone else.
pub fn validate_arguments(
    spec: &ToolSpec,
    arguments: &Map<String, Value>,
    caller: &Caller,
) -> Result<Map<String, Value>> {
    let invalid = |reason: String| Error::InvalidArguments {
        tool: spec.name.clone(),
        reason,
    };

    let mut validated = Map::new();
    for param in &spec.parameters {
        match arguments.get(&param.name) {
            None | Some(Value::Null) => {
                if param.required {
                    return Err(invalid(format!("missing required parameter '{}'", param.name)));
                }
            }
            Some(value) => {
                if !param.param_type.matches(value) {
                    return Err(invalid(format!(
                        "parameter '{}' must be of type {}",
                        param.name,
                        param.param_type.as_str()
                    )));
                }
                if !param.allowed_values.is_empty() {
                    let accepted = value.as_str().is_some_and(|s| {
                        param
                            .allowed_values
                            .iter()
                            .any(|allowed| allowed.eq_ignore_ascii_case(s.trim()))
                    });
                    if !accepted {
                        return Err(invalid(format!(
                            "parameter '{}' must be one of: {}",
                            param.name,
                            param.allowed_values.join(", ")
                        )));
                    }
                }
                validated.insert(param.name.clone(), param.param_type.normalize(value));
            }
        }
    }

    for key in arguments.keys().filter(|k| spec.parameter(k).is_none()) {
        debug!(tool = %spec.name, parameter = %key, "Dropping unknown argument");
    }

    if let (Some(param), Some(subject)) = (&spec.subject_param, &caller.subject) {
        match validated.get(param).and_then(Value::as_str) {
            Some(value) if normalize_id(value) != normalize_id(subject) => {
                return Err(Error::ForbiddenTool {
                    tool: spec.name.clone(),
                    role: caller.role.to_string(),
                    reason: format!("{param} does not match the signed-in user"),
                });
            }
            Some(_) => {}
            None => {
                validated.insert(param.clone(), Value::String(subject.clone()));
            }
        }
    }

    Ok(validated)
}
