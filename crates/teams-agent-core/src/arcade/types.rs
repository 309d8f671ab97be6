//! Arcade API wire types

use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

/// Page of tool definitions returned by `GET /v1/tools`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ToolList {
    #[serde(default)]
    pub items: Vec<ToolDefinition>,
    #[serde(default)]
    pub total_count: Option<u64>,
}

/// Tool definition as published by Arcade
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolDefinition {
    pub name: String,
    #[serde(default)]
    pub fully_qualified_name: String,
    #[serde(default)]
    pub qualified_name: String,
    #[serde(default)]
    pub description: String,
    pub toolkit: ToolkitInfo,
    #[serde(default)]
    pub input: ToolInput,
    #[serde(default)]
    pub requirements: Option<ToolRequirements>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolkitInfo {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub version: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ToolInput {
    #[serde(default)]
    pub parameters: Vec<ToolParameter>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolParameter {
    pub name: String,
    #[serde(default)]
    pub required: bool,
    #[serde(default)]
    pub description: Option<String>,
    pub value_schema: ValueSchema,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValueSchema {
    pub val_type: String,
    #[serde(default)]
    pub inner_val_type: Option<String>,
    #[serde(default, rename = "enum")]
    pub enum_values: Option<Vec<String>>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ToolRequirements {
    #[serde(default)]
    pub authorization: Option<Value>,
    #[serde(default)]
    pub secrets: Option<Value>,
}

impl ToolDefinition {
    /// `Toolkit.Tool`, derived when the API omits it
    pub fn qualified_name(&self) -> String {
        if self.qualified_name.is_empty() {
            format!("{}.{}", self.toolkit.name, self.name)
        } else {
            self.qualified_name.clone()
        }
    }

    /// Whether calling this tool needs an OAuth grant from the user
    pub fn requires_authorization(&self) -> bool {
        self.requirements
            .as_ref()
            .and_then(|r| r.authorization.as_ref())
            .is_some_and(|a| !a.is_null())
    }

    /// JSON schema of the tool input, in the shape LLM function calling expects
    pub fn input_schema(&self) -> Value {
        let mut properties = Map::new();
        let mut required = Vec::new();

        for param in &self.input.parameters {
            let mut schema = value_type_schema(&param.value_schema.val_type, param.value_schema.inner_val_type.as_deref());
            if let Some(values) = &param.value_schema.enum_values {
                schema["enum"] = json!(values);
            }
            if let Some(description) = &param.description {
                schema["description"] = json!(description);
            }
            properties.insert(param.name.clone(), schema);
            if param.required {
                required.push(param.name.clone());
            }
        }

        json!({
            "type": "object",
            "properties": properties,
            "required": required,
        })
    }
}

fn value_type_schema(val_type: &str, inner: Option<&str>) -> Value {
    match val_type {
        "array" => json!({
            "type": "array",
            "items": value_type_schema(inner.unwrap_or("string"), None),
        }),
        "json" => json!({ "type": "object" }),
        "integer" | "number" | "boolean" | "string" => json!({ "type": val_type }),
        _ => json!({ "type": "string" }),
    }
}

/// Authorization lifecycle status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuthorizationStatus {
    NotStarted,
    #[default]
    Pending,
    Completed,
    Failed,
    #[serde(other)]
    Unknown,
}

/// Response of `POST /v1/tools/authorize` and `GET /v1/auth/status`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AuthorizationResponse {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub status: AuthorizationStatus,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub scopes: Vec<String>,
    #[serde(default)]
    pub user_id: Option<String>,
    #[serde(default)]
    pub provider_id: Option<String>,
}

impl AuthorizationResponse {
    pub fn is_completed(&self) -> bool {
        self.status == AuthorizationStatus::Completed
    }
}

#[derive(Debug, Clone, Serialize)]
pub(crate) struct AuthorizeToolRequest<'a> {
    pub tool_name: &'a str,
    pub user_id: &'a str,
}

#[derive(Debug, Clone, Serialize)]
pub(crate) struct ExecuteToolRequest<'a> {
    pub tool_name: &'a str,
    pub input: &'a Value,
    pub user_id: &'a str,
}

/// Response of `POST /v1/tools/execute`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExecuteToolResponse {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub execution_id: Option<String>,
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub output: Option<ToolCallOutput>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ToolCallOutput {
    #[serde(default)]
    pub value: Option<Value>,
    #[serde(default)]
    pub error: Option<ToolCallError>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ToolCallError {
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub developer_message: Option<String>,
}

impl ExecuteToolResponse {
    /// Render the execution outcome as the text handed back to the model
    pub fn to_tool_content(&self) -> String {
        let output = self.output.as_ref();
        if let Some(error) = output.and_then(|o| o.error.as_ref()) {
            return format!("Error: {}", error.message);
        }
        if !self.success {
            return "Error: tool execution failed".to_string();
        }
        match output.and_then(|o| o.value.as_ref()) {
            Some(Value::String(s)) => s.clone(),
            Some(Value::Null) | None => String::new(),
            Some(other) => other.to_string(),
        }
    }
}
