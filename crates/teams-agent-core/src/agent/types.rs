//! Agent message, interrupt and stream types

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::arcade::AuthorizationResponse;

/// A tool invocation requested by the model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolCall {
    pub id: String,
    pub name: String,
    pub args: Value,
}

/// One entry of the conversation history
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AgentMessage {
    Human {
        content: String,
    },
    Ai {
        content: String,
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        tool_calls: Vec<ToolCall>,
    },
    Tool {
        call_id: String,
        name: String,
        content: String,
    },
}

impl AgentMessage {
    pub fn human(content: impl Into<String>) -> Self {
        Self::Human { content: content.into() }
    }

    pub fn ai(content: impl Into<String>, tool_calls: Vec<ToolCall>) -> Self {
        Self::Ai {
            content: content.into(),
            tool_calls,
        }
    }

    pub fn tool(call_id: impl Into<String>, name: impl Into<String>, content: impl Into<String>) -> Self {
        Self::Tool {
            call_id: call_id.into(),
            name: name.into(),
            content: content.into(),
        }
    }

    pub fn content(&self) -> &str {
        match self {
            Self::Human { content } | Self::Ai { content, .. } | Self::Tool { content, .. } => content,
        }
    }

    /// Tool calls carried by an AI message (empty for other kinds)
    pub fn tool_calls(&self) -> &[ToolCall] {
        match self {
            Self::Ai { tool_calls, .. } => tool_calls,
            _ => &[],
        }
    }
}

/// The user's answer to one interrupt
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Decision {
    pub authorized: bool,
}

impl Decision {
    pub fn approve() -> Self {
        Self { authorized: true }
    }

    pub fn deny() -> Self {
        Self { authorized: false }
    }
}

/// Payload of a resume command
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ResumeValue {
    Single(Decision),
    Many(Vec<Decision>),
}

impl ResumeValue {
    /// Decisions in interrupt order
    pub fn into_decisions(self) -> Vec<Decision> {
        match self {
            Self::Single(decision) => vec![decision],
            Self::Many(decisions) => decisions,
        }
    }
}

/// Continues a run suspended by interrupts
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Command {
    pub resume: ResumeValue,
}

impl Command {
    /// Wrap decisions in interrupt order: a lone decision is passed as is,
    /// several as an ordered list
    pub fn from_decisions(mut decisions: Vec<Decision>) -> Self {
        let resume = if decisions.len() == 1 {
            ResumeValue::Single(decisions.remove(0))
        } else {
            ResumeValue::Many(decisions)
        };
        Self { resume }
    }
}

/// Input to one agent run
#[derive(Debug, Clone, PartialEq)]
pub enum AgentInput {
    /// New messages appended to the thread
    Messages(Vec<AgentMessage>),
    /// Decisions for the pending interrupts
    Resume(Command),
}

impl AgentInput {
    /// A single user message
    pub fn user(content: impl Into<String>) -> Self {
        Self::Messages(vec![AgentMessage::human(content)])
    }
}

impl From<Command> for AgentInput {
    fn from(command: Command) -> Self {
        Self::Resume(command)
    }
}

/// Per-run configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunnableConfig {
    /// Key of the conversation in the checkpointer
    pub thread_id: String,
}

impl RunnableConfig {
    pub fn new(thread_id: impl Into<String>) -> Self {
        Self {
            thread_id: thread_id.into(),
        }
    }
}

/// A point where the run needs external input before it can continue
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Interrupt {
    pub id: String,
    pub value: InterruptValue,
}

impl Interrupt {
    pub fn new(value: InterruptValue) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            value,
        }
    }
}

/// What an interrupt is waiting for
///
/// On the wire this is a loose object distinguished by the
/// `authorization_required` and `hitl_required` flags; the authorization flag
/// wins when both are set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "Value", into = "Value")]
pub enum InterruptValue {
    /// The user must grant the tool's OAuth provider in a browser
    Authorization {
        tool_name: String,
        authorization_response: AuthorizationResponse,
    },
    /// The user must approve the proposed call
    Approval { tool_name: String, input: Value },
    /// Anything else
    Unknown(Value),
}

impl InterruptValue {
    pub fn from_payload(payload: Value) -> Self {
        let flag = |key: &str| payload.get(key).and_then(Value::as_bool).unwrap_or(false);
        let tool_name = payload
            .get("tool_name")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();

        if flag("authorization_required") {
            let response = payload
                .get("authorization_response")
                .cloned()
                .map(serde_json::from_value::<AuthorizationResponse>);
            if let Some(Ok(authorization_response)) = response {
                return Self::Authorization {
                    tool_name,
                    authorization_response,
                };
            }
        } else if flag("hitl_required") {
            return Self::Approval {
                tool_name,
                input: payload.get("input").cloned().unwrap_or(Value::Null),
            };
        }
        Self::Unknown(payload)
    }

    pub fn to_payload(&self) -> Value {
        match self {
            Self::Authorization {
                tool_name,
                authorization_response,
            } => json!({
                "authorization_required": true,
                "tool_name": tool_name,
                "authorization_response": authorization_response,
            }),
            Self::Approval { tool_name, input } => json!({
                "hitl_required": true,
                "tool_name": tool_name,
                "input": input,
            }),
            Self::Unknown(payload) => payload.clone(),
        }
    }

    pub fn tool_name(&self) -> Option<&str> {
        match self {
            Self::Authorization { tool_name, .. } | Self::Approval { tool_name, .. } => Some(tool_name),
            Self::Unknown(_) => None,
        }
    }
}

impl From<Value> for InterruptValue {
    fn from(payload: Value) -> Self {
        Self::from_payload(payload)
    }
}

impl From<InterruptValue> for Value {
    fn from(value: InterruptValue) -> Self {
        value.to_payload()
    }
}

/// Name of the node that calls the model
pub const MODEL_NODE: &str = "model";
/// Name of the node that runs tools
pub const TOOLS_NODE: &str = "tools";

/// State change produced by one node
#[derive(Debug, Clone, PartialEq)]
pub struct NodeUpdate {
    pub node: String,
    pub messages: Vec<AgentMessage>,
}

impl NodeUpdate {
    pub fn new(node: impl Into<String>, messages: Vec<AgentMessage>) -> Self {
        Self {
            node: node.into(),
            messages,
        }
    }
}

/// One unit of an update-granularity stream
///
/// A chunk carries either node updates or interrupts, never both.
#[derive(Debug, Clone, PartialEq)]
pub enum StreamChunk {
    Updates(Vec<NodeUpdate>),
    Interrupts(Vec<Interrupt>),
}
