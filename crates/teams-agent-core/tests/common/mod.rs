//! Shared fakes for integration tests

#![allow(dead_code)]

use std::collections::{HashMap, VecDeque};
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;
use serde_json::{json, Value};

use teams_agent_core::agent::{create_agent, Agent, AgentOptions, MemorySaver, ToolCall};
use teams_agent_core::approval::ToolApprovalConfig;
use teams_agent_core::arcade::{
    AuthWaiter, AuthorizationResponse, AuthorizationStatus, ExecuteToolResponse, ToolCallOutput, ToolExecutor,
};
use teams_agent_core::provider::{ChatModel, CompletionRequest, CompletionResult};
use teams_agent_core::session::{LineStyle, Terminal};
use teams_agent_core::tools::RemoteTool;
use teams_agent_core::{Error, Result};

pub const USER_ID: &str = "tester@example.com";

/// A Teams tool as the agent sees it
pub fn teams_tool(name: &str, requires_authorization: bool) -> RemoteTool {
    RemoteTool {
        name: format!("MicrosoftTeams_{}", name),
        qualified_name: format!("MicrosoftTeams.{}", name),
        description: format!("{} in Microsoft Teams", name),
        parameters: json!({ "type": "object", "properties": {} }),
        requires_authorization,
    }
}

pub fn tool_call(id: &str, name: &str, args: Value) -> ToolCall {
    ToolCall {
        id: id.to_string(),
        name: name.to_string(),
        args,
    }
}

pub fn reply(text: &str) -> CompletionResult {
    CompletionResult {
        content: Some(text.to_string()),
        tool_calls: Vec::new(),
    }
}

pub fn calls(tool_calls: Vec<ToolCall>) -> CompletionResult {
    CompletionResult {
        content: None,
        tool_calls,
    }
}

/// Model answering from a fixed script, one entry per completion
#[derive(Default)]
pub struct ScriptedModel {
    script: Mutex<VecDeque<CompletionResult>>,
    /// Number of history messages seen by each completion
    pub seen: Mutex<Vec<usize>>,
}

impl ScriptedModel {
    pub fn new(script: Vec<CompletionResult>) -> Arc<Self> {
        Arc::new(Self {
            script: Mutex::new(script.into()),
            seen: Mutex::new(Vec::new()),
        })
    }

    pub fn calls_made(&self) -> usize {
        self.seen.lock().len()
    }
}

#[async_trait]
impl ChatModel for ScriptedModel {
    fn name(&self) -> &str {
        "scripted"
    }

    async fn complete(&self, request: CompletionRequest<'_>) -> Result<CompletionResult> {
        self.seen.lock().push(request.messages.len());
        self.script
            .lock()
            .pop_front()
            .ok_or_else(|| Error::Provider("script exhausted".to_string()))
    }
}

/// Executor with scripted authorization answers that records executions
#[derive(Default)]
pub struct FakeExecutor {
    /// Authorization answers per qualified tool name; completed once exhausted
    auth: Mutex<HashMap<String, VecDeque<AuthorizationResponse>>>,
    failing: Mutex<Vec<String>>,
    pub authorized: Mutex<Vec<String>>,
    pub executed: Mutex<Vec<(String, Value)>>,
}

impl FakeExecutor {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn pending_auth(&self, qualified_name: &str, id: &str) {
        self.auth
            .lock()
            .entry(qualified_name.to_string())
            .or_default()
            .push_back(pending_authorization(id));
    }

    pub fn fail_execution(&self, qualified_name: &str) {
        self.failing.lock().push(qualified_name.to_string());
    }

    pub fn executed_tools(&self) -> Vec<String> {
        self.executed.lock().iter().map(|(name, _)| name.clone()).collect()
    }
}

pub fn pending_authorization(id: &str) -> AuthorizationResponse {
    AuthorizationResponse {
        id: Some(id.to_string()),
        status: AuthorizationStatus::Pending,
        url: Some(format!("https://auth.example.com/{}", id)),
        ..Default::default()
    }
}

pub fn completed_authorization(id: &str) -> AuthorizationResponse {
    AuthorizationResponse {
        id: Some(id.to_string()),
        status: AuthorizationStatus::Completed,
        ..Default::default()
    }
}

#[async_trait]
impl ToolExecutor for FakeExecutor {
    async fn authorize(&self, tool_name: &str, _user_id: &str) -> Result<AuthorizationResponse> {
        self.authorized.lock().push(tool_name.to_string());
        let next = self.auth.lock().get_mut(tool_name).and_then(|q| q.pop_front());
        Ok(next.unwrap_or_else(|| completed_authorization("done")))
    }

    async fn execute(&self, tool_name: &str, input: Value, _user_id: &str) -> Result<ExecuteToolResponse> {
        if self.failing.lock().iter().any(|name| name == tool_name) {
            return Err(Error::Arcade {
                status: 500,
                message: "upstream unavailable".to_string(),
            });
        }
        self.executed.lock().push((tool_name.to_string(), input));
        Ok(ExecuteToolResponse {
            success: true,
            output: Some(ToolCallOutput {
                value: Some(json!(format!("ok: {}", tool_name))),
                error: None,
            }),
            ..Default::default()
        })
    }
}

/// Authorization waiter with a fixed outcome
pub struct FakeWaiter {
    succeed: bool,
    pub waited: Mutex<Vec<String>>,
}

impl FakeWaiter {
    pub fn succeeding() -> Self {
        Self {
            succeed: true,
            waited: Mutex::new(Vec::new()),
        }
    }

    pub fn failing() -> Self {
        Self {
            succeed: false,
            waited: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl AuthWaiter for FakeWaiter {
    async fn wait_for_completion(&self, authorization_id: &str) -> Result<AuthorizationResponse> {
        self.waited.lock().push(authorization_id.to_string());
        if self.succeed {
            Ok(completed_authorization(authorization_id))
        } else {
            Err(Error::Authorization(format!("authorization {} failed", authorization_id)))
        }
    }
}

/// Terminal event, in the order it happened
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TerminalEvent {
    Read(String),
    Write(LineStyle, String),
    Pause,
    Resume,
}

/// Terminal fed from a script of input lines
#[derive(Debug, Default)]
pub struct ScriptedTerminal {
    inputs: VecDeque<String>,
    pub events: Vec<TerminalEvent>,
    paused: bool,
}

impl ScriptedTerminal {
    pub fn new(inputs: &[&str]) -> Self {
        Self {
            inputs: inputs.iter().map(|s| s.to_string()).collect(),
            ..Default::default()
        }
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn prompts(&self) -> Vec<&str> {
        self.events
            .iter()
            .filter_map(|e| match e {
                TerminalEvent::Read(prompt) => Some(prompt.as_str()),
                _ => None,
            })
            .collect()
    }

    pub fn lines(&self, style: LineStyle) -> Vec<&str> {
        self.events
            .iter()
            .filter_map(|e| match e {
                TerminalEvent::Write(s, text) if *s == style => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }
}

impl Terminal for ScriptedTerminal {
    fn read_line(&mut self, prompt: &str) -> Result<Option<String>> {
        self.events.push(TerminalEvent::Read(prompt.to_string()));
        Ok(self.inputs.pop_front())
    }

    fn write_line(&mut self, style: LineStyle, text: &str) {
        self.events.push(TerminalEvent::Write(style, text.to_string()));
    }

    fn pause(&mut self) {
        self.paused = true;
        self.events.push(TerminalEvent::Pause);
    }

    fn resume(&mut self) {
        self.paused = false;
        self.events.push(TerminalEvent::Resume);
    }
}

/// Build an agent over fakes with the default Teams approval policy
pub fn build_agent(model: Arc<ScriptedModel>, executor: Arc<FakeExecutor>, tools: Vec<RemoteTool>) -> Agent {
    build_agent_with(model, executor, tools, ToolApprovalConfig::default(), 25)
}

pub fn build_agent_with(
    model: Arc<ScriptedModel>,
    executor: Arc<FakeExecutor>,
    tools: Vec<RemoteTool>,
    approval: ToolApprovalConfig,
    recursion_limit: usize,
) -> Agent {
    create_agent(AgentOptions {
        system_prompt: "You are a Microsoft Teams assistant.".to_string(),
        model,
        tools,
        executor,
        approval,
        checkpointer: Arc::new(MemorySaver::new()),
        user_id: USER_ID.to_string(),
        recursion_limit,
    })
}
