//! ReAct agent runtime with interrupt/resume
//!
//! The agent alternates two nodes until the model stops asking for tools:
//!
//! ```text
//!   input ──▶ [model] ──tool calls──▶ [tools] ──results──▶ [model] ──▶ done
//!                                        │
//!                          auth / approval needed
//!                                        ▼
//!                               Interrupts (run ends)
//!                                        │
//!                     Command { resume } ─┘ re-enters [tools]
//! ```
//!
//! Runs are streamed at update granularity: each finished node yields one
//! `StreamChunk::Updates`, and a suspended tools node yields one
//! `StreamChunk::Interrupts` and ends the stream. Thread state is saved to the
//! checkpointer after every node, keyed by `RunnableConfig::thread_id`.

mod checkpoint;
mod types;

pub use checkpoint::{
    CallResolution, Checkpointer, InterruptKind, MemorySaver, PendingToolBatch, RaisedInterrupt, ThreadState,
};
pub use types::{
    AgentInput, AgentMessage, Command, Decision, Interrupt, InterruptValue, NodeUpdate, ResumeValue,
    RunnableConfig, StreamChunk, ToolCall, MODEL_NODE, TOOLS_NODE,
};

use std::sync::Arc;

use futures::stream::{self, BoxStream, StreamExt};
use tracing::{debug, info, warn};

use crate::approval::ToolApprovalConfig;
use crate::arcade::ToolExecutor;
use crate::error::{Error, Result, ToolError};
use crate::provider::{ChatModel, CompletionRequest};
use crate::tools::{RemoteTool, ToolDefinition, ToolRegistry};

/// Tool result used when a new message arrives while calls await decisions
const CANCELLED_CALL: &str = "Tool call cancelled: the user sent a new message instead of answering.";

/// Everything needed to build an agent
pub struct AgentOptions {
    pub system_prompt: String,
    pub model: Arc<dyn ChatModel>,
    pub tools: Vec<RemoteTool>,
    pub executor: Arc<dyn ToolExecutor>,
    pub approval: ToolApprovalConfig,
    pub checkpointer: Arc<dyn Checkpointer>,
    /// Identity tools run on behalf of
    pub user_id: String,
    /// Maximum model calls per run
    pub recursion_limit: usize,
}

/// A tool-calling agent bound to a model, a tool set and a checkpointer
pub struct Agent {
    system_prompt: String,
    model: Arc<dyn ChatModel>,
    registry: ToolRegistry,
    tool_definitions: Vec<ToolDefinition>,
    executor: Arc<dyn ToolExecutor>,
    approval: ToolApprovalConfig,
    checkpointer: Arc<dyn Checkpointer>,
    user_id: String,
    recursion_limit: usize,
}

/// Build an agent from its options
pub fn create_agent(options: AgentOptions) -> Agent {
    let registry = ToolRegistry::new(options.tools);
    let tool_definitions = registry.list();
    info!(
        model = options.model.name(),
        tools = registry.len(),
        "Agent created"
    );

    Agent {
        system_prompt: options.system_prompt,
        model: options.model,
        registry,
        tool_definitions,
        executor: options.executor,
        approval: options.approval,
        checkpointer: options.checkpointer,
        user_id: options.user_id,
        recursion_limit: options.recursion_limit,
    }
}

impl Agent {
    /// Stream one run of the agent
    ///
    /// The stream ends when the model answers without tool calls, when the
    /// run is suspended by interrupts, or after the first error.
    pub fn stream<'a>(&'a self, input: AgentInput, config: &RunnableConfig) -> BoxStream<'a, Result<StreamChunk>> {
        let run = AgentRun::new(self, input, config.thread_id.clone());
        stream::unfold(run, |mut run| async move {
            let chunk = run.next_chunk().await?;
            Some((chunk, run))
        })
        .boxed()
    }

    /// Current saved state of a thread
    pub fn state(&self, config: &RunnableConfig) -> ThreadState {
        self.checkpointer.get(&config.thread_id).unwrap_or_default()
    }
}

enum Phase {
    Start(AgentInput),
    CallModel,
    RunTools,
    Done,
}

/// State machine behind one streamed run
struct AgentRun<'a> {
    agent: &'a Agent,
    thread_id: String,
    state: ThreadState,
    phase: Phase,
}

impl<'a> AgentRun<'a> {
    fn new(agent: &'a Agent, input: AgentInput, thread_id: String) -> Self {
        let state = agent.checkpointer.get(&thread_id).unwrap_or_default();
        Self {
            agent,
            thread_id,
            state,
            phase: Phase::Start(input),
        }
    }

    async fn next_chunk(&mut self) -> Option<Result<StreamChunk>> {
        loop {
            // Any error leaves the run in Done
            let step = match std::mem::replace(&mut self.phase, Phase::Done) {
                Phase::Done => return None,
                Phase::Start(input) => self.apply_input(input).map(|_| None),
                Phase::CallModel => self.call_model().await.map(Some),
                Phase::RunTools => self.run_tools().await.map(Some),
            };

            match step {
                Ok(Some(chunk)) => return Some(Ok(chunk)),
                Ok(None) => continue,
                Err(e) => return Some(Err(e)),
            }
        }
    }

    fn save(&self) {
        self.agent.checkpointer.put(&self.thread_id, self.state.clone());
    }

    fn apply_input(&mut self, input: AgentInput) -> Result<()> {
        match input {
            AgentInput::Messages(messages) => {
                if let Some(batch) = self.state.pending.take() {
                    warn!(
                        thread_id = %self.thread_id,
                        calls = batch.calls.len(),
                        "New message while tool calls were pending; cancelling them"
                    );
                    for call in &batch.calls {
                        self.state
                            .messages
                            .push(AgentMessage::tool(&call.id, &call.name, CANCELLED_CALL));
                    }
                }
                self.state.messages.extend(messages);
                self.state.model_steps = 0;
                self.phase = Phase::CallModel;
            }
            AgentInput::Resume(command) => {
                let batch = self
                    .state
                    .pending
                    .as_mut()
                    .ok_or_else(|| Error::Agent("No interrupted run to resume".to_string()))?;

                let decisions = command.resume.into_decisions();
                if decisions.len() != batch.raised.len() {
                    return Err(Error::Agent(format!(
                        "Expected {} resume decision(s), got {}",
                        batch.raised.len(),
                        decisions.len()
                    )));
                }

                for (raised, decision) in batch.raised.drain(..).zip(decisions) {
                    debug!(tool = %raised.tool_name, kind = ?raised.kind, authorized = decision.authorized, "Applying decision");
                    let resolution = match (raised.kind, decision.authorized) {
                        // Granted authorizations are re-checked when the tools node runs again
                        (InterruptKind::Authorization, true) => None,
                        (InterruptKind::Authorization, false) => Some(CallResolution::Denied(format!(
                            "Authorization for {} was not granted. The tool was not run.",
                            raised.tool_name
                        ))),
                        (InterruptKind::Approval, true) => Some(CallResolution::Approved),
                        (InterruptKind::Approval, false) => Some(CallResolution::Denied(format!(
                            "The user did not approve the {} tool call. The tool was not run.",
                            raised.tool_name
                        ))),
                    };
                    if let Some(resolution) = resolution {
                        batch.resolutions.insert(raised.call_id, resolution);
                    }
                }
                self.phase = Phase::RunTools;
            }
        }
        Ok(())
    }

    async fn call_model(&mut self) -> Result<StreamChunk> {
        self.state.model_steps += 1;
        if self.state.model_steps > self.agent.recursion_limit {
            return Err(Error::Agent(format!(
                "Recursion limit of {} reached without a final answer",
                self.agent.recursion_limit
            )));
        }

        let request = CompletionRequest {
            system_prompt: &self.agent.system_prompt,
            messages: &self.state.messages,
            tools: &self.agent.tool_definitions,
        };
        let result = self.agent.model.complete(request).await?;

        let message = AgentMessage::ai(result.content.unwrap_or_default(), result.tool_calls);
        if message.tool_calls().is_empty() {
            self.phase = Phase::Done;
        } else {
            self.state.pending = Some(PendingToolBatch::new(message.tool_calls().to_vec()));
            self.phase = Phase::RunTools;
        }
        self.state.messages.push(message.clone());
        self.save();

        Ok(StreamChunk::Updates(vec![NodeUpdate::new(MODEL_NODE, vec![message])]))
    }

    async fn run_tools(&mut self) -> Result<StreamChunk> {
        let batch = self
            .state
            .pending
            .clone()
            .ok_or_else(|| Error::Agent("No pending tool calls".to_string()))?;

        let mut raised = Vec::new();
        let mut interrupts = Vec::new();
        for call in &batch.calls {
            let resolution = batch.resolutions.get(&call.id);
            if matches!(resolution, Some(CallResolution::Denied(_))) {
                continue;
            }
            // Unknown tools are answered with an error when executing
            let Some(tool) = self.agent.registry.get(&call.name) else {
                continue;
            };

            if tool.requires_authorization {
                let auth = self.agent.executor.authorize(&tool.qualified_name, &self.agent.user_id).await?;
                if !auth.is_completed() {
                    raised.push(RaisedInterrupt {
                        call_id: call.id.clone(),
                        tool_name: call.name.clone(),
                        kind: InterruptKind::Authorization,
                    });
                    interrupts.push(Interrupt::new(InterruptValue::Authorization {
                        tool_name: call.name.clone(),
                        authorization_response: auth,
                    }));
                    continue;
                }
            }

            if self.agent.approval.needs_approval(&call.name) && !matches!(resolution, Some(CallResolution::Approved)) {
                raised.push(RaisedInterrupt {
                    call_id: call.id.clone(),
                    tool_name: call.name.clone(),
                    kind: InterruptKind::Approval,
                });
                interrupts.push(Interrupt::new(InterruptValue::Approval {
                    tool_name: call.name.clone(),
                    input: call.args.clone(),
                }));
            }
        }

        if !interrupts.is_empty() {
            info!(thread_id = %self.thread_id, count = interrupts.len(), "Run interrupted");
            if let Some(pending) = self.state.pending.as_mut() {
                pending.raised = raised;
            }
            self.save();
            self.phase = Phase::Done;
            return Ok(StreamChunk::Interrupts(interrupts));
        }

        let mut results = Vec::with_capacity(batch.calls.len());
        for call in &batch.calls {
            let content = match batch.resolutions.get(&call.id) {
                Some(CallResolution::Denied(reason)) => reason.clone(),
                _ => self.execute_call(call).await,
            };
            results.push(AgentMessage::tool(&call.id, &call.name, content));
        }

        self.state.pending = None;
        self.state.messages.extend(results.iter().cloned());
        self.save();
        self.phase = Phase::CallModel;

        Ok(StreamChunk::Updates(vec![NodeUpdate::new(TOOLS_NODE, results)]))
    }

    /// Run one tool; failures become the tool's answer
    async fn execute_call(&self, call: &ToolCall) -> String {
        let Some(tool) = self.agent.registry.get(&call.name) else {
            return format!("Error: {}", ToolError::NotFound(call.name.clone()));
        };

        match self
            .agent
            .executor
            .execute(&tool.qualified_name, call.args.clone(), &self.agent.user_id)
            .await
        {
            Ok(response) => response.to_tool_content(),
            Err(e) => {
                warn!(tool = %call.name, error = %e, "Tool execution failed");
                format!("Error: {}", ToolError::ExecutionFailed(e.to_string()))
            }
        }
    }
}
