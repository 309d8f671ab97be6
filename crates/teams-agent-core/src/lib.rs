//! Teams Agent Core - Microsoft Teams assistant on Arcade tools
//!
//! This crate provides the core functionality for the Teams agent:
//! - Arcade client for tool retrieval, authorization and execution
//! - ReAct agent runtime with interrupt/resume and checkpointing
//! - Human-in-the-loop approval policy
//! - Interactive chat session driving the agent

pub mod agent;
pub mod approval;
pub mod arcade;
pub mod config;
pub mod error;
pub mod formatting;
pub mod prompt;
pub mod provider;
pub mod session;
pub mod tools;

pub use agent::{
    create_agent, Agent, AgentInput, AgentMessage, AgentOptions, Checkpointer, Command, Decision, Interrupt,
    InterruptValue, MemorySaver, ResumeValue, RunnableConfig, StreamChunk,
};
pub use approval::ToolApprovalConfig;
pub use arcade::{ArcadeClient, AuthWaiter, ToolExecutor};
pub use config::{AgentConfig, AgentSettings, ArcadeConfig};
pub use error::{Error, Result, ToolError};
pub use formatting::{format_message, truncate_str};
pub use prompt::DEFAULT_SYSTEM_PROMPT;
pub use provider::{ChatModel, CompletionRequest, CompletionResult, GenAIProvider};
pub use session::{confirm, handle_interrupt, stream_agent, ChatLoop, LineStyle, Terminal};
pub use tools::{get_tools, RemoteTool, ToolQuery, ToolRegistry};
