//! LLM provider abstraction
//!
//! The agent talks to the model through the `ChatModel` trait. The production
//! implementation is `GenAIProvider`, which goes through the genai framework
//! (OpenAI models selected by `OPENAI_MODEL`).

mod genai_provider;
mod logging;

pub use genai_provider::GenAIProvider;

use async_trait::async_trait;

use crate::agent::{AgentMessage, ToolCall};
use crate::error::Result;
use crate::tools::ToolDefinition;

/// Everything the model sees for one completion
#[derive(Debug, Clone, Copy)]
pub struct CompletionRequest<'a> {
    pub system_prompt: &'a str,
    pub messages: &'a [AgentMessage],
    pub tools: &'a [ToolDefinition],
}

/// Response from completion that may contain both content and tool calls
#[derive(Debug, Clone, Default)]
pub struct CompletionResult {
    /// Text content from the assistant (may be present even with tool calls)
    pub content: Option<String>,
    /// Tool calls the agent should run
    pub tool_calls: Vec<ToolCall>,
}

impl CompletionResult {
    /// Check if this result has any tool calls
    pub fn has_tool_calls(&self) -> bool {
        !self.tool_calls.is_empty()
    }
}

/// A chat model able to call tools
#[async_trait]
pub trait ChatModel: Send + Sync {
    /// Provider name (e.g., "genai")
    fn name(&self) -> &str;

    async fn complete(&self, request: CompletionRequest<'_>) -> Result<CompletionResult>;
}
