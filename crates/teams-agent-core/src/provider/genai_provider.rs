//! GenAI-based LLM provider implementation
//!
//! Uses the genai framework with manual tool control: the model proposes tool
//! calls and the agent decides when (and whether) they run.
//! The model name selects the backend; `gpt-*` / `o*` names go to OpenAI and
//! authenticate with `OPENAI_API_KEY`.

use std::time::Duration;

use async_trait::async_trait;
use futures::StreamExt;
use genai::chat::{ChatMessage, ChatRequest, ChatStreamEvent, Tool, ToolCall as GenAiToolCall, ToolResponse};
use genai::Client;
use genai::WebConfig;
use tracing::debug;

use super::logging::log_llm_interaction;
use super::{ChatModel, CompletionRequest, CompletionResult};
use crate::agent::{AgentMessage, ToolCall};
use crate::error::{Error, Result};

/// A provider implementation using genai
pub struct GenAIProvider {
    client: Client,
    model: String,
}

impl GenAIProvider {
    /// Default timeout for LLM API requests (5 minutes)
    const DEFAULT_TIMEOUT: Duration = Duration::from_secs(300);

    /// Create WebConfig with appropriate timeouts for LLM requests
    fn default_web_config() -> WebConfig {
        WebConfig::default()
            .with_timeout(Self::DEFAULT_TIMEOUT)
            .with_connect_timeout(Duration::from_secs(30))
    }

    /// Create a new provider (uses environment variables for auth)
    pub fn new(model: impl Into<String>) -> Self {
        let client = Client::builder()
            .with_web_config(Self::default_web_config())
            .build();
        Self {
            client,
            model: model.into(),
        }
    }

    /// Get the model name
    pub fn model(&self) -> &str {
        &self.model
    }

    /// Convert the conversation to a genai request
    fn build_request(request: &CompletionRequest<'_>) -> ChatRequest {
        let mut chat_req = ChatRequest::default().with_system(request.system_prompt);

        for msg in request.messages {
            chat_req = match msg {
                AgentMessage::Human { content } => chat_req.append_message(ChatMessage::user(content.as_str())),
                AgentMessage::Ai { content, tool_calls } if tool_calls.is_empty() => {
                    chat_req.append_message(ChatMessage::assistant(content.as_str()))
                }
                AgentMessage::Ai { content, tool_calls } => {
                    if !content.is_empty() {
                        chat_req = chat_req.append_message(ChatMessage::assistant(content.as_str()));
                    }
                    // OpenAI expects the tool calls as a single assistant message
                    let genai_tool_calls: Vec<GenAiToolCall> = tool_calls
                        .iter()
                        .map(|tc| GenAiToolCall {
                            call_id: tc.id.clone(),
                            fn_name: tc.name.clone(),
                            fn_arguments: tc.args.clone(),
                            thought_signatures: None,
                        })
                        .collect();
                    chat_req.append_message(genai_tool_calls)
                }
                AgentMessage::Tool { call_id, content, .. } => {
                    chat_req.append_message(ToolResponse::new(call_id.clone(), content.clone()))
                }
            };
        }

        if !request.tools.is_empty() {
            let genai_tools: Vec<Tool> = request
                .tools
                .iter()
                .map(|t| {
                    Tool::new(&t.name)
                        .with_description(&t.description)
                        .with_schema(t.parameters.clone())
                })
                .collect();
            chat_req = chat_req.with_tools(genai_tools);
        }

        chat_req
    }

    async fn stream_completion(&self, chat_req: ChatRequest) -> Result<CompletionResult> {
        // Streaming avoids timeouts on long generations
        let stream_response = self
            .client
            .exec_chat_stream(&self.model, chat_req, None)
            .await
            .map_err(|e| Error::Provider(format!("GenAI error: {:?}", e)))?;

        let mut content = String::new();
        let mut tool_calls = Vec::new();
        let mut stream = stream_response.stream;

        while let Some(event) = stream.next().await {
            match event {
                Ok(ChatStreamEvent::Chunk(chunk)) => {
                    content.push_str(&chunk.content);
                }
                Ok(ChatStreamEvent::ToolCallChunk(tc)) => {
                    // Each ToolCallChunk contains a complete ToolCall
                    let tool_call = tc.tool_call;
                    let id = if tool_call.call_id.is_empty() {
                        uuid::Uuid::new_v4().to_string()
                    } else {
                        tool_call.call_id
                    };
                    tool_calls.push(ToolCall {
                        id,
                        name: tool_call.fn_name,
                        args: tool_call.fn_arguments,
                    });
                }
                Ok(ChatStreamEvent::End(_)) => break,
                Ok(_) => {}
                Err(e) => return Err(Error::Provider(format!("GenAI stream error: {:?}", e))),
            }
        }

        Ok(CompletionResult {
            content: if content.is_empty() { None } else { Some(content) },
            tool_calls,
        })
    }
}

#[async_trait]
impl ChatModel for GenAIProvider {
    fn name(&self) -> &str {
        "genai"
    }

    async fn complete(&self, request: CompletionRequest<'_>) -> Result<CompletionResult> {
        debug!(
            model = %self.model,
            messages = request.messages.len(),
            tools = request.tools.len(),
            "Requesting completion"
        );

        let chat_req = Self::build_request(&request);
        match self.stream_completion(chat_req).await {
            Ok(result) => {
                log_llm_interaction(&self.model, &request, Some(&result), None);
                Ok(result)
            }
            Err(e) => {
                let error_msg = e.to_string();
                log_llm_interaction(&self.model, &request, None, Some(&error_msg));
                tracing::error!(error = %error_msg, model = %self.model, "LLM request failed");
                Err(e)
            }
        }
    }
}
