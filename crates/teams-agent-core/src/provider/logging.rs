//! LLM request/response logging
//!
//! Set the `LLM_LOG_FILE` environment variable to append one JSON object per
//! model call to that file.
//!
//! Example: `LLM_LOG_FILE=/tmp/llm.log teams-agent`

use serde_json::json;
use std::io::Write;
use tracing::{debug, warn};

use super::{CompletionRequest, CompletionResult};

/// Environment variable naming the log file
pub const LLM_LOG_FILE_ENV: &str = "LLM_LOG_FILE";

/// Log an LLM request/response interaction to file if LLM_LOG_FILE is set
pub fn log_llm_interaction(
    model: &str,
    request: &CompletionRequest<'_>,
    result: Option<&CompletionResult>,
    error: Option<&str>,
) {
    let Ok(log_file) = std::env::var(LLM_LOG_FILE_ENV) else {
        return;
    };

    let entry = json!({
        "timestamp": chrono::Utc::now().to_rfc3339(),
        "model": model,
        "request": {
            "message_count": request.messages.len(),
            "messages": request.messages,
            "tool_count": request.tools.len(),
        },
        "response": result.map(|r| json!({
            "type": if r.has_tool_calls() { "tool_calls" } else { "message" },
            "content": r.content,
            "tool_calls": r.tool_calls,
        })),
        "error": error,
    });

    match std::fs::OpenOptions::new().create(true).append(true).open(&log_file) {
        Ok(mut file) => {
            if let Err(e) = writeln!(file, "{}", entry) {
                warn!("Failed to write to LLM log file: {}", e);
            }
        }
        Err(e) => {
            warn!("Failed to open LLM log file {}: {}", log_file, e);
        }
    }

    debug!("Logged LLM interaction to {}", log_file);
}
