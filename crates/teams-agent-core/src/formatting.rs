//! Console formatting for agent messages
//!
//! Messages are rendered as a titled block, the tool calls of an AI message
//! listed under it:
//!
//! ```text
//! ================================== Ai Message ==================================
//! Tool Calls:
//!   MicrosoftTeams_ListChats (call_1)
//!  Call ID: call_1
//!   Args:
//!     limit: 10
//! ```

use serde_json::Value;

use crate::agent::AgentMessage;

const HEADER_WIDTH: usize = 80;

/// Tool results longer than this are cut when printed
pub const MAX_TOOL_CONTENT_CHARS: usize = 4000;

/// Truncate a string to at most `max` characters, adding "..." when cut
pub fn truncate_str(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    let kept: String = s.chars().take(max.saturating_sub(3)).collect();
    format!("{}...", kept)
}

/// Title line centered in a run of `=`
fn header(title: &str) -> String {
    let title = format!(" {} ", title);
    let fill = HEADER_WIDTH.saturating_sub(title.chars().count());
    let left = fill / 2;
    format!("{}{}{}", "=".repeat(left), title, "=".repeat(fill - left))
}

/// Render an argument value without JSON quotes around plain strings
fn format_arg(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Render one message for the console
pub fn format_message(message: &AgentMessage) -> String {
    let mut lines = Vec::new();
    match message {
        AgentMessage::Human { content } => {
            lines.push(header("Human Message"));
            lines.push(String::new());
            lines.push(content.clone());
        }
        AgentMessage::Ai { content, tool_calls } => {
            lines.push(header("Ai Message"));
            if !content.is_empty() {
                lines.push(String::new());
                lines.push(content.clone());
            }
            if !tool_calls.is_empty() {
                lines.push("Tool Calls:".to_string());
                for call in tool_calls {
                    lines.push(format!("  {} ({})", call.name, call.id));
                    lines.push(format!(" Call ID: {}", call.id));
                    lines.push("  Args:".to_string());
                    if let Value::Object(args) = &call.args {
                        for (key, value) in args {
                            lines.push(format!("    {}: {}", key, format_arg(value)));
                        }
                    } else if !call.args.is_null() {
                        lines.push(format!("    {}", call.args));
                    }
                }
            }
        }
        AgentMessage::Tool { name, content, .. } => {
            lines.push(header("Tool Message"));
            lines.push(format!("Name: {}", name));
            lines.push(String::new());
            lines.push(truncate_str(content, MAX_TOOL_CONTENT_CHARS));
        }
    }
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agent::ToolCall;
    use serde_json::json;

    #[test]
    fn test_truncate_str_is_char_safe() {
        assert_eq!(truncate_str("short", 10), "short");
        assert_eq!(truncate_str("hello world", 8), "hello...");
        assert_eq!(truncate_str("ünïcödé text", 6), "ünï...");
    }

    #[test]
    fn test_header_width() {
        let line = header("Ai Message");
        assert_eq!(line.chars().count(), HEADER_WIDTH);
        assert!(line.contains(" Ai Message "));
    }

    #[test]
    fn test_format_ai_message_with_tool_calls() {
        let message = AgentMessage::ai(
            "",
            vec![ToolCall {
                id: "call_1".to_string(),
                name: "MicrosoftTeams_SendMessageToChat".to_string(),
                args: json!({ "chat_id": "c1", "message": "hi" }),
            }],
        );

        let text = format_message(&message);
        assert!(text.contains("Ai Message"));
        assert!(text.contains("  MicrosoftTeams_SendMessageToChat (call_1)"));
        assert!(text.contains(" Call ID: call_1"));
        assert!(text.contains("    chat_id: c1"));
        assert!(text.contains("    message: hi"));
    }

    #[test]
    fn test_format_tool_message() {
        let text = format_message(&AgentMessage::tool("call_1", "MicrosoftTeams_ListChats", "[]"));
        assert!(text.contains("Tool Message"));
        assert!(text.contains("Name: MicrosoftTeams_ListChats"));
        assert!(text.ends_with("[]"));
    }

    #[test]
    fn test_format_plain_answer() {
        let text = format_message(&AgentMessage::ai("You have 2 unread chats.", vec![]));
        assert!(text.ends_with("You have 2 unread chats."));
        assert!(!text.contains("Tool Calls:"));
    }
}
