//! Approval policy for human-in-the-loop control
//!
//! Decides which tool calls must be confirmed by the user before the agent
//! runs them. Read-only Teams operations run freely; anything that posts,
//! replies or creates on the user's behalf needs an explicit yes.

use std::collections::HashSet;

use crate::config::ApprovalSettings;

/// Teams operations that act on the user's behalf
const WRITE_OPERATIONS: &[&str] = &[
    "MicrosoftTeams_SendMessageToChat",
    "MicrosoftTeams_ReplyToChatMessage",
    "MicrosoftTeams_CreateChat",
    "MicrosoftTeams_SendMessageToChannel",
    "MicrosoftTeams_ReplyToChannelMessage",
];

/// Configuration of which tools need user approval
///
/// Tool names are the LLM-facing names (`Toolkit_Tool`).
#[derive(Debug, Clone)]
pub struct ToolApprovalConfig {
    /// Tools that always require approval
    always_require_approval: HashSet<String>,
    /// If true, auto-approve everything
    approve_all: bool,
}

impl Default for ToolApprovalConfig {
    fn default() -> Self {
        Self {
            always_require_approval: WRITE_OPERATIONS.iter().map(|s| s.to_string()).collect(),
            approve_all: false,
        }
    }
}

impl ToolApprovalConfig {
    /// Build from user settings on top of the defaults
    pub fn from_settings(settings: &ApprovalSettings) -> Self {
        let mut config = Self::default();
        for name in &settings.require_approval {
            config.require_approval(name.clone());
        }
        config.approve_all = settings.auto_approve_all;
        config
    }

    /// Require approval for nothing
    pub fn trust_all() -> Self {
        Self {
            always_require_approval: HashSet::new(),
            approve_all: true,
        }
    }

    /// Add a tool to the approval list
    pub fn require_approval(&mut self, tool_name: impl Into<String>) {
        self.always_require_approval.insert(tool_name.into());
    }

    /// Check if a tool call needs user approval
    pub fn needs_approval(&self, tool_name: &str) -> bool {
        !self.approve_all && self.always_require_approval.contains(tool_name)
    }
}
