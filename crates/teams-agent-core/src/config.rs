//! Configuration for the Teams agent
//!
//! Required values (user identity, model, Arcade API key) come from the
//! process environment. Tunable agent settings (toolkits, tool limit, thread
//! id, approval policy) have defaults and can be overridden from a TOML file.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::prompt::DEFAULT_SYSTEM_PROMPT;

/// Environment variable naming the Arcade user that authorizes tool calls
pub const ARCADE_USER_ID_ENV: &str = "ARCADE_USER_ID";
/// Environment variable selecting the language model
pub const OPENAI_MODEL_ENV: &str = "OPENAI_MODEL";
/// Environment variable holding the Arcade API key
pub const ARCADE_API_KEY_ENV: &str = "ARCADE_API_KEY";
/// Environment variable overriding the Arcade API base URL
pub const ARCADE_BASE_URL_ENV: &str = "ARCADE_BASE_URL";

/// Default Arcade API endpoint
pub const DEFAULT_ARCADE_BASE_URL: &str = "https://api.arcade.dev";

/// Fully resolved configuration, built once at process entry
#[derive(Debug, Clone)]
pub struct AgentConfig {
    /// Identity the Arcade tools act on behalf of
    pub user_id: String,
    /// Model identifier handed to the LLM provider
    pub model: String,
    /// Arcade connection settings
    pub arcade: ArcadeConfig,
    /// Agent behaviour settings
    pub settings: AgentSettings,
}

/// Arcade API connection settings
#[derive(Debug, Clone)]
pub struct ArcadeConfig {
    pub api_key: String,
    pub base_url: String,
}

impl AgentConfig {
    /// Build the configuration from the process environment
    pub fn from_env(settings: AgentSettings) -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok(), settings)
    }

    /// Build the configuration from an arbitrary variable lookup
    ///
    /// Variables are checked in a fixed order so the first missing one is
    /// the one reported.
    pub fn from_lookup<F>(lookup: F, settings: AgentSettings) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let user_id = required(&lookup, ARCADE_USER_ID_ENV)?;
        let model = required(&lookup, OPENAI_MODEL_ENV)?;
        let api_key = required(&lookup, ARCADE_API_KEY_ENV)?;
        let base_url = lookup(ARCADE_BASE_URL_ENV)
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| DEFAULT_ARCADE_BASE_URL.to_string());

        Ok(Self {
            user_id,
            model,
            arcade: ArcadeConfig { api_key, base_url },
            settings,
        })
    }
}

fn required<F>(lookup: &F, key: &str) -> Result<String>
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        Some(value) if !value.is_empty() => Ok(value),
        _ => Err(Error::Config(format!("Missing {}. Add it to your .env file.", key))),
    }
}

/// Agent behaviour settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AgentSettings {
    /// Toolkits whose tools are all retrieved from Arcade
    pub toolkits: Vec<String>,
    /// Individually named tools retrieved in addition to the toolkits
    pub tools: Vec<String>,
    /// Maximum number of tool definitions handed to the agent
    pub tool_limit: usize,
    /// Conversation thread identifier used for checkpointing
    pub thread_id: String,
    /// System prompt for the agent
    pub system_prompt: String,
    /// Maximum model steps per turn
    pub recursion_limit: usize,
    /// Human-in-the-loop settings
    pub approval: ApprovalSettings,
}

impl Default for AgentSettings {
    fn default() -> Self {
        Self {
            toolkits: vec!["MicrosoftTeams".to_string()],
            tools: Vec::new(),
            tool_limit: 100,
            thread_id: "1".to_string(),
            system_prompt: DEFAULT_SYSTEM_PROMPT.to_string(),
            recursion_limit: 25,
            approval: ApprovalSettings::default(),
        }
    }
}

impl AgentSettings {
    /// Load settings from a TOML file, falling back to defaults for missing keys
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("Failed to read config: {}", e)))?;

        toml::from_str(&content)
            .map_err(|e| Error::Config(format!("Failed to parse config: {}", e)))
    }
}

/// Human-in-the-loop settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ApprovalSettings {
    /// Extra tool names (LLM-facing, e.g. `MicrosoftTeams_CreateChat`) that need approval
    pub require_approval: Vec<String>,
    /// Skip every approval prompt
    pub auto_approve_all: bool,
}
