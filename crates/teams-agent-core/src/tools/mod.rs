//! Tool system for the Teams agent
//!
//! Tools are remote Arcade tools. Each tool has:
//! - An LLM-facing name (`Toolkit_Tool`) and the Arcade qualified name (`Toolkit.Tool`)
//! - A description and JSON schema for the LLM
//! - Whether calling it needs an OAuth grant

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::info;

use crate::arcade::{self, ArcadeClient};
use crate::error::{Error, Result};

/// Tool definition for LLM consumption
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolDefinition {
    pub name: String,
    pub description: String,
    pub parameters: Value,
}

/// A tool hosted on Arcade
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RemoteTool {
    /// Name the model calls the tool by
    pub name: String,
    /// Name Arcade knows the tool by
    pub qualified_name: String,
    pub description: String,
    pub parameters: Value,
    pub requires_authorization: bool,
}

impl RemoteTool {
    /// Convert to tool definition for LLM
    pub fn to_definition(&self) -> ToolDefinition {
        ToolDefinition {
            name: self.name.clone(),
            description: self.description.clone(),
            parameters: self.parameters.clone(),
        }
    }
}

impl From<&arcade::ToolDefinition> for RemoteTool {
    fn from(def: &arcade::ToolDefinition) -> Self {
        let qualified_name = def.qualified_name();
        Self {
            name: llm_tool_name(&qualified_name),
            qualified_name,
            description: def.description.clone(),
            parameters: def.input_schema(),
            requires_authorization: def.requires_authorization(),
        }
    }
}

/// Function-calling names may not contain dots
pub fn llm_tool_name(qualified_name: &str) -> String {
    qualified_name.replace('.', "_")
}

/// Registry of available tools, in retrieval order
#[derive(Debug, Default, Clone)]
pub struct ToolRegistry {
    tools: Vec<Arc<RemoteTool>>,
    by_name: HashMap<String, usize>,
}

impl ToolRegistry {
    pub fn new(tools: impl IntoIterator<Item = RemoteTool>) -> Self {
        let mut registry = Self::default();
        for tool in tools {
            registry.register(tool);
        }
        registry
    }

    /// Register a tool, replacing any tool with the same name
    pub fn register(&mut self, tool: RemoteTool) {
        match self.by_name.get(&tool.name) {
            Some(&idx) => self.tools[idx] = Arc::new(tool),
            None => {
                self.by_name.insert(tool.name.clone(), self.tools.len());
                self.tools.push(Arc::new(tool));
            }
        }
    }

    /// Get a tool by its LLM-facing name
    pub fn get(&self, name: &str) -> Option<Arc<RemoteTool>> {
        self.by_name.get(name).map(|&idx| self.tools[idx].clone())
    }

    /// List all tool definitions for the LLM
    pub fn list(&self) -> Vec<ToolDefinition> {
        self.tools.iter().map(|t| t.to_definition()).collect()
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }
}

/// Which tools to retrieve, and for whom
#[derive(Debug, Clone)]
pub struct ToolQuery<'a> {
    pub toolkits: &'a [String],
    pub tools: &'a [String],
    pub user_id: &'a str,
    pub limit: usize,
}

/// Retrieve the tools of every named toolkit plus every individually named tool
///
/// Duplicates are dropped (first occurrence wins) and the result is capped at
/// `query.limit`. Any platform error aborts the whole retrieval.
pub async fn get_tools(client: &ArcadeClient, query: &ToolQuery<'_>) -> Result<Vec<RemoteTool>> {
    if query.user_id.is_empty() {
        return Err(Error::Config("A user ID is required to retrieve tools".to_string()));
    }

    let mut definitions = Vec::new();
    for toolkit in query.toolkits {
        definitions.extend(client.list_tools(toolkit, query.limit, query.user_id).await?);
    }
    for name in query.tools {
        definitions.push(client.get_tool(name, query.user_id).await?);
    }

    let tools = merge_tools(&definitions, query.limit);
    info!(count = tools.len(), "Retrieved tools from Arcade");
    Ok(tools)
}

fn merge_tools(definitions: &[arcade::ToolDefinition], limit: usize) -> Vec<RemoteTool> {
    let mut seen = HashSet::new();
    definitions
        .iter()
        .map(RemoteTool::from)
        .filter(|tool| seen.insert(tool.qualified_name.clone()))
        .take(limit)
        .collect()
}
