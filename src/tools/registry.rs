//! Registry of the tools the pipeline may plan and execute.

use std::collections::HashMap;
use std::sync::Arc;

use tracing::debug;

use super::builtin;
use super::tool::Tool;
use crate::config::ToolwrightConfig;
use crate::error::ToolwrightError;
use crate::provider::ToolDefinition;

/// Name-keyed tool registry.
///
/// Populated at startup and read-only afterwards; share it as
/// `Arc<ToolRegistry>`. Iteration follows registration order.
#[derive(Clone, Default)]
pub struct ToolRegistry {
    tools: Vec<Arc<dyn Tool>>,
    index: HashMap<String, usize>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with every built-in tool.
    ///
    /// Market-data tools are only registered when a `polygon` API key is
    /// configured.
    pub fn with_defaults(config: &ToolwrightConfig) -> Result<Self, ToolwrightError> {
        let mut registry = Self::new();
        for tool in builtin::all_tools(config) {
            registry.register(tool)?;
        }
        Ok(registry)
    }

    /// Add a tool. Names are unique.
    pub fn register(&mut self, tool: Arc<dyn Tool>) -> Result<(), ToolwrightError> {
        let name = tool.name().to_string();
        if self.index.contains_key(&name) {
            return Err(ToolwrightError::DuplicateTool(name));
        }
        debug!(tool = %name, "registering tool");
        self.index.insert(name, self.tools.len());
        self.tools.push(tool);
        Ok(())
    }

    /// Look up a tool by name.
    ///
    /// Models sometimes vary the case of a tool name; an exact match wins,
    /// otherwise the lowercased name is tried.
    pub fn lookup(&self, name: &str) -> Result<Arc<dyn Tool>, ToolwrightError> {
        self.index
            .get(name)
            .or_else(|| self.index.get(&name.to_ascii_lowercase()))
            .map(|&i| self.tools[i].clone())
            .ok_or_else(|| ToolwrightError::UnknownTool(name.to_string()))
    }

    /// All tools in registration order.
    pub fn list(&self) -> &[Arc<dyn Tool>] {
        &self.tools
    }

    pub fn names(&self) -> Vec<&str> {
        self.tools.iter().map(|t| t.name()).collect()
    }

    /// Tool definitions to offer the model during planning.
    pub fn definitions(&self) -> Vec<ToolDefinition> {
        self.tools.iter().map(|t| t.definition()).collect()
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }
}

impl std::fmt::Debug for ToolRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ToolRegistry")
            .field("tools", &self.names())
            .finish()
    }
}
