// ABOUTME: Registry mapping tool names to AgentTool instances
// ABOUTME: Provides schema listing for the agent and by-name execution dispatch

//! Tool registry

use crate::providers::{HevyClient, WhoopClient};
use crate::tools::implementations::{hevy, whoop};
use crate::tools::schema::ToolSchema;
use crate::tools::traits::AgentTool;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;

/// Owns every registered tool and dispatches calls by name
pub struct ToolRegistry {
    tools: HashMap<&'static str, Box<dyn AgentTool>>,
}

impl ToolRegistry {
    /// Create an empty registry
    #[must_use]
    pub fn new() -> Self {
        Self {
            tools: HashMap::new(),
        }
    }

    /// Create a registry with every Hevy and WHOOP tool registered
    #[must_use]
    pub fn with_default_tools(hevy: Arc<HevyClient>, whoop: Arc<WhoopClient>) -> Self {
        let mut registry = Self::new();
        for tool in hevy::tools(hevy) {
            registry.register(tool);
        }
        for tool in whoop::tools(whoop) {
            registry.register(tool);
        }
        registry
    }

    /// Register a tool; a later registration replaces an earlier one by name
    pub fn register(&mut self, tool: Box<dyn AgentTool>) {
        self.tools.insert(tool.name(), tool);
    }

    /// Number of registered tools
    #[must_use]
    pub fn len(&self) -> usize {
        self.tools.len()
    }

    /// Whether the registry is empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    /// Schema documents for every registered tool, sorted by name
    #[must_use]
    pub fn schemas(&self) -> Vec<ToolSchema> {
        let mut schemas: Vec<ToolSchema> = self.tools.values().map(|t| t.schema()).collect();
        schemas.sort_by(|a, b| a.name.cmp(&b.name));
        schemas
    }

    /// Execute a tool by name
    ///
    /// Unknown names report in-band like any other tool failure; nothing
    /// raises to the invoker.
    pub async fn execute(&self, name: &str, args: Value) -> String {
        match self.tools.get(name) {
            Some(tool) => tool.execute(args).await,
            None => format!("Error: unknown tool '{name}'"),
        }
    }
}

impl Default for ToolRegistry {
    fn default() -> Self {
        Self::new()
    }
}
