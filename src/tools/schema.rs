// ABOUTME: Tool schema definitions presented to the language-model-driven agent
// ABOUTME: Each tool declares a name, description, and JSON Schema parameter document

//! Tool schema types

use serde::{Deserialize, Serialize};

/// Schema-described callable exposed to the agent
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolSchema {
    /// Unique tool name (e.g. `hevy_get_workouts`)
    pub name: String,
    /// Human-readable description for LLM consumption
    pub description: String,
    /// JSON Schema for input parameters
    #[serde(rename = "inputSchema")]
    pub input_schema: serde_json::Value,
}

impl ToolSchema {
    /// Create a tool schema
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        input_schema: serde_json::Value,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            input_schema,
        }
    }
}
