// ABOUTME: Defines the AgentTool trait for the pluggable tool adapter architecture
// ABOUTME: Tools implement this trait to be registered and executed via the ToolRegistry

//! # Agent Tool Trait
//!
//! Every provider operation exposed to the language-model-driven agent
//! implements `AgentTool`. Execution never returns `Err` to the invoker: the
//! result is the JSON-encoded provider response as a string, or an
//! `"Error …"` string describing the failure.

use crate::tools::schema::ToolSchema;
use async_trait::async_trait;
use serde_json::Value;

/// The trait all agent-facing tools implement
#[async_trait]
pub trait AgentTool: Send + Sync {
    /// Unique identifier for the tool (e.g. `whoop_get_recovery`)
    fn name(&self) -> &'static str;

    /// Human-readable description for LLM consumption
    fn description(&self) -> &'static str;

    /// JSON Schema for input parameters
    fn input_schema(&self) -> Value;

    /// Execute the tool with the given arguments
    ///
    /// Returns a stringified result or a stringified error message; failures
    /// are reported in-band, never raised to the invoker.
    async fn execute(&self, args: Value) -> String;

    /// Complete schema document for this tool
    fn schema(&self) -> ToolSchema {
        ToolSchema::new(self.name(), self.description(), self.input_schema())
    }
}
