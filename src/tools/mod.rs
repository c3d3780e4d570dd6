// ABOUTME: Tool adapter architecture exposing provider operations to the agent
// ABOUTME: Schema types, the AgentTool trait, implementations, and the registry

//! # Agent Tools
//!
//! Every provider operation is exposed as a schema-described callable for
//! invocation by a language-model-driven agent. Callables return a
//! stringified result or a stringified error message — never an `Err`.

/// Provider tool implementations
pub mod implementations;
/// Tool registry and dispatch
pub mod registry;
/// Tool schema types
pub mod schema;
/// The AgentTool trait
pub mod traits;

pub use registry::ToolRegistry;
pub use schema::ToolSchema;
pub use traits::AgentTool;
