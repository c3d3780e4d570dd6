// ABOUTME: Chat message types and the conversational agent interface
// ABOUTME: The upstream agent is an external collaborator, specified here by trait only

//! # Conversational Agent Interface
//!
//! The gateway forwards inbound SMS messages to an upstream conversational
//! agent and relays its reply. The agent itself is out of scope; this module
//! defines the message types and the trait it is invoked through.

use crate::errors::AppResult;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Role of a message in the conversation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    /// System instruction message
    System,
    /// User input message
    User,
    /// Assistant response message
    Assistant,
}

/// A single message in a chat conversation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    /// Role of the message sender
    pub role: MessageRole,
    /// Content of the message
    pub content: String,
}

impl ChatMessage {
    /// Create a new chat message
    #[must_use]
    pub fn new(role: MessageRole, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }

    /// Create a user message
    #[must_use]
    pub fn user(content: impl Into<String>) -> Self {
        Self::new(MessageRole::User, content)
    }

    /// Create an assistant message
    #[must_use]
    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(MessageRole::Assistant, content)
    }
}

/// A chat completion request forwarded to the agent
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatRequest {
    /// Conversation messages
    pub messages: Vec<ChatMessage>,
}

impl ChatRequest {
    /// Create a new chat request with messages
    #[must_use]
    pub const fn new(messages: Vec<ChatMessage>) -> Self {
        Self { messages }
    }

    /// Create a single-turn request from one user message
    #[must_use]
    pub fn single_turn(content: impl Into<String>) -> Self {
        Self::new(vec![ChatMessage::user(content)])
    }
}

/// The upstream conversational agent, invoked synchronously for one reply
#[async_trait]
pub trait ConversationalAgent: Send + Sync {
    /// Produce a reply for the given request
    async fn reply(&self, request: ChatRequest) -> AppResult<String>;
}

/// Trivial agent that echoes the last user message back
///
/// Stand-in wiring for the binary until a real agent backend is attached.
pub struct EchoAgent;

#[async_trait]
impl ConversationalAgent for EchoAgent {
    async fn reply(&self, request: ChatRequest) -> AppResult<String> {
        let last = request
            .messages
            .iter()
            .rev()
            .find(|m| m.role == MessageRole::User)
            .map_or_else(String::new, |m| m.content.clone());
        Ok(last)
    }
}
