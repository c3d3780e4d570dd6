// ABOUTME: Inbound SMS bridge: routes webhook messages into the conversational agent
// ABOUTME: Runs as a fire-and-forget background task; failures send a best-effort apology

//! # SMS Bridge
//!
//! The webhook handler must acknowledge Twilio promptly, so the
//! agent-invocation-and-reply sequence runs on a spawned task the handler
//! never awaits. The spawn returns its `JoinHandle` so tests can await
//! completion; the route handler drops it.

use crate::agent::{ChatRequest, ConversationalAgent};
use crate::sms::twilio::TwilioClient;
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::{error, info};

/// Reply sent to the original sender when the agent path fails
const APOLOGY_MESSAGE: &str = "Sorry, I encountered an error processing your message.";

/// Bridges inbound SMS messages to the conversational agent and back
pub struct SmsBridge {
    twilio: Arc<TwilioClient>,
    agent: Arc<dyn ConversationalAgent>,
}

impl SmsBridge {
    /// Create a bridge over the given client and agent
    #[must_use]
    pub fn new(twilio: Arc<TwilioClient>, agent: Arc<dyn ConversationalAgent>) -> Self {
        Self { twilio, agent }
    }

    /// Handle an inbound message as a background task
    ///
    /// Builds a single-turn chat request from the message body, invokes the
    /// agent, and sends its reply back to the sender. Any failure sends a
    /// best-effort apology instead; nothing is re-raised, since there is no
    /// caller left to observe it.
    pub fn handle_inbound(&self, from: String, body: String) -> JoinHandle<()> {
        let twilio = Arc::clone(&self.twilio);
        let agent = Arc::clone(&self.agent);

        tokio::spawn(async move {
            info!("Processing inbound SMS from {from} ({} bytes)", body.len());

            let reply = match agent.reply(ChatRequest::single_turn(body)).await {
                Ok(reply) => reply,
                Err(e) => {
                    error!("Failed to process incoming SMS: {e}");
                    let outcome = twilio.send(&from, APOLOGY_MESSAGE).await;
                    if !outcome.success {
                        error!(
                            "Failed to deliver apology to {from}: {}",
                            outcome.error.unwrap_or_default()
                        );
                    }
                    return;
                }
            };

            let outcome = twilio.send(&from, &reply).await;
            if !outcome.success {
                error!(
                    "Failed to deliver agent reply to {from}: {}",
                    outcome.error.unwrap_or_default()
                );
            }
        })
    }
}
