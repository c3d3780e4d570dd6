// ABOUTME: SMS channel: Twilio client plus the inbound-message bridge
// ABOUTME: Outbound sends and the webhook path never raise past their boundary

//! # SMS Channel

/// Inbound webhook to agent bridging
pub mod bridge;
/// Twilio REST client and configuration store
pub mod twilio;

pub use bridge::SmsBridge;
pub use twilio::{SendOutcome, SmsConfigRecord, SmsStatus, TwilioClient, TwilioConfig};
