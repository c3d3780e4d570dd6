// ABOUTME: HTTP route handlers for the local provider-management surface
// ABOUTME: Assembles per-provider routers over the shared application state

//! # HTTP Routes
//!
//! Connect/status/disconnect endpoints per provider, the WHOOP OAuth
//! callback, and the Twilio webhook. Handlers surface failures as structured
//! JSON error bodies via the `AppError` response mapping.

/// Health check routes
pub mod health;
/// Hevy API key management routes
pub mod hevy;
/// SMS connection and webhook routes
pub mod sms;
/// WHOOP OAuth flow routes
pub mod whoop;

use crate::providers::{HevyClient, WhoopClient};
use crate::sms::{SmsBridge, TwilioClient};
use axum::Router;
use std::sync::Arc;
use tower_http::trace::TraceLayer;

/// Shared state handed to every route handler
pub struct AppState {
    /// Hevy provider client
    pub hevy: Arc<HevyClient>,
    /// WHOOP provider client
    pub whoop: Arc<WhoopClient>,
    /// Twilio SMS client
    pub twilio: Arc<TwilioClient>,
    /// Inbound SMS bridge
    pub bridge: Arc<SmsBridge>,
}

/// Build the complete application router
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .merge(health::routes())
        .merge(hevy::routes())
        .merge(whoop::routes())
        .merge(sms::routes())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
