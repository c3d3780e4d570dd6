// ABOUTME: SMS routes for Twilio connection management and the inbound webhook
// ABOUTME: The webhook acknowledges immediately with fixed TwiML and processes in the background

//! SMS routes

use crate::errors::AppError;
use crate::routes::AppState;
use crate::sms::SmsStatus;
use axum::extract::State;
use axum::http::header;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Form, Json, Router};
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::{error, info};

/// Fixed empty TwiML acknowledgment returned for every webhook post
const EMPTY_TWIML: &str = r#"<?xml version="1.0" encoding="UTF-8"?><Response></Response>"#;

/// Form payload for connecting Twilio
#[derive(Debug, Deserialize)]
pub struct SmsConnectForm {
    /// Twilio account SID
    pub account_sid: String,
    /// Twilio auth token
    pub auth_token: String,
    /// Twilio phone number (format: +1234567890)
    pub phone_number: String,
}

/// Form fields Twilio posts for an inbound message
#[derive(Debug, Deserialize)]
pub struct TwilioWebhookForm {
    /// Sender phone number
    #[serde(rename = "From", default)]
    pub from: String,
    /// Message text content
    #[serde(rename = "Body", default)]
    pub body: String,
    /// Provider message SID
    #[serde(rename = "MessageSid", default)]
    pub message_sid: String,
}

async fn status(State(state): State<Arc<AppState>>) -> Json<SmsStatus> {
    Json(state.twilio.status().await)
}

async fn connect(
    State(state): State<Arc<AppState>>,
    Form(form): Form<SmsConnectForm>,
) -> Result<Json<Value>, AppError> {
    state
        .twilio
        .connect(&form.account_sid, &form.auth_token, &form.phone_number)
        .await?;
    Ok(Json(json!({"ok": true, "phone_number": form.phone_number})))
}

async fn disconnect(State(state): State<Arc<AppState>>) -> Json<Value> {
    state.twilio.disconnect().await;
    Json(json!({"ok": true}))
}

async fn webhook(
    State(state): State<Arc<AppState>>,
    form: Option<Form<TwilioWebhookForm>>,
) -> impl IntoResponse {
    // The acknowledgment is fixed regardless of processing outcome
    if let Some(Form(form)) = form {
        info!(
            "SMS webhook received from {} (sid {}, {} bytes)",
            form.from,
            form.message_sid,
            form.body.len()
        );

        // The handle is dropped: the reply path runs to completion on its own
        drop(state.bridge.handle_inbound(form.from, form.body));
    } else {
        error!("SMS webhook received an unparseable form post");
    }

    ([(header::CONTENT_TYPE, "application/xml")], EMPTY_TWIML)
}

/// Create the SMS routes
pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/sms/status", get(status))
        .route("/sms/connect", post(connect))
        .route("/sms/disconnect", post(disconnect))
        .route("/sms/webhook", post(webhook))
}
