// ABOUTME: Hevy API routes for API key management
// ABOUTME: Connect validates and persists a key; status reports source and validity

//! Hevy routes

use crate::errors::AppError;
use crate::routes::AppState;
use axum::extract::State;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;

/// Payload for saving a Hevy API key
#[derive(Debug, Deserialize)]
pub struct HevyConnectRequest {
    /// The opaque API key string
    pub api_key: String,
}

async fn connect(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<HevyConnectRequest>,
) -> Result<Json<Value>, AppError> {
    state.hevy.connect(&payload.api_key).await?;
    Ok(Json(json!({
        "success": true,
        "message": "Hevy API key saved successfully"
    })))
}

async fn status(State(state): State<Arc<AppState>>) -> Json<Value> {
    match state.hevy.status().await {
        Some(source) => Json(json!({"connected": true, "source": source.as_str()})),
        None => Json(json!({"connected": false})),
    }
}

async fn disconnect(State(state): State<Arc<AppState>>) -> Json<Value> {
    state.hevy.disconnect().await;
    Json(json!({
        "success": true,
        "message": "Hevy disconnected successfully"
    }))
}

/// Create the Hevy routes
pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/hevy/connect", post(connect))
        .route("/hevy/status", get(status))
        .route("/hevy/disconnect", post(disconnect))
}
