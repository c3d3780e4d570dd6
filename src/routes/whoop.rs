// ABOUTME: WHOOP API routes for the OAuth authorization flow
// ABOUTME: Connect redirects to the provider; the callback exchanges the code for tokens

//! WHOOP routes

use crate::errors::AppError;
use crate::routes::AppState;
use axum::extract::{Query, State};
use axum::response::Redirect;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;

/// Query parameters presented by the provider on callback
#[derive(Debug, Deserialize)]
pub struct CallbackParams {
    /// Authorization code
    pub code: String,
    /// OAuth state parameter for CSRF protection
    pub state: String,
}

async fn connect(State(state): State<Arc<AppState>>) -> Result<Redirect, AppError> {
    let url = state.whoop.authorization_url().await?;
    Ok(Redirect::temporary(&url))
}

async fn callback(
    State(state): State<Arc<AppState>>,
    Query(params): Query<CallbackParams>,
) -> Result<Json<Value>, AppError> {
    state.whoop.exchange_code(&params.code, &params.state).await?;
    Ok(Json(json!({
        "success": true,
        "message": "Whoop connected successfully"
    })))
}

async fn status(State(state): State<Arc<AppState>>) -> Json<Value> {
    Json(json!({"connected": state.whoop.is_connected().await}))
}

async fn disconnect(State(state): State<Arc<AppState>>) -> Json<Value> {
    state.whoop.disconnect().await;
    Json(json!({
        "success": true,
        "message": "Whoop disconnected successfully"
    }))
}

/// Create the WHOOP routes
pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/whoop/connect", get(connect))
        .route("/whoop/callback", get(callback))
        .route("/whoop/status", get(status))
        .route("/whoop/disconnect", post(disconnect))
}
