// ABOUTME: Health check route handlers for service monitoring
// ABOUTME: Provides a liveness endpoint for monitoring infrastructure

//! Health check routes

use crate::routes::AppState;
use axum::{routing::get, Json, Router};
use std::sync::Arc;

async fn health_handler() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "healthy",
        "timestamp": chrono::Utc::now().to_rfc3339()
    }))
}

/// Create the health check routes
pub fn routes() -> Router<Arc<AppState>> {
    Router::new().route("/health", get(health_handler))
}
