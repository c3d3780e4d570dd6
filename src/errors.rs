// ABOUTME: Unified error handling for provider clients, routes, and tool adapters
// ABOUTME: Defines error codes, HTTP status mapping, and JSON error response formatting
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pulse Gateway

//! # Unified Error Handling
//!
//! One error type flows through the whole gateway. Every `ErrorCode` maps to
//! an HTTP status, so route handlers surface errors as structured JSON bodies
//! without per-handler status juggling.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Standard error codes used throughout the gateway
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ErrorCode {
    /// No local credential, or the provider reported the credential expired
    #[serde(rename = "UNAUTHENTICATED")]
    Unauthenticated,
    /// The provider rejected a credential during validation
    #[serde(rename = "INVALID_CREDENTIAL")]
    InvalidCredential,
    /// OAuth callback state did not match the stored nonce
    #[serde(rename = "CSRF_STATE_MISMATCH")]
    CsrfStateMismatch,
    /// Non-401 HTTP error from a provider; status and body are in the details
    #[serde(rename = "UPSTREAM_ERROR")]
    UpstreamError,
    /// A required client id/secret or similar setting is missing
    #[serde(rename = "CONFIGURATION_ERROR")]
    ConfigurationError,
    /// Unexpected or transport-level failure
    #[serde(rename = "INTERNAL_ERROR")]
    InternalError,
}

impl ErrorCode {
    /// Get the HTTP status code for this error
    #[must_use]
    pub const fn http_status(self) -> u16 {
        match self {
            Self::Unauthenticated => 401,
            Self::InvalidCredential | Self::CsrfStateMismatch => 400,
            Self::UpstreamError => 502,
            Self::ConfigurationError | Self::InternalError => 500,
        }
    }

    /// Get a user-friendly description of this error
    #[must_use]
    pub const fn description(self) -> &'static str {
        match self {
            Self::Unauthenticated => "Not connected or authentication expired",
            Self::InvalidCredential => "The provider rejected the supplied credential",
            Self::CsrfStateMismatch => "OAuth state validation failed",
            Self::UpstreamError => "The provider returned an error",
            Self::ConfigurationError => "Required configuration is missing",
            Self::InternalError => "An internal error occurred",
        }
    }
}

/// Unified error type for the gateway
#[derive(Debug, Error)]
pub struct AppError {
    /// Error code
    pub code: ErrorCode,
    /// Human-readable error message
    pub message: String,
    /// Additional structured context (e.g. upstream status and body)
    pub details: serde_json::Value,
    /// Source error for error chaining
    #[source]
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl AppError {
    /// Create a new error with the given code and message
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            details: serde_json::Value::Null,
            source: None,
        }
    }

    /// Attach structured details to the error
    #[must_use]
    pub fn with_details(mut self, details: serde_json::Value) -> Self {
        self.details = details;
        self
    }

    /// Attach a source error for chaining
    #[must_use]
    pub fn with_source(mut self, source: impl std::error::Error + Send + Sync + 'static) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    /// Get the HTTP status code for this error
    #[must_use]
    pub fn http_status(&self) -> u16 {
        self.code.http_status()
    }

    /// Missing or expired local credential
    pub fn unauthenticated(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::Unauthenticated, message)
    }

    /// Provider rejected a credential during validation
    pub fn invalid_credential(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InvalidCredential, message)
    }

    /// OAuth callback state mismatch
    #[must_use]
    pub fn csrf_state_mismatch() -> Self {
        Self::new(
            ErrorCode::CsrfStateMismatch,
            "Invalid OAuth state - possible CSRF attack",
        )
    }

    /// Non-401 provider HTTP error, carrying status and body
    pub fn upstream(provider: impl Into<String>, status: u16, body: impl Into<String>) -> Self {
        let provider = provider.into();
        let body = body.into();
        Self::new(
            ErrorCode::UpstreamError,
            format!("{provider} API error: status {status}"),
        )
        .with_details(serde_json::json!({
            "provider": provider,
            "status": status,
            "body": body,
        }))
    }

    /// Required configuration missing
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::ConfigurationError, message)
    }

    /// Unexpected or transport-level failure
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InternalError, message)
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code.description(), self.message)
    }
}

/// Result type alias for convenience
pub type AppResult<T> = Result<T, AppError>;

/// HTTP error response format
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Error body
    pub error: ErrorResponseDetails,
}

/// Error body fields for the HTTP response
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponseDetails {
    /// Error code
    pub code: ErrorCode,
    /// Human-readable error message
    pub message: String,
    /// Structured context, omitted when empty
    #[serde(skip_serializing_if = "serde_json::Value::is_null")]
    pub details: serde_json::Value,
}

impl From<AppError> for ErrorResponse {
    fn from(error: AppError) -> Self {
        Self {
            error: ErrorResponseDetails {
                code: error.code,
                message: error.message,
                details: error.details,
            },
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.http_status())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (status, Json(ErrorResponse::from(self))).into_response()
    }
}

/// Conversion from anyhow::Error for bootstrap paths
impl From<anyhow::Error> for AppError {
    fn from(error: anyhow::Error) -> Self {
        Self::new(ErrorCode::InternalError, error.to_string())
    }
}
