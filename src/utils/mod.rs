// ABOUTME: Shared utility modules for the gateway
// ABOUTME: Currently hosts the pooled HTTP client helpers

//! Shared utilities

/// Pooled and probe HTTP client constructors
pub mod http_client;
