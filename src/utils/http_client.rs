// ABOUTME: Shared HTTP client utilities with connection pooling and timeout configuration
// ABOUTME: Provides a singleton client plus a short-timeout client for validation probes

use reqwest::{Client, ClientBuilder};
use std::sync::OnceLock;
use std::time::Duration;

/// Global shared HTTP client with default configuration
static SHARED_CLIENT: OnceLock<Client> = OnceLock::new();

/// Get or create the shared HTTP client with default settings
///
/// This client uses connection pooling and reasonable timeouts.
/// Prefer this over creating new clients for better performance.
pub fn shared_client() -> &'static Client {
    SHARED_CLIENT.get_or_init(|| {
        ClientBuilder::new()
            .timeout(Duration::from_secs(30))
            .connect_timeout(Duration::from_secs(10))
            .build()
            .unwrap_or_else(|_| Client::new())
    })
}

/// Create a new HTTP client with custom timeout settings
///
/// Use this when you need specific timeout configurations that differ
/// from the shared client defaults, e.g. credential validation probes.
#[must_use]
pub fn create_client_with_timeout(timeout_secs: u64, connect_timeout_secs: u64) -> Client {
    ClientBuilder::new()
        .timeout(Duration::from_secs(timeout_secs))
        .connect_timeout(Duration::from_secs(connect_timeout_secs))
        .build()
        .unwrap_or_else(|_| Client::new())
}
