// ABOUTME: Configuration modules for the gateway
// ABOUTME: Environment-only configuration, no file-based config layer

//! Configuration

/// Environment variable driven server configuration
pub mod environment;

pub use environment::ServerConfig;
