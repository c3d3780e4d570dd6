// ABOUTME: Logging configuration and structured logging setup for observability and debugging
// ABOUTME: Configures log level and output format from environment variables

//! Logging configuration with structured output

use anyhow::Result;
use std::env;
use std::io;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Log output format options
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    /// JSON format for production logging
    Json,
    /// Pretty format for development
    Pretty,
    /// Compact format for space-constrained environments
    Compact,
}

/// Logging configuration
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    /// Log level filter directive (`RUST_LOG` syntax)
    pub level: String,
    /// Output format
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".into(),
            format: LogFormat::Pretty,
        }
    }
}

impl LoggingConfig {
    /// Create logging configuration from environment variables
    #[must_use]
    pub fn from_env() -> Self {
        let level = env::var("RUST_LOG").unwrap_or_else(|_| "info".into());
        let format = match env::var("LOG_FORMAT").as_deref() {
            Ok("json") => LogFormat::Json,
            Ok("compact") => LogFormat::Compact,
            _ => LogFormat::Pretty,
        };
        Self { level, format }
    }

    /// Install this configuration as the global subscriber
    ///
    /// # Errors
    /// Returns an error if a global subscriber is already installed.
    pub fn init(&self) -> Result<()> {
        let filter = EnvFilter::try_new(&self.level).unwrap_or_else(|_| EnvFilter::new("info"));
        let registry = tracing_subscriber::registry().with(filter);

        match self.format {
            LogFormat::Json => {
                registry
                    .with(fmt::layer().with_target(true).with_writer(io::stdout).json())
                    .try_init()?;
            }
            LogFormat::Pretty => {
                registry
                    .with(fmt::layer().with_target(true).with_writer(io::stdout))
                    .try_init()?;
            }
            LogFormat::Compact => {
                registry
                    .with(fmt::layer().compact().with_target(false).with_writer(io::stdout))
                    .try_init()?;
            }
        }
        Ok(())
    }
}

/// Initialize logging from environment variables
///
/// # Errors
/// Returns an error if a global subscriber is already installed.
pub fn init_from_env() -> Result<()> {
    LoggingConfig::from_env().init()
}
