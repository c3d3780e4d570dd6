// ABOUTME: Environment configuration management for deployment-specific settings
// ABOUTME: Reads provider credentials and the HTTP port from process environment variables

//! Environment-based configuration

use crate::constants::{defaults, env_config};
use anyhow::{Context, Result};
use std::env;

/// WHOOP OAuth application settings
#[derive(Debug, Clone, Default)]
pub struct WhoopSettings {
    /// OAuth client id
    pub client_id: Option<String>,
    /// OAuth client secret
    pub client_secret: Option<String>,
    /// Redirect URI presented during authorization
    pub redirect_uri: Option<String>,
}

/// Hevy settings
#[derive(Debug, Clone, Default)]
pub struct HevySettings {
    /// Pre-trusted API key fallback
    pub api_key: Option<String>,
}

/// Twilio settings; environment values take precedence over stored config
#[derive(Debug, Clone, Default)]
pub struct TwilioSettings {
    /// Account SID
    pub account_sid: Option<String>,
    /// Auth token
    pub auth_token: Option<String>,
    /// Sender phone number
    pub phone_number: Option<String>,
}

/// Complete server configuration resolved from the environment
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// HTTP listen port
    pub http_port: u16,
    /// WHOOP OAuth settings
    pub whoop: WhoopSettings,
    /// Hevy settings
    pub hevy: HevySettings,
    /// Twilio settings
    pub twilio: TwilioSettings,
}

impl ServerConfig {
    /// Load configuration from environment variables
    ///
    /// # Errors
    /// Returns an error when `HTTP_PORT` is present but not a valid port.
    pub fn from_env() -> Result<Self> {
        let http_port = match env::var(env_config::HTTP_PORT) {
            Ok(raw) => raw
                .parse()
                .with_context(|| format!("Invalid {}: {raw}", env_config::HTTP_PORT))?,
            Err(_) => defaults::HTTP_PORT,
        };

        Ok(Self {
            http_port,
            whoop: WhoopSettings {
                client_id: env::var(env_config::WHOOP_CLIENT_ID).ok(),
                client_secret: env::var(env_config::WHOOP_CLIENT_SECRET).ok(),
                redirect_uri: env::var(env_config::WHOOP_REDIRECT_URI).ok(),
            },
            hevy: HevySettings {
                api_key: env::var(env_config::HEVY_API_KEY).ok(),
            },
            twilio: TwilioSettings {
                account_sid: env::var(env_config::TWILIO_ACCOUNT_SID).ok(),
                auth_token: env::var(env_config::TWILIO_AUTH_TOKEN).ok(),
                phone_number: env::var(env_config::TWILIO_PHONE_NUMBER).ok(),
            },
        })
    }

    /// One-line startup summary; secrets are reported by presence only
    #[must_use]
    pub fn summary(&self) -> String {
        format!(
            "port={} whoop_oauth={} hevy_env_key={} twilio_env_creds={}",
            self.http_port,
            self.whoop.client_id.is_some() && self.whoop.client_secret.is_some(),
            self.hevy.api_key.is_some(),
            self.twilio.account_sid.is_some() && self.twilio.auth_token.is_some(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    #[serial]
    fn test_defaults_when_environment_empty() {
        env::remove_var(env_config::HTTP_PORT);
        env::remove_var(env_config::WHOOP_CLIENT_ID);
        let config = ServerConfig::from_env().unwrap();
        assert_eq!(config.http_port, defaults::HTTP_PORT);
        assert!(config.whoop.client_id.is_none());
    }

    #[test]
    #[serial]
    fn test_invalid_port_rejected() {
        env::set_var(env_config::HTTP_PORT, "not-a-port");
        assert!(ServerConfig::from_env().is_err());
        env::remove_var(env_config::HTTP_PORT);
    }

    #[test]
    #[serial]
    fn test_summary_reports_presence_not_secrets() {
        env::set_var(env_config::HEVY_API_KEY, "super-secret");
        let config = ServerConfig::from_env().unwrap();
        assert!(!config.summary().contains("super-secret"));
        env::remove_var(env_config::HEVY_API_KEY);
    }
}
