// ABOUTME: Twilio REST client: outbound message sends and credential/number validation
// ABOUTME: Environment-supplied credentials take precedence over the stored configuration

//! # Twilio SMS Client
//!
//! Thin wrapper over the Twilio REST API. Credentials resolve environment
//! first, then the stored configuration document. Outbound sends never raise
//! past this boundary; they return a [`SendOutcome`] record either way.

use crate::constants::{endpoints, providers};
use crate::errors::{AppError, AppResult};
use crate::store::JsonFileStore;
use crate::utils::http_client::shared_client;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{error, info, warn};

/// Twilio endpoint configuration, injectable for tests
#[derive(Debug, Clone)]
pub struct TwilioConfig {
    /// REST API base URL
    pub api_base_url: String,
    /// Account SID supplied via the environment
    pub env_account_sid: Option<String>,
    /// Auth token supplied via the environment
    pub env_auth_token: Option<String>,
    /// Sender number supplied via the environment
    pub env_phone_number: Option<String>,
}

impl TwilioConfig {
    /// Production endpoints with optional environment credentials
    #[must_use]
    pub fn new(
        env_account_sid: Option<String>,
        env_auth_token: Option<String>,
        env_phone_number: Option<String>,
    ) -> Self {
        Self {
            api_base_url: endpoints::TWILIO_API_BASE.to_owned(),
            env_account_sid,
            env_auth_token,
            env_phone_number,
        }
    }
}

/// Persisted SMS configuration document
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct SmsConfigRecord {
    /// Twilio account SID
    pub account_sid: String,
    /// Twilio auth token
    pub auth_token: String,
    /// Sender phone number in E.164 format
    pub phone_number: String,
}

/// Where active credentials came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CredentialSource {
    /// Supplied through the process environment
    Environment,
    /// Persisted by the user through `/sms/connect`
    Stored,
}

impl CredentialSource {
    /// Label used in status responses
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Environment => "environment",
            Self::Stored => "stored",
        }
    }
}

/// Result record of an outbound send; this boundary never raises
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SendOutcome {
    /// Whether the provider accepted the message
    pub success: bool,
    /// Provider message SID on success
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sid: Option<String>,
    /// Provider delivery status on success
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    /// Recipient number on success
    #[serde(skip_serializing_if = "Option::is_none")]
    pub to: Option<String>,
    /// Failure description
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl SendOutcome {
    fn sent(sid: String, status: String, to: String) -> Self {
        Self {
            success: true,
            sid: Some(sid),
            status: Some(status),
            to: Some(to),
            error: None,
        }
    }

    fn failed(error: impl Into<String>) -> Self {
        Self {
            success: false,
            sid: None,
            status: None,
            to: None,
            error: Some(error.into()),
        }
    }
}

/// Message-create response fields we surface
#[derive(Debug, Deserialize)]
struct MessageResource {
    sid: String,
    status: String,
}

/// Connection status report
#[derive(Debug, Clone, Serialize)]
pub struct SmsStatus {
    /// Whether credentials resolved and verified
    pub connected: bool,
    /// Sender number when connected
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone_number: Option<String>,
    /// `"environment"` or `"stored"` when connected
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<&'static str>,
    /// Failure description when verification failed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Twilio SMS client
pub struct TwilioClient {
    config: TwilioConfig,
    config_store: JsonFileStore,
    client: Client,
}

impl TwilioClient {
    /// Create a client over the given configuration store
    #[must_use]
    pub fn new(config: TwilioConfig, config_store: JsonFileStore) -> Self {
        Self {
            config,
            config_store,
            client: shared_client().clone(),
        }
    }

    /// Resolve active credentials: environment first, then stored config
    async fn resolve_credentials(&self) -> Option<(String, String, CredentialSource)> {
        let stored: Option<SmsConfigRecord> = self.config_store.load().await;

        let sid = self
            .config
            .env_account_sid
            .clone()
            .or_else(|| stored.as_ref().map(|c| c.account_sid.clone()))?;
        let token = self
            .config
            .env_auth_token
            .clone()
            .or_else(|| stored.as_ref().map(|c| c.auth_token.clone()))?;

        let source = if self.config.env_account_sid.is_some() {
            CredentialSource::Environment
        } else {
            CredentialSource::Stored
        };
        Some((sid, token, source))
    }

    /// Resolve the sender number: environment first, then stored config
    async fn resolve_phone_number(&self) -> Option<String> {
        if let Some(number) = self.config.env_phone_number.clone() {
            return Some(number);
        }
        self.config_store
            .load::<SmsConfigRecord>()
            .await
            .map(|c| c.phone_number)
    }

    /// Fetch account details to verify a credential pair
    async fn fetch_account(&self, sid: &str, token: &str) -> AppResult<Value> {
        let url = format!(
            "{}/2010-04-01/Accounts/{sid}.json",
            self.config.api_base_url.trim_end_matches('/')
        );
        let response = self
            .client
            .get(&url)
            .basic_auth(sid, Some(token))
            .send()
            .await
            .map_err(|e| AppError::internal(format!("Failed to reach Twilio: {e}")))?;

        let status = response.status();
        if status.as_u16() == 401 {
            return Err(AppError::invalid_credential(
                "Twilio rejected the supplied credentials",
            ));
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::upstream(providers::TWILIO, status.as_u16(), body));
        }

        response
            .json()
            .await
            .map_err(|e| AppError::internal(format!("Failed to parse Twilio response: {e}")))
    }

    /// Check whether a phone number appears in the account's incoming list
    async fn number_in_account(&self, sid: &str, token: &str, number: &str) -> AppResult<bool> {
        let url = format!(
            "{}/2010-04-01/Accounts/{sid}/IncomingPhoneNumbers.json",
            self.config.api_base_url.trim_end_matches('/')
        );
        let response = self
            .client
            .get(&url)
            .basic_auth(sid, Some(token))
            .query(&[("PhoneNumber", number)])
            .send()
            .await
            .map_err(|e| AppError::internal(format!("Failed to reach Twilio: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::upstream(providers::TWILIO, status.as_u16(), body));
        }

        let body: Value = response
            .json()
            .await
            .map_err(|e| AppError::internal(format!("Failed to parse Twilio response: {e}")))?;
        let count = body
            .get("incoming_phone_numbers")
            .and_then(Value::as_array)
            .map_or(0, Vec::len);
        Ok(count > 0)
    }

    /// Validate supplied credentials and persist the configuration
    ///
    /// The account fetch is a hard requirement. The incoming-number listing is
    /// a hard failure only when it succeeds and omits the claimed number; an
    /// error from that specific verification call is a logged warning.
    ///
    /// # Errors
    /// `InvalidCredential` when Twilio rejects the pair, `InvalidCredential`
    /// when the number is absent from the account, or transport errors.
    pub async fn connect(
        &self,
        account_sid: &str,
        auth_token: &str,
        phone_number: &str,
    ) -> AppResult<()> {
        self.fetch_account(account_sid, auth_token).await?;

        match self
            .number_in_account(account_sid, auth_token, phone_number)
            .await
        {
            Ok(true) => {}
            Ok(false) => {
                return Err(AppError::invalid_credential(
                    "Phone number not found in your Twilio account",
                ));
            }
            Err(e) => {
                warn!("Could not verify phone number: {e}");
            }
        }

        self.config_store
            .save(&SmsConfigRecord {
                account_sid: account_sid.to_owned(),
                auth_token: auth_token.to_owned(),
                phone_number: phone_number.to_owned(),
            })
            .await?;
        info!("SMS connected successfully");
        Ok(())
    }

    /// Connection status, verifying resolvable credentials against Twilio
    pub async fn status(&self) -> SmsStatus {
        let Some((sid, token, source)) = self.resolve_credentials().await else {
            return SmsStatus {
                connected: false,
                phone_number: None,
                source: None,
                error: None,
            };
        };

        match self.fetch_account(&sid, &token).await {
            Ok(_) => SmsStatus {
                connected: true,
                phone_number: self.resolve_phone_number().await,
                source: Some(source.as_str()),
                error: None,
            },
            Err(e) => {
                error!("Twilio connection failed: {e}");
                SmsStatus {
                    connected: false,
                    phone_number: None,
                    source: None,
                    error: Some("Invalid credentials or connection error".to_owned()),
                }
            }
        }
    }

    /// Delete the stored configuration; idempotent
    pub async fn disconnect(&self) {
        self.config_store.clear().await;
        info!("SMS disconnected");
    }

    /// Send an outbound message
    ///
    /// Missing sender number, missing credentials, and provider failures all
    /// produce a `success: false` outcome; nothing raises past this boundary.
    pub async fn send(&self, to: &str, message: &str) -> SendOutcome {
        let Some(from) = self.resolve_phone_number().await else {
            error!("Twilio phone number not configured");
            return SendOutcome::failed("Twilio phone number not configured");
        };
        let Some((sid, token, _)) = self.resolve_credentials().await else {
            error!("Twilio credentials not configured");
            return SendOutcome::failed("Twilio credentials not configured");
        };

        let url = format!(
            "{}/2010-04-01/Accounts/{sid}/Messages.json",
            self.config.api_base_url.trim_end_matches('/')
        );
        let params = [("To", to), ("From", &from), ("Body", message)];

        let response = match self
            .client
            .post(&url)
            .basic_auth(&sid, Some(&token))
            .form(&params)
            .send()
            .await
        {
            Ok(response) => response,
            Err(e) => {
                error!("Failed to send SMS to {to}: {e}");
                return SendOutcome::failed(e.to_string());
            }
        };

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            error!("Twilio rejected SMS to {to}: status {status}");
            return SendOutcome::failed(format!("Twilio error {status}: {body}"));
        }

        match response.json::<MessageResource>().await {
            Ok(resource) => {
                info!("SMS sent to {to} (sid {})", resource.sid);
                SendOutcome::sent(resource.sid, resource.status, to.to_owned())
            }
            Err(e) => {
                error!("Failed to parse Twilio send response: {e}");
                SendOutcome::failed(e.to_string())
            }
        }
    }
}
