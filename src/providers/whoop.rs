// ABOUTME: WHOOP API client: OAuth2 token lifecycle and recovery/sleep/strain data fetching
// ABOUTME: Owns the token record, the 5-minute proactive refresh margin, and the CSRF state nonce

//! # WHOOP Provider Client
//!
//! Implements the OAuth2 authorization-code + refresh-token flow against the
//! WHOOP token endpoint and forwards data requests to the developer API.
//! The persisted token record moves through `absent → valid → expiring-soon →
//! refreshed | invalid (cleared)`; a read within five minutes of expiry
//! triggers exactly one refresh attempt before a value is returned.

use crate::constants::{defaults, endpoints, oauth, providers};
use crate::errors::{AppError, AppResult};
use crate::providers::core::DateRange;
use crate::store::{JsonFileStore, StateFile};
use crate::utils::http_client::shared_client;
use chrono::{DateTime, Duration, Utc};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{error, info, warn};
use url::Url;
use uuid::Uuid;

/// WHOOP endpoint configuration, injectable for tests
#[derive(Debug, Clone)]
pub struct WhoopConfig {
    /// OAuth authorization URL users are redirected to
    pub auth_url: String,
    /// OAuth token exchange/refresh URL
    pub token_url: String,
    /// Developer API base URL
    pub api_base_url: String,
    /// OAuth client id
    pub client_id: Option<String>,
    /// OAuth client secret
    pub client_secret: Option<String>,
    /// Redirect URI presented during authorization
    pub redirect_uri: Option<String>,
}

impl WhoopConfig {
    /// Production endpoints with the given client credentials
    #[must_use]
    pub fn new(
        client_id: Option<String>,
        client_secret: Option<String>,
        redirect_uri: Option<String>,
    ) -> Self {
        Self {
            auth_url: endpoints::WHOOP_AUTH_URL.to_owned(),
            token_url: endpoints::WHOOP_TOKEN_URL.to_owned(),
            api_base_url: endpoints::WHOOP_API_BASE.to_owned(),
            client_id,
            client_secret,
            redirect_uri,
        }
    }

    fn client_credentials(&self) -> AppResult<(&str, &str)> {
        match (self.client_id.as_deref(), self.client_secret.as_deref()) {
            (Some(id), Some(secret)) => Ok((id, secret)),
            _ => Err(AppError::configuration(
                "Whoop client credentials not configured",
            )),
        }
    }
}

/// Persisted OAuth token record
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TokenRecord {
    /// Bearer token presented to the developer API
    pub access_token: String,
    /// Token used to obtain a fresh access token
    pub refresh_token: Option<String>,
    /// Absolute UTC expiry computed at issue time as `now + expires_in`
    pub expires_at: DateTime<Utc>,
}

impl TokenRecord {
    /// Whether the token is expired or within the proactive refresh margin
    #[must_use]
    pub fn is_expiring_soon(&self, now: DateTime<Utc>) -> bool {
        now + Duration::seconds(defaults::TOKEN_REFRESH_MARGIN_SECS) >= self.expires_at
    }
}

/// Token endpoint response body
#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    refresh_token: Option<String>,
    expires_in: Option<i64>,
}

impl TokenResponse {
    /// Build the persisted record, preserving a prior refresh token when the
    /// response omits one
    fn into_record(self, prior_refresh: Option<String>) -> TokenRecord {
        let expires_in = self.expires_in.unwrap_or(defaults::TOKEN_EXPIRES_IN_SECS);
        TokenRecord {
            access_token: self.access_token,
            refresh_token: self.refresh_token.or(prior_refresh),
            expires_at: Utc::now() + Duration::seconds(expires_in),
        }
    }
}

/// WHOOP provider client
pub struct WhoopClient {
    config: WhoopConfig,
    token_store: JsonFileStore,
    state_file: StateFile,
    client: Client,
}

impl WhoopClient {
    /// Create a client over the given stores
    #[must_use]
    pub fn new(config: WhoopConfig, token_store: JsonFileStore, state_file: StateFile) -> Self {
        Self {
            config,
            token_store,
            state_file,
            client: shared_client().clone(),
        }
    }

    /// Build the authorization redirect URL, issuing and storing a state nonce
    ///
    /// # Errors
    /// Returns `ConfigurationError` if client credentials or the redirect URI
    /// are missing, or an internal error if the nonce cannot be persisted.
    pub async fn authorization_url(&self) -> AppResult<String> {
        let client_id = self
            .config
            .client_id
            .as_deref()
            .ok_or_else(|| AppError::configuration("Whoop client credentials not configured"))?;
        let redirect_uri = self
            .config
            .redirect_uri
            .as_deref()
            .ok_or_else(|| AppError::configuration("Whoop redirect URI not configured"))?;

        let state = Uuid::new_v4().to_string();
        self.state_file.issue(&state).await?;

        let url = Url::parse_with_params(
            &self.config.auth_url,
            &[
                ("client_id", client_id),
                ("redirect_uri", redirect_uri),
                ("response_type", "code"),
                ("scope", oauth::WHOOP_DEFAULT_SCOPES),
                ("state", state.as_str()),
            ],
        )
        .map_err(|e| AppError::internal(format!("Failed to build authorization URL: {e}")))?;

        Ok(url.into())
    }

    /// Exchange an authorization code for a token record (the callback leg)
    ///
    /// The presented state must match the stored nonce exactly; the nonce is
    /// consumed either way, so a replayed callback can never validate.
    ///
    /// # Errors
    /// `CsrfStateMismatch` on state failure, `ConfigurationError` when client
    /// credentials are missing, `UpstreamError`/`InternalError` on exchange
    /// failure.
    pub async fn exchange_code(&self, code: &str, state: &str) -> AppResult<()> {
        if !self.state_file.consume(state).await {
            return Err(AppError::csrf_state_mismatch());
        }

        let (client_id, client_secret) = self.config.client_credentials()?;
        let redirect_uri = self.config.redirect_uri.as_deref().unwrap_or_default();

        let params = [
            ("grant_type", "authorization_code"),
            ("code", code),
            ("client_id", client_id),
            ("client_secret", client_secret),
            ("redirect_uri", redirect_uri),
        ];

        let response = self
            .client
            .post(&self.config.token_url)
            .form(&params)
            .send()
            .await
            .map_err(|e| AppError::internal(format!("Failed to reach token endpoint: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::upstream(providers::WHOOP, status.as_u16(), body));
        }

        let token: TokenResponse = response
            .json()
            .await
            .map_err(|e| AppError::internal(format!("Failed to parse token response: {e}")))?;

        self.token_store.save(&token.into_record(None)).await?;
        info!("Successfully connected Whoop account");
        Ok(())
    }

    /// Refresh the stored token record
    ///
    /// Any failure (missing refresh token, missing client credentials,
    /// transport error, non-2xx) yields `None`; the caller treats that
    /// identically to "not connected".
    async fn refresh(&self, record: TokenRecord) -> Option<TokenRecord> {
        let refresh_token = record.refresh_token.clone()?;

        let Ok((client_id, client_secret)) = self.config.client_credentials() else {
            error!("Whoop client credentials not configured");
            return None;
        };

        let params = [
            ("grant_type", "refresh_token"),
            ("refresh_token", &refresh_token),
            ("client_id", client_id),
            ("client_secret", client_secret),
        ];

        let response = match self
            .client
            .post(&self.config.token_url)
            .form(&params)
            .send()
            .await
        {
            Ok(response) => response,
            Err(e) => {
                error!("Failed to refresh Whoop token: {e}");
                return None;
            }
        };

        if !response.status().is_success() {
            error!(
                "Whoop token refresh failed with status {}",
                response.status()
            );
            return None;
        }

        let token: TokenResponse = match response.json().await {
            Ok(token) => token,
            Err(e) => {
                error!("Failed to parse Whoop refresh response: {e}");
                return None;
            }
        };

        let refreshed = token.into_record(record.refresh_token);
        if let Err(e) = self.token_store.save(&refreshed).await {
            error!("Failed to persist refreshed Whoop token: {e}");
            return None;
        }

        info!("Successfully refreshed Whoop access token");
        Some(refreshed)
    }

    /// Get a valid access token, refreshing when expiring soon
    ///
    /// `None` means not connected (no record, or refresh failed).
    pub async fn valid_access_token(&self) -> Option<String> {
        let record: TokenRecord = self.token_store.load().await?;

        if record.is_expiring_soon(Utc::now()) {
            return self.refresh(record).await.map(|r| r.access_token);
        }

        Some(record.access_token)
    }

    /// Whether a usable token exists (refreshing if needed)
    pub async fn is_connected(&self) -> bool {
        self.valid_access_token().await.is_some()
    }

    /// Delete the persisted token record; idempotent
    pub async fn disconnect(&self) {
        self.token_store.clear().await;
        info!("Whoop account disconnected");
    }

    /// Make an authenticated GET against the developer API
    ///
    /// A 401 invalidates the local record before surfacing `Unauthenticated`;
    /// no retry is attempted within the same call.
    async fn api_request(&self, endpoint: &str, query: &[(&str, String)]) -> AppResult<Value> {
        let access_token = self.valid_access_token().await.ok_or_else(|| {
            AppError::unauthenticated("Whoop not connected. Please connect your Whoop account first.")
        })?;

        let url = format!(
            "{}/{}",
            self.config.api_base_url.trim_end_matches('/'),
            endpoint
        );

        let response = self
            .client
            .get(&url)
            .bearer_auth(&access_token)
            .header("Accept", "application/json")
            .query(query)
            .send()
            .await
            .map_err(|e| AppError::internal(format!("Failed to fetch Whoop data: {e}")))?;

        let status = response.status();
        if status.as_u16() == 401 {
            warn!("Whoop API returned 401 - clearing stored token");
            self.token_store.clear().await;
            return Err(AppError::unauthenticated(
                "Whoop authentication expired. Please reconnect.",
            ));
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::upstream(providers::WHOOP, status.as_u16(), body));
        }

        response
            .json()
            .await
            .map_err(|e| AppError::internal(format!("Failed to parse Whoop response: {e}")))
    }

    /// Fetch recovery scores for the given range
    ///
    /// # Errors
    /// See [`Self::api_request`].
    pub async fn get_recovery(&self, range: &DateRange) -> AppResult<Value> {
        self.api_request("recovery", &range.query_pairs()).await
    }

    /// Fetch sleep activity for the given range
    ///
    /// # Errors
    /// See [`Self::api_request`].
    pub async fn get_sleep(&self, range: &DateRange) -> AppResult<Value> {
        self.api_request("activity/sleep", &range.query_pairs())
            .await
    }

    /// Fetch day strain (cycle scores) for the given range
    ///
    /// # Errors
    /// See [`Self::api_request`].
    pub async fn get_strain(&self, range: &DateRange) -> AppResult<Value> {
        self.api_request("cycle", &range.query_pairs()).await
    }

    /// Fetch workout activity for the given range
    ///
    /// # Errors
    /// See [`Self::api_request`].
    pub async fn get_workouts(&self, range: &DateRange) -> AppResult<Value> {
        self.api_request("activity/workout", &range.query_pairs())
            .await
    }

    /// Fetch full physiological cycles for the given range
    ///
    /// # Errors
    /// See [`Self::api_request`].
    pub async fn get_cycles(&self, range: &DateRange) -> AppResult<Value> {
        self.api_request("cycle", &range.query_pairs()).await
    }
}
