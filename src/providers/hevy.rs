// ABOUTME: Hevy API client: API-key credential handling and workout/routine operations
// ABOUTME: Resolves the key file-first with environment fallback; validates keys via a probe request

//! # Hevy Provider Client
//!
//! Hevy authenticates with a single opaque API key. A user-supplied key is
//! validated by a lightweight probe request before it is persisted; a key
//! sourced from the environment is pre-trusted and skipped from re-validation
//! on status checks.

use crate::constants::{defaults, endpoints, providers};
use crate::errors::{AppError, AppResult};
use crate::store::JsonFileStore;
use crate::utils::http_client::{create_client_with_timeout, shared_client};
use reqwest::{Client, Method};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{info, warn};

/// Hevy endpoint configuration, injectable for tests
#[derive(Debug, Clone)]
pub struct HevyConfig {
    /// REST API base URL
    pub api_base_url: String,
    /// Pre-trusted key supplied via the environment
    pub env_api_key: Option<String>,
}

impl HevyConfig {
    /// Production endpoints with an optional environment key
    #[must_use]
    pub fn new(env_api_key: Option<String>) -> Self {
        Self {
            api_base_url: endpoints::HEVY_API_BASE.to_owned(),
            env_api_key,
        }
    }
}

/// Persisted API key document
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ApiKeyRecord {
    /// The opaque key string
    pub api_key: String,
}

/// Where the active key came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeySource {
    /// Persisted by the user through `/hevy/connect`
    Stored,
    /// Supplied through the process environment, pre-trusted
    Environment,
}

impl KeySource {
    /// Label used in status responses
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Stored => "validated",
            Self::Environment => "environment",
        }
    }
}

/// Hevy provider client
pub struct HevyClient {
    config: HevyConfig,
    key_store: JsonFileStore,
    client: Client,
    probe_client: Client,
}

impl HevyClient {
    /// Create a client over the given key store
    #[must_use]
    pub fn new(config: HevyConfig, key_store: JsonFileStore) -> Self {
        Self {
            config,
            key_store,
            client: shared_client().clone(),
            probe_client: create_client_with_timeout(defaults::PROBE_TIMEOUT_SECS, 2),
        }
    }

    /// Resolve the active key: stored file value first, then environment
    pub async fn resolve_api_key(&self) -> Option<(String, KeySource)> {
        if let Some(record) = self.key_store.load::<ApiKeyRecord>().await {
            return Some((record.api_key, KeySource::Stored));
        }
        self.config
            .env_api_key
            .clone()
            .map(|key| (key, KeySource::Environment))
    }

    /// Issue the lightweight read-only probe used to validate a key
    async fn probe(&self, api_key: &str) -> AppResult<()> {
        let url = format!("{}/workouts", self.config.api_base_url.trim_end_matches('/'));
        let response = self
            .probe_client
            .get(&url)
            .header("api-key", api_key)
            .header("Accept", "application/json")
            .query(&[("page", "1"), ("pageSize", "1")])
            .send()
            .await
            .map_err(|e| AppError::internal(format!("Failed to reach Hevy API: {e}")))?;

        let status = response.status();
        if status.as_u16() == 401 {
            return Err(AppError::invalid_credential(
                "Invalid Hevy API key. Please check your API key and try again.",
            ));
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::upstream(providers::HEVY, status.as_u16(), body));
        }
        Ok(())
    }

    /// Validate and persist a user-supplied API key
    ///
    /// # Errors
    /// `InvalidCredential` when the key is empty or the provider rejects it;
    /// `UpstreamError`/`InternalError` on other probe failures.
    pub async fn connect(&self, api_key: &str) -> AppResult<()> {
        let api_key = api_key.trim();
        if api_key.is_empty() {
            return Err(AppError::invalid_credential("API key cannot be empty"));
        }

        self.probe(api_key).await?;

        self.key_store
            .save(&ApiKeyRecord {
                api_key: api_key.to_owned(),
            })
            .await?;
        info!("Successfully saved Hevy API key");
        Ok(())
    }

    /// Connection status: whether a key resolves and, for stored keys, whether
    /// it still passes the probe
    pub async fn status(&self) -> Option<KeySource> {
        let (api_key, source) = self.resolve_api_key().await?;

        // Environment keys are pre-trusted; only user-supplied keys re-validate
        if source == KeySource::Environment {
            return Some(source);
        }

        match self.probe(&api_key).await {
            Ok(()) => Some(source),
            Err(e) => {
                warn!("Hevy API key validation failed: {e}");
                None
            }
        }
    }

    /// Delete the persisted key; idempotent
    pub async fn disconnect(&self) {
        self.key_store.clear().await;
        info!("Hevy API key cleared");
    }

    /// Make an authenticated request against the Hevy API
    ///
    /// A 401 clears the stored file key (an environment key is left alone)
    /// before surfacing `Unauthenticated`.
    async fn api_request(
        &self,
        method: Method,
        endpoint: &str,
        query: &[(&str, String)],
        body: Option<&Value>,
    ) -> AppResult<Value> {
        let (api_key, source) = self.resolve_api_key().await.ok_or_else(|| {
            AppError::unauthenticated("Hevy not connected. Please add your Hevy API key first.")
        })?;

        let url = format!(
            "{}/{}",
            self.config.api_base_url.trim_end_matches('/'),
            endpoint
        );

        let mut request = self
            .client
            .request(method, &url)
            .header("api-key", api_key)
            .header("Accept", "application/json")
            .query(query);
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request
            .send()
            .await
            .map_err(|e| AppError::internal(format!("Failed to fetch Hevy data: {e}")))?;

        let status = response.status();
        if status.as_u16() == 401 {
            if source == KeySource::Stored {
                warn!("Hevy API returned 401 - clearing stored key");
                self.key_store.clear().await;
            }
            return Err(AppError::unauthenticated(
                "Hevy API key is invalid. Please update your API key.",
            ));
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::upstream(providers::HEVY, status.as_u16(), body));
        }

        response
            .json()
            .await
            .map_err(|e| AppError::internal(format!("Failed to parse Hevy response: {e}")))
    }

    /// Fetch workout history, optionally filtered by date
    ///
    /// # Errors
    /// See [`Self::api_request`].
    pub async fn get_workouts(
        &self,
        page: u32,
        page_size: u32,
        start_date: Option<&str>,
        end_date: Option<&str>,
    ) -> AppResult<Value> {
        let mut query = vec![
            ("page", page.to_string()),
            ("pageSize", page_size.to_string()),
        ];
        if let Some(start) = start_date {
            query.push(("start_date", start.to_owned()));
        }
        if let Some(end) = end_date {
            query.push(("end_date", end.to_owned()));
        }
        self.api_request(Method::GET, "workouts", &query, None).await
    }

    /// Fetch details for one workout
    ///
    /// # Errors
    /// See [`Self::api_request`].
    pub async fn get_workout_details(&self, workout_id: &str) -> AppResult<Value> {
        self.api_request(Method::GET, &format!("workouts/{workout_id}"), &[], None)
            .await
    }

    /// Fetch saved routines
    ///
    /// # Errors
    /// See [`Self::api_request`].
    pub async fn get_routines(&self, page: u32, page_size: u32) -> AppResult<Value> {
        let query = vec![
            ("page", page.to_string()),
            ("pageSize", page_size.to_string()),
        ];
        self.api_request(Method::GET, "routines", &query, None).await
    }

    /// Fetch details for one routine
    ///
    /// # Errors
    /// See [`Self::api_request`].
    pub async fn get_routine_details(&self, routine_id: &str) -> AppResult<Value> {
        self.api_request(Method::GET, &format!("routines/{routine_id}"), &[], None)
            .await
    }

    /// Create a new routine
    ///
    /// The request body is wrapped in a `routine` object as the Hevy API
    /// requires; a null `folder_id` selects the default "My Routines" folder.
    ///
    /// # Errors
    /// See [`Self::api_request`].
    pub async fn create_routine(
        &self,
        title: &str,
        exercises: Value,
        folder_id: Option<&str>,
    ) -> AppResult<Value> {
        let body = serde_json::json!({
            "routine": {
                "title": title,
                "exercises": exercises,
                "folder_id": folder_id,
            }
        });
        self.api_request(Method::POST, "routines", &[], Some(&body))
            .await
    }

    /// Log a completed workout
    ///
    /// # Errors
    /// See [`Self::api_request`].
    pub async fn log_workout(&self, workout: &Value) -> AppResult<Value> {
        self.api_request(Method::POST, "workouts", &[], Some(workout))
            .await
    }
}
