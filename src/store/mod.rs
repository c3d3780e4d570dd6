// ABOUTME: File-backed credential storage with per-store mutual exclusion
// ABOUTME: One JSON document per provider plus a single-use OAuth state nonce file

//! # Credential Store
//!
//! Each provider persists exactly one credential record as a JSON document
//! under the gateway's dot directory. A store owns its path and an async
//! mutex guarding the load/mutate/save sequence within this process; it makes
//! no cross-process guarantees, which is acceptable for a single local
//! installation. Stores are constructed explicitly and injected into clients
//! so tests can point them at temporary directories.

use crate::constants::storage;
use crate::errors::{AppError, AppResult};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::path::{Path, PathBuf};
use tokio::sync::Mutex;
use tracing::{error, warn};

/// Resolve the default base directory (`~/.pulse-gateway`) for persisted state
///
/// # Errors
/// Returns an error if the user's home directory cannot be determined.
pub fn default_base_dir() -> AppResult<PathBuf> {
    dirs::home_dir()
        .map(|home| home.join(storage::BASE_DIR))
        .ok_or_else(|| AppError::configuration("Could not determine home directory"))
}

/// A single JSON document on disk, guarded by an async mutex
pub struct JsonFileStore {
    path: PathBuf,
    lock: Mutex<()>,
}

impl JsonFileStore {
    /// Create a store for the document at `path`
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    /// Path of the backing file
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the stored record, if any
    ///
    /// A missing file yields `None`. A corrupt or unreadable file is logged
    /// and treated as absent rather than failing the caller.
    pub async fn load<T: DeserializeOwned>(&self) -> Option<T> {
        let _guard = self.lock.lock().await;
        match tokio::fs::read(&self.path).await {
            Ok(bytes) => match serde_json::from_slice(&bytes) {
                Ok(value) => Some(value),
                Err(e) => {
                    error!("Failed to parse {}: {e}", self.path.display());
                    None
                }
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => None,
            Err(e) => {
                error!("Failed to read {}: {e}", self.path.display());
                None
            }
        }
    }

    /// Persist a record, replacing any prior one
    ///
    /// # Errors
    /// Returns an error if the directory cannot be created or the write fails.
    pub async fn save<T: Serialize>(&self, record: &T) -> AppResult<()> {
        let _guard = self.lock.lock().await;
        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent).await.map_err(|e| {
                AppError::internal(format!(
                    "Failed to create {}: {e}",
                    parent.display()
                ))
            })?;
        }
        let body = serde_json::to_vec_pretty(record)
            .map_err(|e| AppError::internal(format!("Failed to encode record: {e}")))?;
        tokio::fs::write(&self.path, body).await.map_err(|e| {
            AppError::internal(format!("Failed to write {}: {e}", self.path.display()))
        })
    }

    /// Delete the stored record; deleting an absent record is not an error
    pub async fn clear(&self) {
        let _guard = self.lock.lock().await;
        match tokio::fs::remove_file(&self.path).await {
            Ok(()) => {}
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => error!("Failed to clear {}: {e}", self.path.display()),
        }
    }

    /// Whether a record currently exists on disk
    pub async fn exists(&self) -> bool {
        let _guard = self.lock.lock().await;
        self.path.exists()
    }
}

/// Single-use OAuth state nonce persisted as a plain text file
///
/// The nonce is written when an authorization redirect is issued and consumed
/// (read-then-delete) exactly once when the callback arrives. After a consume
/// attempt the file is gone regardless of match outcome, so a replayed state
/// can never validate.
pub struct StateFile {
    path: PathBuf,
    lock: Mutex<()>,
}

impl StateFile {
    /// Create a state file handle at `path`
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    /// Store a freshly issued nonce, replacing any prior one
    ///
    /// # Errors
    /// Returns an error if the directory cannot be created or the write fails.
    pub async fn issue(&self, state: &str) -> AppResult<()> {
        let _guard = self.lock.lock().await;
        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent).await.map_err(|e| {
                AppError::internal(format!(
                    "Failed to create {}: {e}",
                    parent.display()
                ))
            })?;
        }
        tokio::fs::write(&self.path, state).await.map_err(|e| {
            AppError::internal(format!("Failed to write {}: {e}", self.path.display()))
        })
    }

    /// Validate a presented state against the stored nonce, consuming it
    ///
    /// Returns `true` only if a nonce was stored and matches exactly. The
    /// stored nonce is removed before comparison, so each issued nonce
    /// validates at most once.
    pub async fn consume(&self, presented: &str) -> bool {
        let _guard = self.lock.lock().await;
        let stored = match tokio::fs::read_to_string(&self.path).await {
            Ok(contents) => contents,
            Err(e) => {
                warn!("OAuth state file not readable: {e}");
                return false;
            }
        };

        // Remove before comparing: a failed match must still burn the nonce
        if let Err(e) = tokio::fs::remove_file(&self.path).await {
            error!("Failed to remove consumed OAuth state: {e}");
        }

        stored.trim() == presented
    }
}

/// Paths of every document the gateway persists
pub struct StorePaths {
    base: PathBuf,
}

impl StorePaths {
    /// Store paths rooted at the default base directory
    ///
    /// # Errors
    /// Returns an error if the home directory cannot be determined.
    pub fn from_home() -> AppResult<Self> {
        Ok(Self::new(default_base_dir()?))
    }

    /// Store paths rooted at an explicit directory (tests use a tempdir)
    #[must_use]
    pub fn new(base: impl Into<PathBuf>) -> Self {
        Self { base: base.into() }
    }

    /// Hevy API key store
    #[must_use]
    pub fn hevy_key(&self) -> JsonFileStore {
        JsonFileStore::new(self.base.join(storage::HEVY_KEY_FILE))
    }

    /// WHOOP token store
    #[must_use]
    pub fn whoop_token(&self) -> JsonFileStore {
        JsonFileStore::new(self.base.join(storage::WHOOP_TOKEN_FILE))
    }

    /// WHOOP OAuth state nonce file
    #[must_use]
    pub fn whoop_state(&self) -> StateFile {
        StateFile::new(self.base.join(storage::WHOOP_STATE_FILE))
    }

    /// Twilio SMS configuration store
    #[must_use]
    pub fn sms_config(&self) -> JsonFileStore {
        JsonFileStore::new(self.base.join(storage::SMS_CONFIG_FILE))
    }
}
