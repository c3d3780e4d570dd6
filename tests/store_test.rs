// ABOUTME: Integration tests for the file-backed credential store
// ABOUTME: Covers round-trips, idempotent clears, and single-use OAuth state consumption
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pulse Gateway
#![allow(missing_docs)]

use pulse_gateway::store::{JsonFileStore, StateFile, StorePaths};
use serde::{Deserialize, Serialize};
use tempfile::TempDir;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
struct Record {
    name: String,
    value: u32,
}

#[tokio::test]
async fn test_save_then_load_round_trips() {
    let dir = TempDir::new().unwrap();
    let store = JsonFileStore::new(dir.path().join("record.json"));

    let record = Record {
        name: "hevy".to_owned(),
        value: 42,
    };
    store.save(&record).await.unwrap();

    let loaded: Record = store.load().await.unwrap();
    assert_eq!(loaded, record);
}

#[tokio::test]
async fn test_load_missing_file_yields_none() {
    let dir = TempDir::new().unwrap();
    let store = JsonFileStore::new(dir.path().join("absent.json"));
    assert!(store.load::<Record>().await.is_none());
}

#[tokio::test]
async fn test_corrupt_file_treated_as_absent() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("corrupt.json");
    std::fs::write(&path, "{not json").unwrap();

    let store = JsonFileStore::new(path);
    assert!(store.load::<Record>().await.is_none());
}

#[tokio::test]
async fn test_save_replaces_prior_record() {
    let dir = TempDir::new().unwrap();
    let store = JsonFileStore::new(dir.path().join("record.json"));

    store
        .save(&Record {
            name: "first".to_owned(),
            value: 1,
        })
        .await
        .unwrap();
    store
        .save(&Record {
            name: "second".to_owned(),
            value: 2,
        })
        .await
        .unwrap();

    let loaded: Record = store.load().await.unwrap();
    assert_eq!(loaded.name, "second");
}

#[tokio::test]
async fn test_clear_is_idempotent() {
    let dir = TempDir::new().unwrap();
    let store = JsonFileStore::new(dir.path().join("record.json"));

    store
        .save(&Record {
            name: "gone".to_owned(),
            value: 0,
        })
        .await
        .unwrap();
    assert!(store.exists().await);

    store.clear().await;
    assert!(!store.exists().await);

    // Clearing an absent record is not an error
    store.clear().await;
    assert!(!store.exists().await);
}

#[tokio::test]
async fn test_state_nonce_consumes_exactly_once() {
    let dir = TempDir::new().unwrap();
    let state = StateFile::new(dir.path().join("state.txt"));

    state.issue("nonce-123").await.unwrap();
    assert!(state.consume("nonce-123").await);

    // Already consumed: the same value can never validate again
    assert!(!state.consume("nonce-123").await);
}

#[tokio::test]
async fn test_state_mismatch_still_burns_nonce() {
    let dir = TempDir::new().unwrap();
    let state = StateFile::new(dir.path().join("state.txt"));

    state.issue("expected").await.unwrap();
    assert!(!state.consume("wrong").await);

    // The failed attempt consumed the nonce; the right value no longer works
    assert!(!state.consume("expected").await);
}

#[tokio::test]
async fn test_never_issued_state_fails() {
    let dir = TempDir::new().unwrap();
    let state = StateFile::new(dir.path().join("state.txt"));
    assert!(!state.consume("anything").await);
}

#[tokio::test]
async fn test_store_paths_are_distinct() {
    let dir = TempDir::new().unwrap();
    let paths = StorePaths::new(dir.path());

    let files = [
        paths.hevy_key().path().to_path_buf(),
        paths.whoop_token().path().to_path_buf(),
        paths.sms_config().path().to_path_buf(),
    ];
    assert_ne!(files[0], files[1]);
    assert_ne!(files[1], files[2]);
    assert_ne!(files[0], files[2]);
}
