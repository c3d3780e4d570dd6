// ABOUTME: Integration tests for the WHOOP OAuth token lifecycle
// ABOUTME: Covers refresh-on-expiry, state nonce enforcement, 401 invalidation, and disconnect
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pulse Gateway
#![allow(missing_docs)]

use chrono::{Duration, Utc};
use pulse_gateway::errors::ErrorCode;
use pulse_gateway::providers::{DateRange, TokenRecord, WhoopClient, WhoopConfig};
use pulse_gateway::store::{JsonFileStore, StateFile};
use tempfile::TempDir;

fn test_config(server_url: &str) -> WhoopConfig {
    WhoopConfig {
        auth_url: format!("{server_url}/oauth/oauth2/auth"),
        token_url: format!("{server_url}/oauth/oauth2/token"),
        api_base_url: format!("{server_url}/developer/v2"),
        client_id: Some("client-id".to_owned()),
        client_secret: Some("client-secret".to_owned()),
        redirect_uri: Some("http://localhost:3000/whoop/callback".to_owned()),
    }
}

fn client_in(dir: &TempDir, config: WhoopConfig) -> WhoopClient {
    WhoopClient::new(
        config,
        JsonFileStore::new(dir.path().join("whoop_token.json")),
        StateFile::new(dir.path().join("whoop_oauth_state.txt")),
    )
}

async fn seed_token(dir: &TempDir, record: &TokenRecord) {
    JsonFileStore::new(dir.path().join("whoop_token.json"))
        .save(record)
        .await
        .unwrap();
}

fn expired_record() -> TokenRecord {
    TokenRecord {
        access_token: "stale-token".to_owned(),
        refresh_token: Some("refresh-token".to_owned()),
        expires_at: Utc::now() - Duration::minutes(1),
    }
}

fn fresh_record() -> TokenRecord {
    TokenRecord {
        access_token: "fresh-token".to_owned(),
        refresh_token: Some("refresh-token".to_owned()),
        expires_at: Utc::now() + Duration::hours(1),
    }
}

#[tokio::test]
async fn test_expired_token_triggers_exactly_one_refresh() {
    let mut server = mockito::Server::new_async().await;
    let dir = TempDir::new().unwrap();
    seed_token(&dir, &expired_record()).await;

    let refresh = server
        .mock("POST", "/oauth/oauth2/token")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"access_token":"renewed","refresh_token":"next-refresh","expires_in":3600}"#)
        .expect(1)
        .create_async()
        .await;

    let client = client_in(&dir, test_config(&server.url()));

    let token = client.valid_access_token().await;
    assert_eq!(token.as_deref(), Some("renewed"));

    // The renewed record is valid for an hour: an immediate second read must
    // not refresh again
    let token = client.valid_access_token().await;
    assert_eq!(token.as_deref(), Some("renewed"));

    refresh.assert_async().await;
}

#[tokio::test]
async fn test_valid_token_returned_unchanged() {
    let mut server = mockito::Server::new_async().await;
    let dir = TempDir::new().unwrap();
    seed_token(&dir, &fresh_record()).await;

    let refresh = server
        .mock("POST", "/oauth/oauth2/token")
        .expect(0)
        .create_async()
        .await;

    let client = client_in(&dir, test_config(&server.url()));
    assert_eq!(
        client.valid_access_token().await.as_deref(),
        Some("fresh-token")
    );

    refresh.assert_async().await;
}

#[tokio::test]
async fn test_refresh_failure_reads_as_not_connected() {
    let mut server = mockito::Server::new_async().await;
    let dir = TempDir::new().unwrap();
    seed_token(&dir, &expired_record()).await;

    let refresh = server
        .mock("POST", "/oauth/oauth2/token")
        .with_status(400)
        .with_body(r#"{"error":"invalid_grant"}"#)
        .create_async()
        .await;

    let client = client_in(&dir, test_config(&server.url()));
    assert!(client.valid_access_token().await.is_none());
    assert!(!client.is_connected().await);

    refresh.assert_async().await;
}

#[tokio::test]
async fn test_refresh_preserves_prior_refresh_token() {
    let mut server = mockito::Server::new_async().await;
    let dir = TempDir::new().unwrap();
    seed_token(&dir, &expired_record()).await;

    server
        .mock("POST", "/oauth/oauth2/token")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"access_token":"renewed","expires_in":3600}"#)
        .create_async()
        .await;

    let client = client_in(&dir, test_config(&server.url()));
    assert!(client.valid_access_token().await.is_some());

    let persisted: TokenRecord = JsonFileStore::new(dir.path().join("whoop_token.json"))
        .load()
        .await
        .unwrap();
    assert_eq!(persisted.refresh_token.as_deref(), Some("refresh-token"));
    assert!(persisted.expires_at > Utc::now());
}

#[tokio::test]
async fn test_missing_client_credentials_fail_refresh_quietly() {
    let server = mockito::Server::new_async().await;
    let dir = TempDir::new().unwrap();
    seed_token(&dir, &expired_record()).await;

    let mut config = test_config(&server.url());
    config.client_id = None;
    config.client_secret = None;

    let client = client_in(&dir, config);
    assert!(client.valid_access_token().await.is_none());
}

#[tokio::test]
async fn test_callback_with_wrong_state_is_rejected_without_exchange() {
    let mut server = mockito::Server::new_async().await;
    let dir = TempDir::new().unwrap();

    let exchange = server
        .mock("POST", "/oauth/oauth2/token")
        .expect(0)
        .create_async()
        .await;

    let client = client_in(&dir, test_config(&server.url()));
    let url = client.authorization_url().await.unwrap();
    assert!(url.contains("response_type=code"));

    let err = client.exchange_code("auth-code", "not-the-nonce").await.unwrap_err();
    assert_eq!(err.code, ErrorCode::CsrfStateMismatch);

    exchange.assert_async().await;
}

#[tokio::test]
async fn test_callback_with_never_issued_state_is_rejected() {
    let server = mockito::Server::new_async().await;
    let dir = TempDir::new().unwrap();

    let client = client_in(&dir, test_config(&server.url()));
    let err = client.exchange_code("auth-code", "uninvited").await.unwrap_err();
    assert_eq!(err.code, ErrorCode::CsrfStateMismatch);
}

#[tokio::test]
async fn test_code_exchange_persists_token_record() {
    let mut server = mockito::Server::new_async().await;
    let dir = TempDir::new().unwrap();

    server
        .mock("POST", "/oauth/oauth2/token")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            r#"{"access_token":"issued","refresh_token":"issued-refresh","expires_in":3600}"#,
        )
        .create_async()
        .await;

    let client = client_in(&dir, test_config(&server.url()));
    let url = client.authorization_url().await.unwrap();

    // Pull the state parameter back out of the redirect URL
    let state = url::Url::parse(&url)
        .unwrap()
        .query_pairs()
        .find(|(k, _)| k == "state")
        .map(|(_, v)| v.into_owned())
        .unwrap();

    client.exchange_code("auth-code", &state).await.unwrap();

    let persisted: TokenRecord = JsonFileStore::new(dir.path().join("whoop_token.json"))
        .load()
        .await
        .unwrap();
    assert_eq!(persisted.access_token, "issued");
    assert!(persisted.expires_at > Utc::now());

    // The nonce was consumed: replaying the same callback fails
    let err = client.exchange_code("auth-code", &state).await.unwrap_err();
    assert_eq!(err.code, ErrorCode::CsrfStateMismatch);
}

#[tokio::test]
async fn test_data_fetch_401_clears_token_and_surfaces_unauthenticated() {
    let mut server = mockito::Server::new_async().await;
    let dir = TempDir::new().unwrap();
    seed_token(&dir, &fresh_record()).await;

    server
        .mock("GET", "/developer/v2/recovery")
        .match_query(mockito::Matcher::Any)
        .with_status(401)
        .with_body(r#"{"error":"unauthorized"}"#)
        .create_async()
        .await;

    let client = client_in(&dir, test_config(&server.url()));
    let err = client.get_recovery(&DateRange::default()).await.unwrap_err();
    assert_eq!(err.code, ErrorCode::Unauthenticated);

    // Local record was invalidated: the next call starts from "not connected"
    assert!(!client.is_connected().await);
}

#[tokio::test]
async fn test_data_fetch_passes_response_through() {
    let mut server = mockito::Server::new_async().await;
    let dir = TempDir::new().unwrap();
    seed_token(&dir, &fresh_record()).await;

    server
        .mock("GET", "/developer/v2/activity/sleep")
        .match_query(mockito::Matcher::Any)
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"records":[{"id":"sleep-1"}],"next_token":null}"#)
        .create_async()
        .await;

    let client = client_in(&dir, test_config(&server.url()));
    let data = client.get_sleep(&DateRange::default()).await.unwrap();
    assert_eq!(data["records"][0]["id"], "sleep-1");
}

#[tokio::test]
async fn test_upstream_error_carries_status_and_body() {
    let mut server = mockito::Server::new_async().await;
    let dir = TempDir::new().unwrap();
    seed_token(&dir, &fresh_record()).await;

    server
        .mock("GET", "/developer/v2/cycle")
        .match_query(mockito::Matcher::Any)
        .with_status(503)
        .with_body("maintenance")
        .create_async()
        .await;

    let client = client_in(&dir, test_config(&server.url()));
    let err = client.get_strain(&DateRange::default()).await.unwrap_err();
    assert_eq!(err.code, ErrorCode::UpstreamError);
    assert_eq!(err.details["status"], 503);
    assert_eq!(err.details["body"], "maintenance");
}

#[tokio::test]
async fn test_disconnect_is_idempotent() {
    let server = mockito::Server::new_async().await;
    let dir = TempDir::new().unwrap();
    seed_token(&dir, &fresh_record()).await;

    let client = client_in(&dir, test_config(&server.url()));
    client.disconnect().await;
    assert!(!dir.path().join("whoop_token.json").exists());

    client.disconnect().await;
    assert!(!dir.path().join("whoop_token.json").exists());
}

#[tokio::test]
async fn test_fetch_without_record_is_unauthenticated() {
    let server = mockito::Server::new_async().await;
    let dir = TempDir::new().unwrap();

    let client = client_in(&dir, test_config(&server.url()));
    let err = client.get_workouts(&DateRange::default()).await.unwrap_err();
    assert_eq!(err.code, ErrorCode::Unauthenticated);
}
