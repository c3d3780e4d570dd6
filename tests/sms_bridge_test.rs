// ABOUTME: Integration tests for the Twilio client and the inbound SMS bridge
// ABOUTME: Covers send outcomes, credential precedence, connect validation, and the reply path
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pulse Gateway
#![allow(missing_docs)]

use async_trait::async_trait;
use mockito::Matcher;
use pulse_gateway::agent::{ChatRequest, ConversationalAgent};
use pulse_gateway::errors::{AppError, AppResult, ErrorCode};
use pulse_gateway::sms::{SmsBridge, SmsConfigRecord, TwilioClient, TwilioConfig};
use pulse_gateway::store::JsonFileStore;
use std::sync::Arc;
use tempfile::TempDir;

fn test_config(server_url: &str) -> TwilioConfig {
    TwilioConfig {
        api_base_url: server_url.to_owned(),
        env_account_sid: None,
        env_auth_token: None,
        env_phone_number: None,
    }
}

fn stored_record() -> SmsConfigRecord {
    SmsConfigRecord {
        account_sid: "AC123".to_owned(),
        auth_token: "token".to_owned(),
        phone_number: "+15550001111".to_owned(),
    }
}

fn client_in(dir: &TempDir, config: TwilioConfig) -> TwilioClient {
    TwilioClient::new(config, JsonFileStore::new(dir.path().join("sms_config.json")))
}

async fn seed_config(dir: &TempDir) {
    JsonFileStore::new(dir.path().join("sms_config.json"))
        .save(&stored_record())
        .await
        .unwrap();
}

/// Agent scripted to return a fixed reply
struct ScriptedAgent {
    reply: String,
}

#[async_trait]
impl ConversationalAgent for ScriptedAgent {
    async fn reply(&self, _request: ChatRequest) -> AppResult<String> {
        Ok(self.reply.clone())
    }
}

/// Agent scripted to always fail
struct FailingAgent;

#[async_trait]
impl ConversationalAgent for FailingAgent {
    async fn reply(&self, _request: ChatRequest) -> AppResult<String> {
        Err(AppError::internal("agent exploded"))
    }
}

#[tokio::test]
async fn test_send_posts_message_and_reports_outcome() {
    let mut server = mockito::Server::new_async().await;
    let dir = TempDir::new().unwrap();
    seed_config(&dir).await;

    let send = server
        .mock("POST", "/2010-04-01/Accounts/AC123/Messages.json")
        .match_body(Matcher::AllOf(vec![
            Matcher::UrlEncoded("To".into(), "+15551234567".into()),
            Matcher::UrlEncoded("From".into(), "+15550001111".into()),
            Matcher::UrlEncoded("Body".into(), "hello there".into()),
        ]))
        .with_status(201)
        .with_header("content-type", "application/json")
        .with_body(r#"{"sid":"SM1","status":"queued"}"#)
        .create_async()
        .await;

    let client = client_in(&dir, test_config(&server.url()));
    let outcome = client.send("+15551234567", "hello there").await;

    assert!(outcome.success);
    assert_eq!(outcome.sid.as_deref(), Some("SM1"));
    assert_eq!(outcome.status.as_deref(), Some("queued"));

    send.assert_async().await;
}

#[tokio::test]
async fn test_send_without_sender_number_fails_without_raising() {
    let server = mockito::Server::new_async().await;
    let dir = TempDir::new().unwrap();

    let client = client_in(&dir, test_config(&server.url()));
    let outcome = client.send("+15551234567", "hello").await;

    assert!(!outcome.success);
    assert!(outcome.error.is_some());
}

#[tokio::test]
async fn test_send_surfaces_provider_rejection_in_outcome() {
    let mut server = mockito::Server::new_async().await;
    let dir = TempDir::new().unwrap();
    seed_config(&dir).await;

    server
        .mock("POST", "/2010-04-01/Accounts/AC123/Messages.json")
        .with_status(400)
        .with_body(r#"{"message":"invalid number"}"#)
        .create_async()
        .await;

    let client = client_in(&dir, test_config(&server.url()));
    let outcome = client.send("+0", "hello").await;

    assert!(!outcome.success);
    assert!(outcome.error.unwrap().contains("400"));
}

#[tokio::test]
async fn test_environment_number_takes_precedence_over_stored() {
    let mut server = mockito::Server::new_async().await;
    let dir = TempDir::new().unwrap();
    seed_config(&dir).await;

    let send = server
        .mock("POST", "/2010-04-01/Accounts/AC123/Messages.json")
        .match_body(Matcher::UrlEncoded("From".into(), "+15559998888".into()))
        .with_status(201)
        .with_header("content-type", "application/json")
        .with_body(r#"{"sid":"SM2","status":"queued"}"#)
        .create_async()
        .await;

    let mut config = test_config(&server.url());
    config.env_phone_number = Some("+15559998888".to_owned());

    let client = client_in(&dir, config);
    let outcome = client.send("+15551234567", "hi").await;
    assert!(outcome.success);

    send.assert_async().await;
}

#[tokio::test]
async fn test_connect_validates_account_and_number_then_persists() {
    let mut server = mockito::Server::new_async().await;
    let dir = TempDir::new().unwrap();

    server
        .mock("GET", "/2010-04-01/Accounts/AC123.json")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"sid":"AC123","status":"active"}"#)
        .create_async()
        .await;
    server
        .mock("GET", "/2010-04-01/Accounts/AC123/IncomingPhoneNumbers.json")
        .match_query(Matcher::UrlEncoded(
            "PhoneNumber".into(),
            "+15550001111".into(),
        ))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"incoming_phone_numbers":[{"phone_number":"+15550001111"}]}"#)
        .create_async()
        .await;

    let client = client_in(&dir, test_config(&server.url()));
    client
        .connect("AC123", "token", "+15550001111")
        .await
        .unwrap();

    let persisted: SmsConfigRecord = JsonFileStore::new(dir.path().join("sms_config.json"))
        .load()
        .await
        .unwrap();
    assert_eq!(persisted, stored_record());
}

#[tokio::test]
async fn test_connect_rejects_number_missing_from_account() {
    let mut server = mockito::Server::new_async().await;
    let dir = TempDir::new().unwrap();

    server
        .mock("GET", "/2010-04-01/Accounts/AC123.json")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"sid":"AC123"}"#)
        .create_async()
        .await;
    server
        .mock("GET", "/2010-04-01/Accounts/AC123/IncomingPhoneNumbers.json")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"incoming_phone_numbers":[]}"#)
        .create_async()
        .await;

    let client = client_in(&dir, test_config(&server.url()));
    let err = client
        .connect("AC123", "token", "+15550001111")
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::InvalidCredential);
    assert!(!dir.path().join("sms_config.json").exists());
}

#[tokio::test]
async fn test_connect_tolerates_number_verification_errors() {
    let mut server = mockito::Server::new_async().await;
    let dir = TempDir::new().unwrap();

    server
        .mock("GET", "/2010-04-01/Accounts/AC123.json")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"sid":"AC123"}"#)
        .create_async()
        .await;
    // Number verification erroring out is a warning, not a hard failure
    server
        .mock("GET", "/2010-04-01/Accounts/AC123/IncomingPhoneNumbers.json")
        .match_query(Matcher::Any)
        .with_status(500)
        .create_async()
        .await;

    let client = client_in(&dir, test_config(&server.url()));
    client
        .connect("AC123", "token", "+15550001111")
        .await
        .unwrap();
    assert!(dir.path().join("sms_config.json").exists());
}

#[tokio::test]
async fn test_connect_rejects_bad_credentials() {
    let mut server = mockito::Server::new_async().await;
    let dir = TempDir::new().unwrap();

    server
        .mock("GET", "/2010-04-01/Accounts/AC123.json")
        .with_status(401)
        .create_async()
        .await;

    let client = client_in(&dir, test_config(&server.url()));
    let err = client
        .connect("AC123", "wrong", "+15550001111")
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::InvalidCredential);
}

#[tokio::test]
async fn test_disconnect_is_idempotent() {
    let server = mockito::Server::new_async().await;
    let dir = TempDir::new().unwrap();
    seed_config(&dir).await;

    let client = client_in(&dir, test_config(&server.url()));
    client.disconnect().await;
    assert!(!dir.path().join("sms_config.json").exists());
    client.disconnect().await;
    assert!(!dir.path().join("sms_config.json").exists());
}

#[tokio::test]
async fn test_inbound_message_gets_agent_reply() {
    let mut server = mockito::Server::new_async().await;
    let dir = TempDir::new().unwrap();
    seed_config(&dir).await;

    let send = server
        .mock("POST", "/2010-04-01/Accounts/AC123/Messages.json")
        .match_body(Matcher::AllOf(vec![
            Matcher::UrlEncoded("To".into(), "+15551234567".into()),
            Matcher::UrlEncoded("Body".into(), "the agent reply".into()),
        ]))
        .with_status(201)
        .with_header("content-type", "application/json")
        .with_body(r#"{"sid":"SM3","status":"queued"}"#)
        .expect(1)
        .create_async()
        .await;

    let twilio = Arc::new(client_in(&dir, test_config(&server.url())));
    let bridge = SmsBridge::new(
        twilio,
        Arc::new(ScriptedAgent {
            reply: "the agent reply".to_owned(),
        }),
    );

    // Tests await the background task's completion instead of sleeping
    bridge
        .handle_inbound("+15551234567".to_owned(), "hello".to_owned())
        .await
        .unwrap();

    send.assert_async().await;
}

#[tokio::test]
async fn test_agent_failure_sends_apology() {
    let mut server = mockito::Server::new_async().await;
    let dir = TempDir::new().unwrap();
    seed_config(&dir).await;

    let send = server
        .mock("POST", "/2010-04-01/Accounts/AC123/Messages.json")
        .match_body(Matcher::AllOf(vec![
            Matcher::UrlEncoded("To".into(), "+15551234567".into()),
            Matcher::UrlEncoded(
                "Body".into(),
                "Sorry, I encountered an error processing your message.".into(),
            ),
        ]))
        .with_status(201)
        .with_header("content-type", "application/json")
        .with_body(r#"{"sid":"SM4","status":"queued"}"#)
        .expect(1)
        .create_async()
        .await;

    let twilio = Arc::new(client_in(&dir, test_config(&server.url())));
    let bridge = SmsBridge::new(twilio, Arc::new(FailingAgent));

    bridge
        .handle_inbound("+15551234567".to_owned(), "hello".to_owned())
        .await
        .unwrap();

    send.assert_async().await;
}
