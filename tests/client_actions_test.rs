// ABOUTME: Integration tests for the backend client against a fake Xaze API
// ABOUTME: Checks envelope unwrapping, credential headers and failure message selection
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Async-IO.org

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

mod common;
mod helpers;

use axum::http::Method;
use common::{spawn_backend, unreachable_base_url, VALID_API_KEY, VALID_PASSWORD};
use std::sync::atomic::Ordering;
use xaze_console::{
    client::{BackendClient, Credentials},
    config::BackendConfig,
    errors::{ActionErrorKind, GENERIC_FAILURE},
};
use xaze_core::models::{JobState, LoginRequest};

fn login(email: &str, password: &str) -> LoginRequest {
    LoginRequest {
        email: email.to_owned(),
        password: password.to_owned(),
    }
}

#[tokio::test]
async fn test_list_payload_is_unwrapped_from_envelope() {
    let backend = spawn_backend().await;
    let client = backend.client();
    let token = Credentials::session(Some("tok_1")).unwrap();

    let partners = client.partners(Some(&token)).await.unwrap();
    assert_eq!(partners.len(), 1);
    assert_eq!(partners[0].slug, "acme");

    let sent = backend.state.requests_to(&Method::GET, "/system/partners");
    assert_eq!(sent[0].bearer.as_deref(), Some("tok_1"));
    assert_eq!(sent[0].api_key, None);
}

#[tokio::test]
async fn test_missing_credentials_fail_before_network() {
    let backend = spawn_backend().await;
    let client = backend.client();

    let err = client.partners(None).await.unwrap_err();
    assert_eq!(err.kind, ActionErrorKind::Unauthorized);
    assert_eq!(err.message, "Unauthorized");
    assert!(backend.state.requests().is_empty());
}

#[tokio::test]
async fn test_login_success_and_rejection() {
    let backend = spawn_backend().await;
    let client = backend.client();

    let session = client
        .login(&login("partner@acme.test", VALID_PASSWORD))
        .await
        .unwrap();
    assert!(session.token.starts_with("ey"));
    assert_eq!(session.user.role.as_str(), "PARTNER_ADMIN");

    let err = client
        .login(&login("partner@acme.test", "nope"))
        .await
        .unwrap_err();
    assert_eq!(err.kind, ActionErrorKind::Backend { status: 401 });
    assert_eq!(err.message, "Invalid email or password");
}

#[tokio::test]
async fn test_network_failure_uses_generic_message() {
    let base_url = unreachable_base_url().await;
    let client = BackendClient::new(&BackendConfig::new(&base_url).unwrap());
    let token = Credentials::session(Some("tok_1")).unwrap();

    let err = client.partners(Some(&token)).await.unwrap_err();
    assert_eq!(err.kind, ActionErrorKind::Network);
    assert_eq!(err.message, GENERIC_FAILURE);
}

#[tokio::test]
async fn test_api_key_is_sent_as_header() {
    let backend = spawn_backend().await;
    let client = backend.client();

    let good = Credentials::api_key(Some(VALID_API_KEY)).unwrap();
    let bad = Credentials::api_key(Some("sk_other")).unwrap();
    assert!(client.verify_api_key(&good).await);
    assert!(!client.verify_api_key(&bad).await);

    let checks = backend.state.requests_to(&Method::GET, "/credits");
    assert_eq!(checks.len(), 2);
    assert_eq!(checks[0].api_key.as_deref(), Some(VALID_API_KEY));
    assert_eq!(checks[0].bearer, None);
}

#[tokio::test]
async fn test_job_status_hides_backend_message() {
    let backend = spawn_backend().await;
    let client = backend.client();
    let key = Credentials::api_key(Some(VALID_API_KEY)).unwrap();

    let status = client.chat_job_status(Some(&key), "job_1").await.unwrap();
    assert_eq!(status.status, JobState::Completed);

    backend.state.break_job_status.store(true, Ordering::SeqCst);
    let err = client.chat_job_status(Some(&key), "job_1").await.unwrap_err();
    assert_eq!(err.kind, ActionErrorKind::Backend { status: 500 });
    assert_eq!(err.message, "Failed to check job status");
}

#[tokio::test]
async fn test_backend_error_message_passes_through() {
    let backend = spawn_backend().await;
    let client = backend.client();
    let key = Credentials::api_key(Some(VALID_API_KEY)).unwrap();

    // Unknown routes answer 404 {"error": "Not found"}
    let err = client.chat_session(Some(&key), "missing").await.unwrap_err();
    assert_eq!(err.kind, ActionErrorKind::Backend { status: 404 });
    assert_eq!(err.message, "Not found");
}
