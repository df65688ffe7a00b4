// ABOUTME: Integration tests for API-key playground routes and the chat turn lifecycle
// ABOUTME: Exercises key verification, knowledge base fallback, 409 on overlapping turns and polling
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Async-IO.org

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

mod common;
mod helpers;

use axum::{
    http::{Method, StatusCode},
    Router,
};
use common::{spawn_backend, ASSISTANT_REPLY, VALID_API_KEY};
use helpers::axum_test::AxumTestRequest;
use serde_json::{json, Value};
use std::sync::atomic::Ordering;
use std::time::Duration;
use xaze_console::server::router;

/// Poll the chat state until the turn settles; returns the final snapshot and every notice seen
async fn wait_for_idle(app: &Router) -> (Value, Vec<Value>) {
    let mut notices = Vec::new();
    for _ in 0..200 {
        let chat: Value = AxumTestRequest::get("/api/playground/chat")
            .api_key(VALID_API_KEY)
            .send(app.clone())
            .await
            .assert_status(StatusCode::OK)
            .json();
        notices.extend(chat["notices"].as_array().cloned().unwrap_or_default());
        if chat["phase"]["state"] == "idle" {
            return (chat, notices);
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    panic!("chat turn never settled");
}

#[tokio::test]
async fn test_playground_login_verifies_key() {
    let backend = spawn_backend().await;
    let app = router(&backend.resources());

    let ok: Value = AxumTestRequest::post("/api/playground/login")
        .json(&json!({ "api_key": VALID_API_KEY }))
        .send(app.clone())
        .await
        .assert_status(StatusCode::OK)
        .json();
    assert_eq!(ok["toast"]["message"], "Logged in successfully");
    let checks = backend.state.requests_to(&Method::GET, "/credits");
    assert_eq!(checks[0].api_key.as_deref(), Some(VALID_API_KEY));

    let rejected: Value = AxumTestRequest::post("/api/playground/login")
        .json(&json!({ "api_key": "sk_wrong" }))
        .send(app.clone())
        .await
        .assert_status(StatusCode::UNAUTHORIZED)
        .json();
    assert_eq!(rejected["error"], "Invalid API Key");

    AxumTestRequest::post("/api/playground/login")
        .json(&json!({ "api_key": "   " }))
        .send(app)
        .await
        .assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_playground_calls_require_key() {
    let backend = spawn_backend().await;
    let app = router(&backend.resources());

    for uri in ["/api/playground/knowledge-bases", "/api/playground/chat"] {
        let body: Value = AxumTestRequest::get(uri)
            .send(app.clone())
            .await
            .assert_status(StatusCode::UNAUTHORIZED)
            .json();
        assert_eq!(body["error"], "Unauthorized", "uri {uri}");
    }
    assert!(backend.state.requests().is_empty());
}

#[tokio::test]
async fn test_chat_state_selects_first_knowledge_base() {
    let backend = spawn_backend().await;
    let app = router(&backend.resources());

    let chat: Value = AxumTestRequest::get("/api/playground/chat")
        .api_key(VALID_API_KEY)
        .send(app)
        .await
        .assert_status(StatusCode::OK)
        .json();
    assert_eq!(chat["knowledge_base_id"], "kb_1");
    assert_eq!(chat["session_id"], Value::Null);
    assert_eq!(chat["phase"]["state"], "idle");
    assert_eq!(chat["messages"], json!([]));
}

#[tokio::test]
async fn test_chat_turn_completes_with_reply() {
    let backend = spawn_backend().await;
    backend.state.pending_polls.store(2, Ordering::SeqCst);
    let app = router(&backend.resources());

    let accepted: Value = AxumTestRequest::post("/api/playground/chat/messages")
        .api_key(VALID_API_KEY)
        .json(&json!({ "content": "hi", "knowledge_base_id": "kb_1" }))
        .send(app.clone())
        .await
        .assert_status(StatusCode::ACCEPTED)
        .json();
    assert_eq!(accepted["job_id"], "job_1");
    assert_eq!(accepted["chat"]["session_id"], "session_1");

    let (chat, notices) = wait_for_idle(&app).await;
    let messages = chat["messages"].as_array().unwrap();
    assert_eq!(messages.first().unwrap()["content"], "hi");
    assert_eq!(messages.last().unwrap()["role"], "assistant");
    assert_eq!(messages.last().unwrap()["content"], ASSISTANT_REPLY);
    assert!(notices.is_empty());

    let sent = backend
        .state
        .requests_to(&Method::POST, "/chat/sessions/session_1/messages");
    assert_eq!(sent[0].body["content"], "hi");
    assert_eq!(sent[0].body["language"], "th");
    assert_eq!(sent[0].body["use_history"], true);
}

#[tokio::test]
async fn test_overlapping_turn_is_rejected() {
    let backend = spawn_backend().await;
    backend.state.pending_polls.store(usize::MAX, Ordering::SeqCst);
    let app = router(&backend.resources());

    let first: Value = AxumTestRequest::post("/api/playground/chat/messages")
        .api_key(VALID_API_KEY)
        .json(&json!({ "content": "first", "knowledge_base_id": "kb_1" }))
        .send(app.clone())
        .await
        .assert_status(StatusCode::ACCEPTED)
        .json();
    assert_eq!(first["chat"]["phase"]["state"], "polling");

    let second: Value = AxumTestRequest::post("/api/playground/chat/messages")
        .api_key(VALID_API_KEY)
        .json(&json!({ "content": "second" }))
        .send(app)
        .await
        .assert_status(StatusCode::CONFLICT)
        .json();
    assert_eq!(second["error"], "A reply is still pending");
    assert_eq!(
        backend
            .state
            .requests_to(&Method::POST, "/chat/sessions/session_1/messages")
            .len(),
        1
    );
}

#[tokio::test]
async fn test_failed_job_shows_error_bubble_and_toast() {
    let backend = spawn_backend().await;
    backend.state.fail_jobs.store(true, Ordering::SeqCst);
    let app = router(&backend.resources());

    AxumTestRequest::post("/api/playground/chat/messages")
        .api_key(VALID_API_KEY)
        .json(&json!({ "content": "hi", "knowledge_base_id": "kb_1" }))
        .send(app.clone())
        .await
        .assert_status(StatusCode::ACCEPTED);

    let (chat, notices) = wait_for_idle(&app).await;
    let last = chat["messages"].as_array().unwrap().last().cloned().unwrap();
    assert_eq!(last["content"], "Error: quota exceeded");
    assert_eq!(last["is_error"], true);
    assert_eq!(notices.len(), 1);
    assert_eq!(notices[0]["message"], "Job failed: quota exceeded");
}

#[tokio::test]
async fn test_blank_message_is_rejected_before_backend() {
    let backend = spawn_backend().await;
    let app = router(&backend.resources());

    let body: Value = AxumTestRequest::post("/api/playground/chat/messages")
        .api_key(VALID_API_KEY)
        .json(&json!({ "content": "   " }))
        .send(app)
        .await
        .assert_status(StatusCode::BAD_REQUEST)
        .json();
    assert_eq!(body["error"], "Message is required");
    assert!(backend.state.requests().is_empty());
}

#[tokio::test]
async fn test_logout_drops_chat_controller() {
    let backend = spawn_backend().await;
    let resources = backend.resources();
    let app = router(&resources);

    AxumTestRequest::get("/api/playground/chat")
        .api_key(VALID_API_KEY)
        .send(app.clone())
        .await
        .assert_status(StatusCode::OK);
    assert_eq!(resources.chats.len(), 1);

    let body: Value = AxumTestRequest::post("/api/playground/logout")
        .api_key(VALID_API_KEY)
        .send(app)
        .await
        .assert_status(StatusCode::OK)
        .json();
    assert_eq!(body["toast"]["level"], "info");
    assert_eq!(body["toast"]["message"], "Logged out");
    assert!(resources.chats.is_empty());
}

#[tokio::test]
async fn test_rejected_keys_leave_no_chat_controller() {
    let backend = spawn_backend().await;
    let resources = backend.resources();
    let app = router(&resources);

    for i in 0..10 {
        let body: Value = AxumTestRequest::get("/api/playground/chat")
            .api_key(&format!("sk_bogus_{i}"))
            .send(app.clone())
            .await
            .assert_status(StatusCode::UNAUTHORIZED)
            .json();
        assert_eq!(body["error"], "Invalid API Key");
    }
    assert!(resources.chats.is_empty());
    // Nothing beyond the key check reached the backend
    assert_eq!(
        backend.state.requests_to(&Method::GET, "/credits").len(),
        backend.state.requests().len()
    );
}

#[tokio::test]
async fn test_idle_chat_controllers_are_swept() {
    let backend = spawn_backend().await;
    let resources = backend.resources();
    let app = router(&resources);

    AxumTestRequest::get("/api/playground/chat")
        .api_key(VALID_API_KEY)
        .send(app.clone())
        .await
        .assert_status(StatusCode::OK);
    assert_eq!(resources.chats.len(), 1);

    // A recently used controller survives a sweep
    assert_eq!(resources.chats.sweep_idle(Duration::from_secs(60)), 0);
    assert_eq!(resources.chats.len(), 1);

    tokio::time::sleep(Duration::from_millis(30)).await;
    assert_eq!(resources.chats.sweep_idle(Duration::from_millis(20)), 1);
    assert!(resources.chats.is_empty());

    // The key is verified again before a fresh controller is created
    let before = backend.state.requests_to(&Method::GET, "/credits").len();
    AxumTestRequest::get("/api/playground/chat")
        .api_key(VALID_API_KEY)
        .send(app)
        .await
        .assert_status(StatusCode::OK);
    assert_eq!(resources.chats.len(), 1);
    assert_eq!(
        backend.state.requests_to(&Method::GET, "/credits").len(),
        before + 1
    );
}
