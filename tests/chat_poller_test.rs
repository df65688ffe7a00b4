// ABOUTME: Integration tests for the chat turn controller over real HTTP
// ABOUTME: Covers session auto-start, polling through status failures and session switching
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Async-IO.org

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

mod common;
mod helpers;

use axum::http::Method;
use common::{spawn_backend, FakeBackend, ASSISTANT_REPLY, VALID_API_KEY};
use std::sync::atomic::Ordering;
use std::time::Duration;
use tokio::time::timeout;
use xaze_console::{
    client::Credentials,
    config::ChatConfig,
    playground::{ApiKeyChat, ChatController, ChatError, TurnPhase},
};

fn controller(backend: &FakeBackend) -> ChatController<ApiKeyChat> {
    let chat = ApiKeyChat::new(
        backend.client(),
        Credentials::api_key(Some(VALID_API_KEY)).unwrap(),
        &ChatConfig::default(),
    );
    ChatController::new(chat, Duration::from_millis(10))
}

#[tokio::test]
async fn test_turn_auto_starts_session_and_settles() {
    let backend = spawn_backend().await;
    backend.state.pending_polls.store(1, Ordering::SeqCst);
    let chat = controller(&backend);
    chat.select_knowledge_base("kb_1").await;

    let ticket = chat.send("hi").await.unwrap().unwrap();
    assert_eq!(ticket.job_id, "job_1");
    assert_eq!(chat.session_id().await.as_deref(), Some("session_1"));

    timeout(Duration::from_secs(5), chat.wait_idle()).await.unwrap();
    let snapshot = chat.snapshot().await;
    assert_eq!(snapshot.phase, TurnPhase::Idle);
    assert_eq!(snapshot.messages.last().unwrap().content, ASSISTANT_REPLY);

    let created = backend.state.requests_to(&Method::POST, "/chat/sessions");
    assert_eq!(created.len(), 1);
    assert_eq!(created[0].body["knowledge_base_id"], "kb_1");
}

#[tokio::test]
async fn test_send_without_knowledge_base_is_rejected() {
    let backend = spawn_backend().await;
    let chat = controller(&backend);

    let err = chat.send("hi").await.unwrap_err();
    match err {
        ChatError::Action(e) => assert_eq!(e.message, "Knowledge Base ID is required"),
        other => panic!("unexpected error: {other:?}"),
    }
    assert!(chat.phase().is_idle());
    assert!(backend.state.requests().is_empty());
}

#[tokio::test]
async fn test_blank_input_is_ignored() {
    let backend = spawn_backend().await;
    let chat = controller(&backend);
    chat.select_knowledge_base("kb_1").await;

    assert!(chat.send("  \n").await.unwrap().is_none());
    assert!(backend.state.requests().is_empty());
}

#[tokio::test]
async fn test_status_failures_keep_polling() {
    let backend = spawn_backend().await;
    backend.state.break_job_status.store(true, Ordering::SeqCst);
    let chat = controller(&backend);
    chat.select_knowledge_base("kb_1").await;
    chat.send("hi").await.unwrap();

    // Several failed checks in a row leave the turn pending
    tokio::time::sleep(Duration::from_millis(80)).await;
    assert!(matches!(chat.phase(), TurnPhase::Polling { .. }));
    assert!(backend.state.requests_to(&Method::GET, "/chat/jobs/job_1").len() >= 2);

    backend.state.break_job_status.store(false, Ordering::SeqCst);
    timeout(Duration::from_secs(5), chat.wait_idle()).await.unwrap();
    let snapshot = chat.snapshot().await;
    assert_eq!(snapshot.messages.last().unwrap().content, ASSISTANT_REPLY);
    assert!(snapshot.notices.is_empty());
}

#[tokio::test]
async fn test_switch_session_abandons_pending_poll() {
    let backend = spawn_backend().await;
    backend.state.pending_polls.store(usize::MAX, Ordering::SeqCst);
    let chat = controller(&backend);
    chat.select_knowledge_base("kb_1").await;
    chat.send("hi").await.unwrap();
    assert!(matches!(chat.phase(), TurnPhase::Polling { .. }));

    chat.switch_session("session_2").await.unwrap();
    assert!(chat.phase().is_idle());
    assert_eq!(chat.session_id().await.as_deref(), Some("session_2"));

    // History of the newly selected session replaces the transcript
    let snapshot = chat.snapshot().await;
    assert_eq!(snapshot.messages.len(), 2);

    tokio::time::sleep(Duration::from_millis(30)).await;
    let polls = backend.state.requests_to(&Method::GET, "/chat/jobs/job_1").len();
    tokio::time::sleep(Duration::from_millis(60)).await;
    assert_eq!(
        backend.state.requests_to(&Method::GET, "/chat/jobs/job_1").len(),
        polls
    );
}

#[tokio::test]
async fn test_restore_loads_history() {
    let backend = spawn_backend().await;
    let chat = controller(&backend);

    chat.restore(Some("session_1".to_owned()), Some("kb_1".to_owned()))
        .await;
    assert_eq!(chat.knowledge_base_id().await.as_deref(), Some("kb_1"));
    let snapshot = chat.snapshot().await;
    assert_eq!(snapshot.messages.len(), 2);
    assert_eq!(snapshot.messages[0].content, "hi");
}
