// ABOUTME: Integration tests for the role guard applied by the full console router
// ABOUTME: Covers anonymous, mis-scoped and signed-in page requests plus the /api bypass
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Async-IO.org

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

mod common;
mod helpers;

use axum::http::StatusCode;
use common::{mint_token, spawn_backend};
use helpers::axum_test::AxumTestRequest;
use serde_json::Value;
use xaze_console::server::router;

#[tokio::test]
async fn test_anonymous_dashboard_redirects_to_login() {
    let backend = spawn_backend().await;
    let app = router(&backend.resources());

    for path in ["/", "/system", "/system/partners", "/partner/tenants"] {
        let response = AxumTestRequest::get(path).send(app.clone()).await;
        assert_eq!(response.status(), 307, "path {path}");
        assert_eq!(response.location(), Some("/login"), "path {path}");
    }
}

#[tokio::test]
async fn test_mis_scoped_roles_are_sent_home() {
    let backend = spawn_backend().await;
    let app = router(&backend.resources());

    let partner = AxumTestRequest::get("/system/settings")
        .session(&mint_token("PARTNER_ADMIN"))
        .send(app.clone())
        .await;
    assert_eq!(partner.location(), Some("/partner"));

    let system = AxumTestRequest::get("/partner")
        .session(&mint_token("SYSTEM_ADMIN"))
        .send(app.clone())
        .await;
    assert_eq!(system.location(), Some("/system"));

    let viewer = AxumTestRequest::get("/system")
        .session(&mint_token("VIEWER"))
        .send(app.clone())
        .await;
    assert_eq!(viewer.location(), Some("/login"));

    let garbage = AxumTestRequest::get("/partner")
        .session("not-a-token")
        .send(app)
        .await;
    assert_eq!(garbage.location(), Some("/login"));
}

#[tokio::test]
async fn test_signed_in_user_skips_login_page() {
    let backend = spawn_backend().await;
    let app = router(&backend.resources());

    let response = AxumTestRequest::get("/login")
        .session(&mint_token("PARTNER_ADMIN"))
        .send(app.clone())
        .await;
    assert_eq!(response.location(), Some("/partner"));

    let root = AxumTestRequest::get("/")
        .session(&mint_token("SYSTEM_ADMIN"))
        .send(app)
        .await;
    assert_eq!(root.location(), Some("/system"));
}

#[tokio::test]
async fn test_login_page_renders_for_unknown_role() {
    let backend = spawn_backend().await;
    let app = router(&backend.resources());

    let page: Value = AxumTestRequest::get("/login")
        .session(&mint_token("VIEWER"))
        .send(app)
        .await
        .assert_status(StatusCode::OK)
        .json();
    assert_eq!(page["content"]["form"], "login");
}

#[tokio::test]
async fn test_permitted_page_renders_with_user_badge() {
    let backend = spawn_backend().await;
    let app = router(&backend.resources());

    let page: Value = AxumTestRequest::get("/system/partners")
        .session(&mint_token("SYSTEM_ADMIN"))
        .send(app)
        .await
        .assert_status(StatusCode::OK)
        .json();
    assert_eq!(page["frame"]["user"]["name"], "Ada");
    assert_eq!(page["content"]["page"]["total"], 1);
}

#[tokio::test]
async fn test_playground_and_health_are_public() {
    let backend = spawn_backend().await;
    let app = router(&backend.resources());

    AxumTestRequest::get("/playground/chat")
        .send(app.clone())
        .await
        .assert_status(StatusCode::OK);

    let health: Value = AxumTestRequest::get("/health")
        .send(app)
        .await
        .assert_status(StatusCode::OK)
        .json();
    assert_eq!(health["status"], "healthy");
}

#[tokio::test]
async fn test_api_routes_answer_json_instead_of_redirecting() {
    let backend = spawn_backend().await;
    let app = router(&backend.resources());

    let body: Value = AxumTestRequest::get("/api/system/partners")
        .send(app)
        .await
        .assert_status(StatusCode::UNAUTHORIZED)
        .json();
    assert_eq!(body["error"], "Unauthorized");
    assert!(backend.state.requests().is_empty());
}

#[tokio::test]
async fn test_request_id_is_echoed() {
    let backend = spawn_backend().await;
    let app = router(&backend.resources());

    let response = AxumTestRequest::get("/health")
        .header("x-request-id", "trace-42")
        .send(app)
        .await;
    assert_eq!(response.header("x-request-id"), Some("trace-42"));
}
