// ABOUTME: Shared test utilities and setup functions for integration tests
// ABOUTME: Spawns a fake Xaze backend on a loopback port and mints unsigned role tokens
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Async-IO.org
#![allow(
    dead_code,
    clippy::missing_panics_doc,
    clippy::must_use_candidate,
    clippy::too_many_lines
)]
//! Shared test utilities for `xaze_console`
//!
//! The fake backend answers the subset of the Xaze API the console uses and
//! records every request so tests can assert on what was sent.

use axum::{
    body::Bytes,
    extract::State,
    http::{HeaderMap, Method, StatusCode, Uri},
    response::{IntoResponse, Response},
    Json, Router,
};
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use serde_json::{json, Value};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, Once};
use std::time::Duration;
use tokio::net::TcpListener;
use xaze_console::{
    client::BackendClient,
    config::{BackendConfig, ServerConfig},
    server::ServerResources,
    session::decode_role,
};

static INIT_LOGGER: Once = Once::new();

/// API key the fake backend accepts
pub const VALID_API_KEY: &str = "sk_test_valid";
/// Password the fake backend accepts for any e-mail
pub const VALID_PASSWORD: &str = "secret";
/// Reply stored in the fake chat history
pub const ASSISTANT_REPLY: &str = "Hello from Xaze";

/// Initialize quiet logging for tests (call once per test process)
pub fn init_test_logging() {
    INIT_LOGGER.call_once(|| {
        let log_level = match std::env::var("TEST_LOG").as_deref() {
            Ok("TRACE") => tracing::Level::TRACE,
            Ok("DEBUG") => tracing::Level::DEBUG,
            Ok("INFO") => tracing::Level::INFO,
            Ok("WARN" | "ERROR") | _ => tracing::Level::WARN,
        };

        tracing_subscriber::fmt()
            .with_max_level(log_level)
            .with_test_writer()
            .init();
    });
}

/// Unsigned token carrying a role claim
pub fn mint_token(role: &str) -> String {
    let header = URL_SAFE_NO_PAD.encode(r#"{"alg":"HS256","typ":"JWT"}"#);
    let payload = URL_SAFE_NO_PAD.encode(json!({ "sub": "user_1", "role": role }).to_string());
    format!("{header}.{payload}.signature")
}

/// A request seen by the fake backend
#[derive(Debug, Clone)]
pub struct Recorded {
    pub method: Method,
    pub path: String,
    pub query: Option<String>,
    pub bearer: Option<String>,
    pub api_key: Option<String>,
    pub body: Value,
}

/// Mutable behaviour and request log of the fake backend
#[derive(Debug, Default)]
pub struct FakeState {
    requests: Mutex<Vec<Recorded>>,
    /// Job status checks answered with `pending` before `completed`
    pub pending_polls: AtomicUsize,
    /// Answer job status checks with `failed`
    pub fail_jobs: AtomicBool,
    /// Answer every status check with a 500 until cleared
    pub break_job_status: AtomicBool,
}

impl FakeState {
    /// Requests received so far
    pub fn requests(&self) -> Vec<Recorded> {
        self.requests.lock().unwrap().clone()
    }

    /// Requests matching a method and path
    pub fn requests_to(&self, method: &Method, path: &str) -> Vec<Recorded> {
        self.requests()
            .into_iter()
            .filter(|r| &r.method == method && r.path == path)
            .collect()
    }
}

/// Running fake backend
pub struct FakeBackend {
    /// Base URL including `/api/v1`
    pub base_url: String,
    /// Shared state
    pub state: Arc<FakeState>,
}

impl FakeBackend {
    /// Client pointed at this backend
    pub fn client(&self) -> BackendClient {
        BackendClient::new(&BackendConfig::new(&self.base_url).unwrap())
    }

    /// Console configuration pointed at this backend with fast chat polling
    pub fn config(&self) -> ServerConfig {
        let mut config = ServerConfig::for_backend(&self.base_url).unwrap();
        config.chat.poll_interval = Duration::from_millis(20);
        config
    }

    /// Console resources pointed at this backend
    pub fn resources(&self) -> Arc<ServerResources> {
        Arc::new(ServerResources::new(self.config()))
    }
}

/// Spawn the fake backend on `127.0.0.1:0`
pub async fn spawn_backend() -> FakeBackend {
    init_test_logging();
    let state = Arc::new(FakeState::default());
    let app = Router::new()
        .fallback(handle_backend)
        .with_state(Arc::clone(&state));

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    FakeBackend {
        base_url: format!("http://{addr}/api/v1"),
        state,
    }
}

/// Base URL of a port nothing listens on
pub async fn unreachable_base_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{addr}/api/v1")
}

fn ok(data: Value) -> Response {
    Json(json!({ "data": data })).into_response()
}

fn fail(status: StatusCode, message: &str) -> Response {
    (status, Json(json!({ "error": message }))).into_response()
}

pub fn partner_json() -> Value {
    json!({
        "id": "partner_1",
        "name": "Acme Resellers",
        "slug": "acme",
        "contact_email": "ops@acme.test",
        "wallet_balance": "1250.5",
        "credit_limit": "500",
        "created_at": "2025-01-02T03:04:05Z",
        "updated_at": "2025-01-02T03:04:05Z"
    })
}

pub fn tenant_json() -> Value {
    json!({
        "data": {
            "id": "tenant_1",
            "partner_id": "partner_1",
            "name": "Bangkok Bistro",
            "slug": "bistro",
            "model_config_id": "model_1",
            "created_at": "2025-01-02T03:04:05Z",
            "updated_at": "2025-01-02T03:04:05Z"
        },
        "rate": {
            "final_rate": "0.0012",
            "markup_rate": "0.2",
            "model_name": "gpt-4o-mini"
        },
        "balance": "42.5"
    })
}

async fn handle_backend(
    State(state): State<Arc<FakeState>>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let bearer = headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(ToOwned::to_owned);
    let api_key = headers
        .get("x-api-key")
        .and_then(|v| v.to_str().ok())
        .map(ToOwned::to_owned);
    let body: Value = serde_json::from_slice(&body).unwrap_or(Value::Null);
    let path = uri
        .path()
        .strip_prefix("/api/v1")
        .unwrap_or(uri.path())
        .to_owned();

    state.requests.lock().unwrap().push(Recorded {
        method: method.clone(),
        path: path.clone(),
        query: uri.query().map(ToOwned::to_owned),
        bearer: bearer.clone(),
        api_key: api_key.clone(),
        body: body.clone(),
    });

    let segments: Vec<&str> = path.trim_matches('/').split('/').collect();
    match (method.as_str(), segments.as_slice()) {
        ("POST", ["auth", "login"]) => {
            let email = body["email"].as_str().unwrap_or_default();
            if body["password"].as_str() != Some(VALID_PASSWORD) {
                return fail(StatusCode::UNAUTHORIZED, "Invalid email or password");
            }
            let role = if email.starts_with("partner") {
                "PARTNER_ADMIN"
            } else if email.starts_with("viewer") {
                "VIEWER"
            } else {
                "SYSTEM_ADMIN"
            };
            ok(json!({
                "token": mint_token(role),
                "expires_at": null,
                "user": { "role": role, "email": email }
            }))
        }
        ("GET", ["auth", "me"]) => match bearer.as_deref().and_then(decode_role) {
            Some(role) => ok(json!({
                "id": "user_1",
                "email": "ada@xaze.test",
                "role": role.as_str(),
                "name": "Ada"
            })),
            None => fail(StatusCode::UNAUTHORIZED, "Unauthorized"),
        },
        ("GET", ["system", "partners"]) => ok(json!([partner_json()])),
        ("POST", ["system", "partners"]) => {
            if body["slug"] == "taken" {
                return fail(StatusCode::CONFLICT, "Slug already exists");
            }
            ok(json!({
                "partner": partner_json(),
                "admin_user": { "email": "owner@acme.test", "password": "generated-pw" }
            }))
        }
        ("POST", ["system", "partners", _, "topup"]) => ok(json!({ "success": true })),
        ("GET", ["system", "stats", "overview"]) => ok(json!({
            "total_partners": 3,
            "total_tenants": 12,
            "total_users": 40,
            "total_credits": "1500.25"
        })),
        ("GET", ["system", "stats", "usage"]) => fail(StatusCode::INTERNAL_SERVER_ERROR, "boom"),
        ("GET", ["partner", "tenants"]) => ok(json!([tenant_json()])),
        ("POST", ["partner", "tenants"]) => ok(json!({ "id": "tenant_2" })),
        ("PUT", ["partner", "tenants", _]) => ok(json!({ "success": true })),
        ("GET", ["partner", "models"]) => ok(json!([
            { "id": "model_1", "name": "gpt-4o-mini", "rate": "0.001" }
        ])),
        ("GET", ["partner", "transactions"]) => ok(json!([])),
        ("GET", ["credits"]) => {
            if api_key.as_deref() == Some(VALID_API_KEY) {
                ok(json!({ "balance": "10" }))
            } else {
                fail(StatusCode::UNAUTHORIZED, "Invalid API key")
            }
        }
        ("GET", ["knowledge"]) => ok(json!([
            { "id": "kb_1", "name": "FAQ", "description": "Opening hours and prices" }
        ])),
        ("POST", ["chat", "sessions"]) => ok(json!({
            "id": "session_1",
            "knowledge_base_id": body["knowledge_base_id"]
        })),
        ("POST", ["chat", "sessions", _, "messages"]) => ok(json!({ "job_id": "job_1" })),
        ("GET", ["chat", "sessions", _, "history"]) => ok(json!([
            { "role": "user", "content": "hi" },
            { "role": "assistant", "content": ASSISTANT_REPLY }
        ])),
        ("GET", ["chat", "jobs", _]) => {
            if state.break_job_status.load(Ordering::SeqCst) {
                return fail(StatusCode::INTERNAL_SERVER_ERROR, "status unavailable");
            }
            let pending = state
                .pending_polls
                .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
                .is_ok();
            if pending {
                ok(json!({ "status": "pending" }))
            } else if state.fail_jobs.load(Ordering::SeqCst) {
                ok(json!({ "status": "failed", "error": "quota exceeded" }))
            } else {
                ok(json!({ "status": "completed" }))
            }
        }
        _ => fail(StatusCode::NOT_FOUND, "Not found"),
    }
}
