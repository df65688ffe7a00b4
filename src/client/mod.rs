// ABOUTME: Backend action layer: one-shot HTTP calls with explicit credentials
// ABOUTME: Every failure resolves to an ActionError; nothing is retried and nothing times out
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Async-IO.org

//! # Backend Action Layer
//!
//! Each action builds a [`Call`], attaches credentials, sends it once and
//! unwraps the `{data: ...}` envelope. Non-2xx responses become
//! `ActionError::Backend` carrying the backend's `error` string or the
//! action's fallback message. Transport failures become
//! `ActionError::Network` with a generic message.

/// Login, logout support and the current user
pub mod auth;
/// Response envelope helpers
pub mod envelope;
/// Partner-admin actions
pub mod partner;
/// API-key scoped playground actions
pub mod playground;
/// System-admin actions
pub mod system;

use reqwest::{Client, Method, RequestBuilder};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::fmt;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, error};

use crate::config::BackendConfig;
use crate::constants::headers;
use crate::errors::{ActionError, ActionErrorKind, ActionResult, GENERIC_FAILURE};
use crate::logging::AppLogger;

use envelope::{error_message, unwrap_data, unwrap_list};

/// Credentials attached to an outbound backend call
#[derive(Clone, PartialEq, Eq)]
pub enum Credentials {
    /// Session token from the `token` cookie, sent as a bearer token
    Session(String),
    /// Playground API key, sent as `X-API-Key`
    ApiKey(String),
}

impl Credentials {
    /// Session credentials from an optional token, rejecting empty values
    #[must_use]
    pub fn session(token: Option<&str>) -> Option<Self> {
        token
            .filter(|t| !t.trim().is_empty())
            .map(|t| Self::Session(t.to_owned()))
    }

    /// API-key credentials from an optional key, rejecting empty values
    #[must_use]
    pub fn api_key(key: Option<&str>) -> Option<Self> {
        key.map(str::trim)
            .filter(|k| !k.is_empty())
            .map(|k| Self::ApiKey(k.to_owned()))
    }

    fn apply(&self, builder: RequestBuilder) -> RequestBuilder {
        match self {
            Self::Session(token) => builder.bearer_auth(token),
            Self::ApiKey(key) => builder.header(headers::API_KEY, key),
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Session(_) => f.write_str("Credentials::Session(<redacted>)"),
            Self::ApiKey(_) => f.write_str("Credentials::ApiKey(<redacted>)"),
        }
    }
}

/// Credentials for a call that requires them, `Unauthorized` when missing
///
/// # Errors
///
/// Returns `ActionError::Unauthorized` when `credentials` is `None`
pub fn require(credentials: Option<&Credentials>) -> ActionResult<&Credentials> {
    credentials.ok_or_else(ActionError::unauthorized)
}

/// Description of one backend call
#[derive(Debug, Clone)]
pub struct Call {
    method: Method,
    path: String,
    credentials: Option<Credentials>,
    query: Vec<(&'static str, String)>,
    body: Option<Value>,
    fallback: &'static str,
    opaque: bool,
    status_fallback: Option<&'static str>,
    network_message: Option<&'static str>,
}

impl Call {
    fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            credentials: None,
            query: Vec::new(),
            body: None,
            fallback: GENERIC_FAILURE,
            opaque: false,
            status_fallback: None,
            network_message: None,
        }
    }

    /// `GET` a backend path
    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    /// `POST` to a backend path
    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::POST, path)
    }

    /// `PUT` to a backend path
    pub fn put(path: impl Into<String>) -> Self {
        Self::new(Method::PUT, path)
    }

    /// `DELETE` a backend path
    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::DELETE, path)
    }

    /// Attach credentials
    #[must_use]
    pub fn auth(mut self, credentials: &Credentials) -> Self {
        self.credentials = Some(credentials.clone());
        self
    }

    /// Append a query parameter
    #[must_use]
    pub fn query(mut self, key: &'static str, value: impl ToString) -> Self {
        self.query.push((key, value.to_string()));
        self
    }

    /// Attach a JSON body
    ///
    /// # Errors
    ///
    /// Returns `ActionError::Decode` if the body cannot be represented as JSON
    pub fn json<T: Serialize + ?Sized>(mut self, body: &T) -> ActionResult<Self> {
        let value = serde_json::to_value(body).map_err(|e| {
            error!(error = %e, "Failed to encode request body");
            ActionError::decode(GENERIC_FAILURE)
        })?;
        self.body = Some(value);
        Ok(self)
    }

    /// Message used when a failure body carries no `error` string
    #[must_use]
    pub const fn fallback(mut self, message: &'static str) -> Self {
        self.fallback = message;
        self
    }

    /// Always report the fallback, ignoring the backend's message
    #[must_use]
    pub const fn opaque(mut self) -> Self {
        self.opaque = true;
        self
    }

    /// Report `"<prefix> <status>"` when a failure body is not JSON
    #[must_use]
    pub const fn status_fallback(mut self, prefix: &'static str) -> Self {
        self.status_fallback = Some(prefix);
        self
    }

    /// Message used for transport failures instead of the generic one
    #[must_use]
    pub const fn network_message(mut self, message: &'static str) -> Self {
        self.network_message = Some(message);
        self
    }

    /// Backend path of the call
    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }

    fn failure_message(&self, status: u16, body: Option<&Value>) -> String {
        if self.opaque {
            return self.fallback.to_owned();
        }
        match body {
            Some(json) => error_message(json).unwrap_or_else(|| self.fallback.to_owned()),
            None => self.status_fallback.map_or_else(
                || self.fallback.to_owned(),
                |prefix| format!("{prefix} {status}"),
            ),
        }
    }
}

/// HTTP client for the backend API
///
/// Cheap to clone; clones share one connection pool.
#[derive(Clone)]
pub struct BackendClient {
    http: Client,
    base_url: Arc<str>,
}

impl BackendClient {
    /// Create a client for the configured backend
    #[must_use]
    pub fn new(config: &BackendConfig) -> Self {
        Self::with_http(Client::new(), config)
    }

    /// Create a client around an existing `reqwest::Client`
    #[must_use]
    pub fn with_http(http: Client, config: &BackendConfig) -> Self {
        Self {
            http,
            base_url: Arc::from(config.base_url.as_str()),
        }
    }

    /// Base URL without a trailing slash
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Send a call and return the unwrapped success payload as JSON
    ///
    /// # Errors
    ///
    /// Returns an `ActionError` for non-2xx statuses and transport failures
    pub async fn send(&self, call: &Call) -> ActionResult<Value> {
        let url = format!("{}{}", self.base_url, call.path);
        let mut builder = self.http.request(call.method.clone(), &url);
        if !call.query.is_empty() {
            builder = builder.query(&call.query);
        }
        if let Some(credentials) = &call.credentials {
            builder = credentials.apply(builder);
        }
        if let Some(body) = &call.body {
            builder = builder.json(body);
        }

        let started = Instant::now();
        let network_failure = |e: &reqwest::Error| {
            AppLogger::log_backend_call(
                call.method.as_str(),
                &call.path,
                None,
                started.elapsed().as_millis() as u64,
            );
            error!(path = %call.path, error = %e, "Backend request failed");
            ActionError::new(
                ActionErrorKind::Network,
                call.network_message.unwrap_or(GENERIC_FAILURE),
            )
        };

        let response = builder.send().await.map_err(|e| network_failure(&e))?;
        let status = response.status();
        let bytes = response.bytes().await.map_err(|e| network_failure(&e))?;
        AppLogger::log_backend_call(
            call.method.as_str(),
            &call.path,
            Some(status.as_u16()),
            started.elapsed().as_millis() as u64,
        );

        let parsed: Option<Value> = if bytes.is_empty() {
            None
        } else {
            serde_json::from_slice(&bytes).ok()
        };

        if !status.is_success() {
            let message = call.failure_message(status.as_u16(), parsed.as_ref());
            return Err(ActionError::backend(status.as_u16(), message));
        }

        Ok(parsed.map_or(Value::Null, unwrap_data))
    }

    /// Send a call and decode the payload
    ///
    /// # Errors
    ///
    /// Returns `ActionError::Decode` when the payload does not match `T`
    pub async fn fetch<T: DeserializeOwned>(&self, call: &Call) -> ActionResult<T> {
        let value = self.send(call).await?;
        decode(call, value)
    }

    /// Send a call whose payload is a list; a missing list decodes as empty
    ///
    /// # Errors
    ///
    /// Returns an `ActionError` on failure or when items do not match `T`
    pub async fn fetch_list<T: DeserializeOwned>(&self, call: &Call) -> ActionResult<Vec<T>> {
        let value = unwrap_list(self.send(call).await?);
        decode(call, value)
    }

    /// Send a call and discard the payload
    ///
    /// # Errors
    ///
    /// Returns an `ActionError` on failure
    pub async fn submit(&self, call: &Call) -> ActionResult<()> {
        self.send(call).await.map(|_| ())
    }

    /// Whether a call succeeds; all failures are `false`
    pub async fn succeeds(&self, call: &Call) -> bool {
        match self.send(call).await {
            Ok(_) => true,
            Err(e) => {
                debug!(path = %call.path, error = %e, "Call failed");
                false
            }
        }
    }
}

fn decode<T: DeserializeOwned>(call: &Call, value: Value) -> ActionResult<T> {
    serde_json::from_value(value).map_err(|e| {
        error!(path = %call.path, error = %e, "Unexpected backend response shape");
        ActionError::decode(call.fallback)
    })
}

/// Percent-encode one path segment
#[must_use]
pub fn segment(value: &str) -> String {
    urlencoding::encode(value).into_owned()
}
