// ABOUTME: Toast notifications and the success envelope returned by console mutations
// ABOUTME: Tells the renderer what to announce and whether to re-fetch page data
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Async-IO.org

use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use serde_json::Value;

/// Severity of a toast
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ToastLevel {
    /// Completed action
    Success,
    /// Neutral notice
    Info,
    /// Failed action
    Error,
}

/// Transient message shown to the user
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Toast {
    /// Severity
    pub level: ToastLevel,
    /// Text
    pub message: String,
}

impl Toast {
    /// Success toast
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            level: ToastLevel::Success,
            message: message.into(),
        }
    }

    /// Informational toast
    pub fn info(message: impl Into<String>) -> Self {
        Self {
            level: ToastLevel::Info,
            message: message.into(),
        }
    }

    /// Error toast
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: ToastLevel::Error,
            message: message.into(),
        }
    }
}

/// Successful mutation: `{success: true, toast, refresh, data?}`
///
/// Failures are rendered by `ActionError` as `{error}` instead.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ActionOutcome {
    /// Always `true`
    pub success: bool,
    /// Message to announce
    pub toast: Toast,
    /// Whether page data must be fetched again
    pub refresh: bool,
    /// Payload returned by the backend, when the page needs it
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

impl ActionOutcome {
    /// Completed mutation; the page refreshes
    pub fn done(message: impl Into<String>) -> Self {
        Self {
            success: true,
            toast: Toast::success(message),
            refresh: true,
            data: None,
        }
    }

    /// Nothing was sent; the page keeps its data
    pub fn unchanged(message: impl Into<String>) -> Self {
        Self {
            success: true,
            toast: Toast::info(message),
            refresh: false,
            data: None,
        }
    }

    /// Neutral state change such as signing out; the page refreshes
    pub fn notice(message: impl Into<String>) -> Self {
        Self {
            success: true,
            toast: Toast::info(message),
            refresh: true,
            data: None,
        }
    }

    /// Attach a payload
    #[must_use]
    pub fn with_data(mut self, data: Value) -> Self {
        self.data = Some(data);
        self
    }

    /// Attach a serializable payload; unserializable values are dropped
    #[must_use]
    pub fn with<T: Serialize>(self, data: &T) -> Self {
        match serde_json::to_value(data) {
            Ok(value) => self.with_data(value),
            Err(e) => {
                tracing::error!(error = %e, "Failed to encode action payload");
                self
            }
        }
    }
}

impl IntoResponse for ActionOutcome {
    fn into_response(self) -> Response {
        Json(self).into_response()
    }
}
