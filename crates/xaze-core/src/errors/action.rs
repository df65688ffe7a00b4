// ABOUTME: Action-boundary error that every backend call resolves to on failure
// ABOUTME: Renders as {"error": message} and maps failure kinds onto HTTP status codes
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Async-IO.org

use serde::{Serialize, Serializer};
use std::fmt;
use thiserror::Error;

/// Fallback message when nothing more specific is known
pub const GENERIC_FAILURE: &str = "An unexpected error occurred";

/// Classification of an action failure
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionErrorKind {
    /// No session token or API key was available
    Unauthorized,
    /// Input was rejected before any network call
    Validation,
    /// Backend answered with a non-2xx status
    Backend {
        /// HTTP status returned by the backend
        status: u16,
    },
    /// Request never produced a response
    Network,
    /// Backend answered 2xx but the body did not match the expected shape
    Decode,
}

/// Failure of a single console action
///
/// Serializes to the wire shape `{"error": "<message>"}`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub struct ActionError {
    /// What went wrong
    pub kind: ActionErrorKind,
    /// Message safe to show to the user
    pub message: String,
}

/// Result of a console action
pub type ActionResult<T> = Result<T, ActionError>;

impl ActionError {
    /// Create an error of the given kind
    pub fn new(kind: ActionErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    /// Missing credentials
    #[must_use]
    pub fn unauthorized() -> Self {
        Self::new(ActionErrorKind::Unauthorized, "Unauthorized")
    }

    /// Client-side validation failure
    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(ActionErrorKind::Validation, message)
    }

    /// Backend rejected the call
    pub fn backend(status: u16, message: impl Into<String>) -> Self {
        Self::new(ActionErrorKind::Backend { status }, message)
    }

    /// Transport failure
    #[must_use]
    pub fn network() -> Self {
        Self::new(ActionErrorKind::Network, GENERIC_FAILURE)
    }

    /// Unexpected response body
    pub fn decode(message: impl Into<String>) -> Self {
        Self::new(ActionErrorKind::Decode, message)
    }

    /// Whether the error was raised before contacting the backend
    #[must_use]
    pub const fn is_local(&self) -> bool {
        matches!(
            self.kind,
            ActionErrorKind::Unauthorized | ActionErrorKind::Validation
        )
    }

    /// HTTP status the console answers with for this error
    #[must_use]
    pub const fn http_status(&self) -> u16 {
        match self.kind {
            ActionErrorKind::Unauthorized => 401,
            ActionErrorKind::Validation => 400,
            ActionErrorKind::Backend { status } if status >= 400 && status < 500 => status,
            ActionErrorKind::Backend { .. } | ActionErrorKind::Network | ActionErrorKind::Decode => {
                502
            }
        }
    }
}

impl fmt::Display for ActionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl Serialize for ActionError {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        use serde::ser::SerializeStruct;
        let mut state = serializer.serialize_struct("ActionError", 1)?;
        state.serialize_field("error", &self.message)?;
        state.end()
    }
}

#[cfg(feature = "http-response")]
impl axum::response::IntoResponse for ActionError {
    fn into_response(self) -> axum::response::Response {
        let status =
            http::StatusCode::from_u16(self.http_status()).unwrap_or(http::StatusCode::BAD_GATEWAY);
        (status, axum::Json(self)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serializes_to_error_envelope() {
        let json = serde_json::to_value(ActionError::validation("Invalid amount")).unwrap();
        assert_eq!(json, serde_json::json!({ "error": "Invalid amount" }));
    }

    #[test]
    fn test_status_mapping() {
        assert_eq!(ActionError::unauthorized().http_status(), 401);
        assert_eq!(ActionError::validation("x").http_status(), 400);
        assert_eq!(ActionError::backend(409, "slug taken").http_status(), 409);
        assert_eq!(ActionError::backend(500, "boom").http_status(), 502);
        assert_eq!(ActionError::network().http_status(), 502);
    }

    #[test]
    fn test_local_errors() {
        assert!(ActionError::unauthorized().is_local());
        assert!(ActionError::validation("x").is_local());
        assert!(!ActionError::network().is_local());
    }
}
