// ABOUTME: Login and current-user actions against the backend auth endpoints
// ABOUTME: Login failures carry the backend message, a status fallback or a generic retry hint
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Async-IO.org

use serde_json::Value;
use tracing::{debug, warn};

use super::{BackendClient, Call, Credentials};
use crate::constants::backend;
use crate::errors::{ActionError, ActionErrorKind, ActionResult};
use crate::logging::AppLogger;
use xaze_core::models::{LoginRequest, LoginSession, User};

const LOGIN_FAILED: &str = "Login failed.";
const LOGIN_FAILED_STATUS: &str = "Login failed with status";
const LOGIN_UNREACHABLE: &str = "Something went wrong. Please try again.";

impl BackendClient {
    /// Exchange e-mail and password for a session
    ///
    /// # Errors
    ///
    /// Returns a validation error when either field is empty, the backend's
    /// message on rejection, and a generic retry hint when the backend is
    /// unreachable or answers with an unexpected body
    pub async fn login(&self, request: &LoginRequest) -> ActionResult<LoginSession> {
        if request.email.is_empty() || request.password.is_empty() {
            return Err(ActionError::validation("Email and password are required."));
        }

        let call = Call::post(backend::AUTH_LOGIN)
            .json(request)?
            .fallback(LOGIN_FAILED)
            .status_fallback(LOGIN_FAILED_STATUS)
            .network_message(LOGIN_UNREACHABLE);

        match self.fetch::<LoginSession>(&call).await {
            Ok(session) => {
                AppLogger::log_auth_event(
                    &request.email,
                    "login",
                    true,
                    Some(session.user.role.as_str()),
                );
                Ok(session)
            }
            Err(e) if e.kind == ActionErrorKind::Decode => {
                AppLogger::log_auth_event(&request.email, "login", false, Some("unexpected response"));
                Err(ActionError::new(ActionErrorKind::Network, LOGIN_UNREACHABLE))
            }
            Err(e) => {
                AppLogger::log_auth_event(&request.email, "login", false, Some(&e.message));
                Err(e)
            }
        }
    }

    /// The signed-in user, or `None` when there is no usable session
    ///
    /// Every failure, including a payload without an `id`, reads as signed out.
    pub async fn current_user(&self, credentials: Option<&Credentials>) -> Option<User> {
        let credentials = credentials?;
        let call = Call::get(backend::AUTH_ME).auth(credentials);
        let value = match self.send(&call).await {
            Ok(value) => value,
            Err(e) => {
                debug!(error = %e, "Current user lookup failed");
                return None;
            }
        };
        let has_id = value
            .get("id")
            .and_then(Value::as_str)
            .is_some_and(|id| !id.is_empty());
        if !has_id {
            warn!("Current user payload has no id");
            return None;
        }
        serde_json::from_value(value)
            .map_err(|e| warn!(error = %e, "Current user payload did not decode"))
            .ok()
    }
}
