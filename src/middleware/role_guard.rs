// ABOUTME: Axum middleware applying the role guard to every page request
// ABOUTME: Redirects with 307 and exposes the raw session token to handlers via extensions
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Async-IO.org

//! Role Guard Middleware
//!
//! Runs before routing. Paths under `/api` are never redirected, matching the
//! behaviour of JSON clients that expect an error body rather than a page.

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use http::header::COOKIE;
use std::sync::Arc;

use crate::logging::AppLogger;
use crate::server::ServerResources;
use crate::session::{decode_role, evaluate, get_cookie_value, RouteDecision};

/// Session token carried by the request, inserted by [`role_guard_middleware`]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionToken(pub Option<String>);

impl SessionToken {
    /// Token value when present
    #[must_use]
    pub fn as_deref(&self) -> Option<&str> {
        self.0.as_deref()
    }
}

/// Prefix for JSON endpoints that bypass the guard
pub const API_PREFIX: &str = "/api";

/// Evaluate the role guard for the request path and session cookie
pub async fn role_guard_middleware(
    State(resources): State<Arc<ServerResources>>,
    mut req: Request,
    next: Next,
) -> Response {
    let token = req
        .headers()
        .get_all(COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .find_map(|header| get_cookie_value(header, &resources.config.session.cookie_name));

    let path = req.uri().path().to_owned();
    if !path.starts_with(API_PREFIX) {
        if let RouteDecision::Redirect(target) = evaluate(&path, token.as_deref()) {
            let role = token.as_deref().and_then(decode_role);
            AppLogger::log_guard_redirect(&path, target, role.as_ref().map(|r| r.as_str()));
            return Redirect::temporary(target).into_response();
        }
    }

    req.extensions_mut().insert(SessionToken(token));
    next.run(req).await
}
