// ABOUTME: Route module organization for the console's pages and JSON endpoints
// ABOUTME: Shared credential extractors and the page rendering helper live here
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Async-IO.org

//! Route module for the Xaze console
//!
//! Page routes (`/system`, `/partner`, `/playground`, `/login`) answer with a
//! [`PageView`] whose frame carries branding, the sidebar and the signed-in
//! user. JSON routes live under `/api` and answer with either data or an
//! [`crate::views::notifications::ActionOutcome`]. Failures are rendered by
//! `ActionError` as `{"error": message}`.

/// Login, logout and current user
pub mod auth;
/// Health and readiness checks
pub mod health;
/// Partner-admin pages and actions
pub mod partner;
/// API-key scoped playground endpoints and chat
pub mod playground;
/// System-admin pages and actions
pub mod system;

pub use auth::AuthRoutes;
pub use health::HealthRoutes;
pub use partner::PartnerRoutes;
pub use playground::PlaygroundRoutes;
pub use system::SystemRoutes;

use async_trait::async_trait;
use axum::{
    extract::FromRequestParts,
    response::{IntoResponse, Response},
    Json,
};
use http::request::Parts;
use serde::Serialize;
use std::convert::Infallible;
use tracing::warn;

use crate::client::Credentials;
use crate::constants::headers;
use crate::errors::{ActionError, ActionResult};
use crate::middleware::SessionToken;
use crate::server::ServerResources;
use crate::views::{PageFrame, PageView};

/// Session credentials from the guard's [`SessionToken`] extension
#[derive(Debug, Clone, Default)]
pub struct SessionCredentials(pub Option<Credentials>);

impl SessionCredentials {
    /// Credentials when signed in
    #[must_use]
    pub const fn get(&self) -> Option<&Credentials> {
        self.0.as_ref()
    }
}

#[async_trait]
impl<S: Send + Sync> FromRequestParts<S> for SessionCredentials {
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let token = parts
            .extensions
            .get::<SessionToken>()
            .and_then(SessionToken::as_deref);
        Ok(Self(Credentials::session(token)))
    }
}

/// Playground API key from the `X-API-Key` header
#[derive(Debug, Clone, Default)]
pub struct PlaygroundKey(pub Option<Credentials>);

impl PlaygroundKey {
    /// Key when supplied
    #[must_use]
    pub const fn get(&self) -> Option<&Credentials> {
        self.0.as_ref()
    }

    /// Key, or `Unauthorized`
    ///
    /// # Errors
    ///
    /// Returns `ActionError::Unauthorized` when the header is missing or blank
    pub fn require(&self) -> ActionResult<&Credentials> {
        self.get().ok_or_else(ActionError::unauthorized)
    }
}

#[async_trait]
impl<S: Send + Sync> FromRequestParts<S> for PlaygroundKey {
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let key = parts
            .headers
            .get(headers::API_KEY)
            .and_then(|value| value.to_str().ok());
        Ok(Self(Credentials::api_key(key)))
    }
}

/// Render a page: frame for `path` plus `content`
///
/// The signed-in user is looked up for the sidebar badge; a failed lookup
/// renders the page without one.
pub async fn render_page<T: Serialize>(
    resources: &ServerResources,
    path: &str,
    credentials: Option<&Credentials>,
    content: T,
) -> Response {
    let user = resources.client.current_user(credentials).await;
    Json(PageView {
        frame: PageFrame::for_path(path, user.as_ref()),
        content,
    })
    .into_response()
}

/// List for a page, empty when the backend call fails
pub fn or_empty<T>(result: ActionResult<Vec<T>>, what: &str) -> Vec<T> {
    result.unwrap_or_else(|e| {
        warn!(list = what, error = %e, "Rendering page with an empty list");
        Vec::new()
    })
}

/// Value for a page, `None` when the backend call fails
pub fn or_none<T>(result: ActionResult<T>, what: &str) -> Option<T> {
    result
        .map_err(|e| warn!(item = what, error = %e, "Rendering page without data"))
        .ok()
}

/// JSON data response
pub fn data<T: Serialize>(value: &T) -> Response {
    Json(value).into_response()
}
