// ABOUTME: Login, logout and current-user routes for the cookie session
// ABOUTME: Login stores the backend token in an HttpOnly cookie and answers with the role's home
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Async-IO.org

//! Authentication routes
//!
//! The console never sees passwords beyond forwarding them once. The token
//! returned by the backend goes straight into the session cookie.

use axum::{
    extract::State,
    http::header::SET_COOKIE,
    response::{IntoResponse, Redirect, Response},
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use std::sync::Arc;

use super::{render_page, SessionCredentials};
use crate::client::Credentials;
use crate::constants::routes;
use crate::errors::ActionError;
use crate::logging::AppLogger;
use crate::server::ServerResources;
use crate::session::{clear_session_cookie, decode_claims, session_cookie};
use crate::views::notifications::Toast;
use xaze_core::models::{LoginRequest, Role};

/// Body answered by a successful login
#[derive(Debug, Clone, Serialize)]
pub struct LoginResponse {
    /// Always `true`
    pub success: bool,
    /// Role of the signed-in account
    pub role: Role,
    /// Page to open next, absent for roles without a dashboard
    #[serde(skip_serializing_if = "Option::is_none")]
    pub redirect: Option<&'static str>,
    /// Toast to show
    pub toast: Toast,
}

#[derive(Serialize)]
struct AuthPage {
    form: &'static str,
}

/// Authentication routes
pub struct AuthRoutes;

impl AuthRoutes {
    /// Create all authentication routes
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route("/", get(Self::handle_root))
            .route(routes::LOGIN, get(Self::handle_login_page))
            .route(routes::REGISTER, get(Self::handle_register_page))
            .route(routes::LOGOUT, get(Self::handle_logout_redirect))
            .route("/api/auth/login", post(Self::handle_login))
            .route("/api/auth/logout", post(Self::handle_logout))
            .route("/api/auth/me", get(Self::handle_me))
            .with_state(resources)
    }

    /// Signed-in users with a known role never get here; the guard sends them home
    async fn handle_root() -> Redirect {
        Redirect::temporary(routes::LOGIN)
    }

    async fn handle_login_page(State(resources): State<Arc<ServerResources>>) -> Response {
        render_page(&resources, routes::LOGIN, None, AuthPage { form: "login" }).await
    }

    async fn handle_register_page(State(resources): State<Arc<ServerResources>>) -> Response {
        render_page(&resources, routes::REGISTER, None, AuthPage { form: "register" }).await
    }

    async fn handle_login(
        State(resources): State<Arc<ServerResources>>,
        Json(request): Json<LoginRequest>,
    ) -> Result<Response, ActionError> {
        let session = resources.client.login(&request).await?;
        let cookie = session_cookie(&resources.config.session, &session.token, session.expires_at);
        let role = session.user.role;
        let redirect = role.home();
        let body = LoginResponse {
            success: true,
            role,
            redirect,
            toast: if redirect.is_some() {
                Toast::success("Login successful")
            } else {
                Toast::error("Unauthorized role")
            },
        };
        Ok(([(SET_COOKIE, cookie)], Json(body)).into_response())
    }

    async fn handle_logout(
        State(resources): State<Arc<ServerResources>>,
        credentials: SessionCredentials,
    ) -> Response {
        Self::log_logout(&credentials);
        let cookie = clear_session_cookie(&resources.config.session);
        (
            [(SET_COOKIE, cookie)],
            Json(serde_json::json!({ "success": true, "redirect": routes::LOGIN })),
        )
            .into_response()
    }

    async fn handle_logout_redirect(
        State(resources): State<Arc<ServerResources>>,
        credentials: SessionCredentials,
    ) -> Response {
        Self::log_logout(&credentials);
        let cookie = clear_session_cookie(&resources.config.session);
        ([(SET_COOKIE, cookie)], Redirect::to(routes::LOGIN)).into_response()
    }

    async fn handle_me(
        State(resources): State<Arc<ServerResources>>,
        credentials: SessionCredentials,
    ) -> Result<Response, ActionError> {
        let user = resources
            .client
            .current_user(credentials.get())
            .await
            .ok_or_else(ActionError::unauthorized)?;
        Ok(Json(user).into_response())
    }

    fn log_logout(credentials: &SessionCredentials) {
        let subject = match credentials.get() {
            Some(Credentials::Session(token)) => {
                decode_claims(token).and_then(|claims| claims.sub)
            }
            _ => None,
        };
        AppLogger::log_auth_event(subject.as_deref().unwrap_or("anonymous"), "logout", true, None);
    }
}
