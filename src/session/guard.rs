// ABOUTME: Pure route-guard decision from a request path and an optional session token
// ABOUTME: Sends anonymous users to login and mis-scoped users to their own dashboard
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Async-IO.org

use xaze_core::models::Role;

use super::claims::decode_role;
use crate::constants::routes;

/// Outcome of evaluating a request against the guard
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouteDecision {
    /// Serve the request
    Pass,
    /// Answer with a temporary redirect to this path
    Redirect(&'static str),
}

/// Whether `path` is `prefix` or lies under it as a string prefix
fn under(path: &str, prefix: &str) -> bool {
    path.starts_with(prefix)
}

fn is_auth_route(path: &str) -> bool {
    under(path, routes::LOGIN) || under(path, routes::REGISTER)
}

/// Decide whether a request may proceed
///
/// The token is decoded without verification. A token whose payload cannot
/// be read behaves as a token with no role.
#[must_use]
pub fn evaluate(path: &str, token: Option<&str>) -> RouteDecision {
    let Some(token) = token.filter(|t| !t.is_empty()) else {
        let protected =
            path == "/" || under(path, routes::SYSTEM_HOME) || under(path, routes::PARTNER_HOME);
        return if protected {
            RouteDecision::Redirect(routes::LOGIN)
        } else {
            RouteDecision::Pass
        };
    };

    let role = decode_role(token);

    if path == "/" || is_auth_route(path) {
        if let Some(home) = role.as_ref().and_then(Role::home) {
            return RouteDecision::Redirect(home);
        }
    }

    if under(path, routes::SYSTEM_HOME) && role != Some(Role::SystemAdmin) {
        return RouteDecision::Redirect(if role == Some(Role::PartnerAdmin) {
            routes::PARTNER_HOME
        } else {
            routes::LOGIN
        });
    }

    if under(path, routes::PARTNER_HOME) && role != Some(Role::PartnerAdmin) {
        return RouteDecision::Redirect(if role == Some(Role::SystemAdmin) {
            routes::SYSTEM_HOME
        } else {
            routes::LOGIN
        });
    }

    RouteDecision::Pass
}
