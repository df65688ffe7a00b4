// ABOUTME: Browser session handling: unverified role claims, session cookies and the route guard
// ABOUTME: The role read from a token is a routing hint only; the backend authorizes every call
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Async-IO.org

//! Session module
//!
//! The console never verifies tokens. It decodes the payload segment to pick
//! a dashboard and leaves every authorization decision to the backend.

/// Unverified role claim decoding
pub mod claims;
/// Session cookie parsing and `Set-Cookie` construction
pub mod cookies;
/// Path and role based redirect decisions
pub mod guard;

pub use claims::{decode_claims, decode_role, TokenClaims};
pub use cookies::{clear_session_cookie, get_cookie_value, session_cookie, session_max_age};
pub use guard::{evaluate, RouteDecision};
