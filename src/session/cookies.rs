// ABOUTME: Session cookie parsing and Set-Cookie header construction
// ABOUTME: HttpOnly, SameSite=Lax, Path=/ and Secure in production
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Async-IO.org

use chrono::Utc;

use crate::config::SessionConfig;

/// Value of a named cookie in a `Cookie` header
#[must_use]
pub fn get_cookie_value(cookie_header: &str, name: &str) -> Option<String> {
    cookie_header.split(';').find_map(|pair| {
        let (key, value) = pair.trim().split_once('=')?;
        (key.trim() == name && !value.is_empty()).then(|| value.trim().to_owned())
    })
}

/// Cookie lifetime for a backend expiry, falling back to the configured default
///
/// An expiry already in the past yields zero, which expires the cookie.
/// Out-of-range expiries saturate instead of overflowing.
#[must_use]
pub fn session_max_age(expires_at: Option<i64>, now: i64, default_ttl_secs: i64) -> i64 {
    expires_at.map_or(default_ttl_secs, |expiry| expiry.saturating_sub(now).max(0))
}

/// `Set-Cookie` value storing a session token
#[must_use]
pub fn session_cookie(config: &SessionConfig, token: &str, expires_at: Option<i64>) -> String {
    let max_age = session_max_age(expires_at, Utc::now().timestamp(), config.default_ttl_secs);
    build_cookie(config, token, max_age)
}

/// `Set-Cookie` value deleting the session cookie
#[must_use]
pub fn clear_session_cookie(config: &SessionConfig) -> String {
    build_cookie(config, "", 0)
}

fn build_cookie(config: &SessionConfig, value: &str, max_age: i64) -> String {
    let secure = if config.secure { "; Secure" } else { "" };
    format!(
        "{}={value}; HttpOnly{secure}; Path=/; SameSite=Lax; Max-Age={max_age}",
        config.cookie_name
    )
}
