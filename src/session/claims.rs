// ABOUTME: Decodes the payload segment of a backend token without verifying its signature
// ABOUTME: Malformed tokens yield no role instead of an error
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Async-IO.org

use base64::engine::general_purpose::{URL_SAFE, URL_SAFE_NO_PAD};
use base64::Engine;
use serde::Deserialize;
use xaze_core::models::Role;

/// Claims the console reads from a token
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct TokenClaims {
    /// Role claim
    #[serde(default)]
    pub role: Option<Role>,
    /// Subject
    #[serde(default)]
    pub sub: Option<String>,
    /// Expiry as Unix seconds
    #[serde(default)]
    pub exp: Option<i64>,
}

/// Decode the payload of a `header.payload.signature` token
///
/// Returns `None` for anything that is not three dot-separated segments with
/// a base64url JSON object in the middle.
#[must_use]
pub fn decode_claims(token: &str) -> Option<TokenClaims> {
    let mut segments = token.split('.');
    let (_, payload, _) = (segments.next()?, segments.next()?, segments.next()?);
    if segments.next().is_some() {
        return None;
    }
    let bytes = URL_SAFE_NO_PAD
        .decode(payload)
        .or_else(|_| URL_SAFE.decode(payload))
        .ok()?;
    serde_json::from_slice(&bytes).ok()
}

/// Role claim of a token, `None` when absent or malformed
#[must_use]
pub fn decode_role(token: &str) -> Option<Role> {
    decode_claims(token)?.role
}

#[cfg(test)]
mod tests {
    use super::*;

    fn token_with(payload: &str) -> String {
        format!(
            "{}.{}.sig",
            URL_SAFE_NO_PAD.encode(br#"{"alg":"HS256"}"#),
            URL_SAFE_NO_PAD.encode(payload.as_bytes())
        )
    }

    #[test]
    fn test_decodes_role() {
        let token = token_with(r#"{"sub":"u1","role":"PARTNER_ADMIN","exp":1}"#);
        assert_eq!(decode_role(&token), Some(Role::PartnerAdmin));
        assert_eq!(decode_claims(&token).and_then(|c| c.sub).as_deref(), Some("u1"));
    }

    #[test]
    fn test_padded_payload_accepted() {
        let token = format!("h.{}.s", URL_SAFE.encode(br#"{"role":"SYSTEM_ADMIN"}"#));
        assert_eq!(decode_role(&token), Some(Role::SystemAdmin));
    }

    #[test]
    fn test_malformed_tokens_have_no_role() {
        assert_eq!(decode_role("garbage"), None);
        assert_eq!(decode_role("a.b"), None);
        assert_eq!(decode_role("a.!!!.c"), None);
        assert_eq!(decode_role(&token_with("not json")), None);
        assert_eq!(decode_role(&token_with(r#"{"sub":"u1"}"#)), None);
        assert_eq!(decode_role("a.b.c.d"), None);
    }
}
