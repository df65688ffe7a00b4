// ABOUTME: API key DTOs shared by partner keys and tenant keys
// ABOUTME: The plaintext key is only ever returned once at creation
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Async-IO.org

use serde::{Deserialize, Serialize};

/// Issued API key, without the secret
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiKeyRecord {
    /// Key id
    pub id: String,
    /// Owning partner, for partner keys
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub partner_id: Option<String>,
    /// Owning tenant, for tenant keys
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tenant_id: Option<String>,
    /// Label
    pub name: String,
    /// Visible key prefix
    #[serde(default)]
    pub prefix: String,
    /// Granted scopes
    #[serde(default)]
    pub scopes: Vec<String>,
    /// Creation timestamp
    #[serde(default)]
    pub created_at: String,
}

/// Body for key creation
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CreateKeyRequest {
    /// Label
    pub name: String,
    /// Scopes to grant
    pub scopes: Vec<String>,
}

impl CreateKeyRequest {
    /// Request with a fixed scope set
    pub fn with_scopes(name: impl Into<String>, scopes: &[&str]) -> Self {
        Self {
            name: name.into(),
            scopes: scopes.iter().map(|s| (*s).to_owned()).collect(),
        }
    }
}

/// Key creation result
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatedKey {
    /// Plaintext key, shown once
    pub api_key: String,
    /// Stored key record
    #[serde(default)]
    pub details: Option<ApiKeyRecord>,
}
