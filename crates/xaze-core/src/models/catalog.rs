// ABOUTME: Model and provider catalog DTOs for system settings and partner pricing
// ABOUTME: Provider updates only carry an API key or priority when one was supplied
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Async-IO.org

use serde::{Deserialize, Serialize};

/// Model priced by the platform
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SystemModel {
    /// Model id
    pub id: String,
    /// Display name
    pub name: String,
    /// Base cost per unit, decimal string
    #[serde(default)]
    pub base_cost: String,
    /// Whether tenants may use it
    #[serde(default)]
    pub enabled: bool,
    /// Model type, e.g. `chat`
    #[serde(rename = "type", default)]
    pub model_type: String,
    /// Provider name
    #[serde(default)]
    pub provider: String,
    /// Last update timestamp
    #[serde(default)]
    pub updated_at: String,
}

/// Model as offered to a partner, with the partner's wholesale rate
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PartnerModel {
    /// Model id
    pub id: String,
    /// Display name
    pub name: String,
    /// Rate charged to the partner, decimal string
    pub rate: String,
}

/// Upstream inference provider
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SystemProvider {
    /// Provider id
    pub id: String,
    /// Provider name
    pub name: String,
    /// Models registered under it
    #[serde(default)]
    pub model_count: u64,
    /// Models currently enabled
    #[serde(default)]
    pub enabled_model_count: u64,
    /// Whether the provider is in rotation
    #[serde(default)]
    pub enabled: bool,
}

/// Body for `PUT /system/config/models/{id}`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UpdateModelRequest {
    /// Display name
    pub name: String,
    /// Base cost per unit
    pub base_cost: f64,
    /// Availability toggle
    pub enabled: bool,
}

/// Body for `PUT /system/config/providers/{id}`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UpdateProviderRequest {
    /// Provider name
    pub name: String,
    /// Rotation toggle
    pub enabled: bool,
    /// Replacement upstream key
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    /// Routing priority
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<i64>,
}
