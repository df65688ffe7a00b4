// ABOUTME: Platform statistics DTOs for the system dashboard
// ABOUTME: Usage maps are keyed by model name and keep a stable order
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Async-IO.org

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Headline platform counters
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SystemOverview {
    /// Partners on the platform
    #[serde(default)]
    pub total_partners: u64,
    /// Tenants on the platform
    #[serde(default)]
    pub total_tenants: u64,
    /// Users on the platform
    #[serde(default)]
    pub total_users: u64,
    /// Credits across all wallets, decimal string
    #[serde(default)]
    pub total_credits: String,
}

/// Token usage and revenue breakdown
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SystemUsage {
    /// Tokens consumed
    #[serde(default)]
    pub total_tokens: u64,
    /// Tokens per model
    #[serde(default)]
    pub tokens_by_model: BTreeMap<String, u64>,
    /// Cost per model, decimal strings
    #[serde(default)]
    pub cost_by_model: BTreeMap<String, String>,
    /// Revenue per model, decimal strings
    #[serde(default)]
    pub revenue_by_model: BTreeMap<String, String>,
    /// Tenants with traffic in the last day
    #[serde(default)]
    pub active_tenants_24h: u64,
}
