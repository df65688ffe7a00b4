// ABOUTME: Partner, partner profile and wallet request DTOs
// ABOUTME: Wallet amounts arrive from the backend as decimal strings
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Async-IO.org

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::HashMap;

/// Reseller account as listed by the system admin
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Partner {
    /// Partner id
    pub id: String,
    /// Display name
    pub name: String,
    /// URL slug
    pub slug: String,
    /// Billing contact
    #[serde(default)]
    pub contact_email: Option<String>,
    /// Wallet balance, decimal string
    #[serde(default)]
    pub wallet_balance: String,
    /// Credit limit, decimal string
    #[serde(default)]
    pub credit_limit: String,
    /// Creation timestamp
    #[serde(default)]
    pub created_at: String,
    /// Last update timestamp
    #[serde(default)]
    pub updated_at: String,
}

/// Body for `POST /system/partners`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CreatePartnerRequest {
    /// Display name
    pub name: String,
    /// URL slug
    pub slug: String,
    /// Opening wallet balance, passed through as entered
    #[serde(skip_serializing_if = "Option::is_none")]
    pub initial_balance: Option<String>,
    /// Opening credit limit, passed through as entered
    #[serde(skip_serializing_if = "Option::is_none")]
    pub credit_limit: Option<String>,
}

/// Result of creating a partner; includes the generated admin login once
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreatedPartner {
    /// The new partner
    #[serde(default)]
    pub partner: Option<Partner>,
    /// Generated admin account
    #[serde(default)]
    pub admin_user: Option<AdminCredentials>,
}

/// One-time admin credentials returned on partner creation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdminCredentials {
    /// Login e-mail
    pub email: String,
    /// Generated password, shown once
    #[serde(default)]
    pub password: Option<String>,
}

/// Body for wallet top-ups
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct TopupRequest {
    /// Amount to credit, always positive
    pub amount: f64,
}

/// Body for `PUT /system/partners/{id}/credit-limit`
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct CreditLimitRequest {
    /// New credit limit, never negative
    pub credit_limit: f64,
}

/// The signed-in partner's own account
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PartnerProfile {
    /// Wallet balance, decimal string
    #[serde(default)]
    pub wallet_balance: String,
    /// Credit limit, decimal string
    #[serde(default)]
    pub credit_limit: String,
    /// Markup applied to new tenants
    #[serde(default)]
    pub default_tenant_markup_rate: Option<f64>,
    /// Model name to wholesale rate
    #[serde(default)]
    pub system_rates: HashMap<String, String>,
    /// Free-form settings
    #[serde(default)]
    pub settings: Map<String, Value>,
}

/// Body for `PUT /partner/profile`
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct PartnerProfileUpdate {
    /// New default tenant markup
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_tenant_markup_rate: Option<f64>,
}
