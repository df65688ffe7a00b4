// ABOUTME: Partner-owned tenant DTOs with the backend-computed rate block
// ABOUTME: Update payloads carry only the fields that changed
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Async-IO.org

use serde::{Deserialize, Serialize};

use super::FlexNumber;

/// Tenant row as returned by `GET /partner/tenants`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PartnerTenant {
    /// Tenant record
    pub data: TenantRecord,
    /// Pricing computed by the backend
    pub rate: TenantRate,
    /// Wallet balance, decimal string
    #[serde(default)]
    pub balance: String,
}

/// Core tenant fields
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TenantRecord {
    /// Tenant id
    pub id: String,
    /// Owning partner
    #[serde(default)]
    pub partner_id: String,
    /// Display name
    pub name: String,
    /// URL slug
    pub slug: String,
    /// Assigned model
    #[serde(default)]
    pub model_config_id: String,
    /// Creation timestamp
    #[serde(default)]
    pub created_at: String,
    /// Last update timestamp
    #[serde(default)]
    pub updated_at: String,
}

/// Pricing block attached to each tenant
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TenantRate {
    /// Price charged to the tenant, decimal string
    pub final_rate: String,
    /// Markup over the partner cost, absent when the partner default applies
    #[serde(default)]
    pub markup_rate: Option<FlexNumber>,
    /// Model display name
    #[serde(default)]
    pub model_name: String,
    /// Wholesale rate paid by the partner
    #[serde(default)]
    pub partner_cost: Option<String>,
}

/// Body for `POST /partner/tenants`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CreateTenantRequest {
    /// Display name
    pub name: String,
    /// URL slug
    pub slug: String,
    /// Assigned model
    pub model_config_id: String,
    /// Markup override
    #[serde(skip_serializing_if = "Option::is_none")]
    pub markup_rate: Option<f64>,
    /// Opening wallet balance
    #[serde(skip_serializing_if = "Option::is_none")]
    pub initial_balance: Option<f64>,
}

/// Body for `PUT /partner/tenants/{id}`, carrying only changed fields
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct TenantUpdate {
    /// New name
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// New slug
    #[serde(skip_serializing_if = "Option::is_none")]
    pub slug: Option<String>,
    /// New markup override
    #[serde(skip_serializing_if = "Option::is_none")]
    pub markup_rate: Option<f64>,
    /// New model
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model_config_id: Option<String>,
}

impl TenantUpdate {
    /// Whether the update changes nothing
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.slug.is_none()
            && self.markup_rate.is_none()
            && self.model_config_id.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_update_serializes_only_changed_fields() {
        let update = TenantUpdate {
            markup_rate: Some(0.3),
            ..TenantUpdate::default()
        };
        assert!(!update.is_empty());
        assert_eq!(
            serde_json::to_value(&update).unwrap(),
            serde_json::json!({ "markup_rate": 0.3 })
        );
        assert!(TenantUpdate::default().is_empty());
    }

    #[test]
    fn test_tenant_row_accepts_string_markup() {
        let row: PartnerTenant = serde_json::from_value(serde_json::json!({
            "data": { "id": "t1", "partner_id": "p1", "name": "Acme", "slug": "acme",
                      "model_config_id": "m1", "created_at": "2025-01-01T00:00:00Z",
                      "updated_at": "2025-01-01T00:00:00Z" },
            "rate": { "final_rate": "1.20", "markup_rate": "0.2", "model_name": "gpt", "partner_cost": "1.00" },
            "balance": "50.00"
        }))
        .unwrap();
        assert_eq!(row.rate.markup_rate.and_then(|m| m.value()), Some(0.2));
    }
}
