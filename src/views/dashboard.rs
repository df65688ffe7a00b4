// ABOUTME: Dashboard view models for the system home, the partner account and partner models
// ABOUTME: Missing backend data renders as zeroes or an empty-state message instead of failing the page
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Async-IO.org

use serde::Serialize;
use std::collections::BTreeMap;

use xaze_core::models::{PartnerModel, PartnerProfile, SystemOverview, SystemUsage};
use xaze_core::money::{format_amount_str, format_fixed, format_percent, parse_number};

/// Empty-state text of the system rates table
pub const NO_SYSTEM_RATES: &str = "No system rates available";

/// Empty-state text of the partner models list
pub const NO_MODELS: &str = "No models found.";

/// Headline number on a dashboard card
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct StatCard {
    /// Caption
    pub label: &'static str,
    /// Formatted value
    pub value: String,
}

impl StatCard {
    fn new(label: &'static str, value: impl ToString) -> Self {
        Self {
            label,
            value: value.to_string(),
        }
    }
}

/// Per-model usage line
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct UsageRow {
    /// Model name
    pub model: String,
    /// Tokens consumed
    pub tokens: u64,
    /// Cost as currency
    pub cost: String,
    /// Revenue as currency
    pub revenue: String,
}

/// System home: platform counters and usage by model
#[derive(Debug, Clone, Serialize)]
pub struct SystemDashboard {
    /// Overview cards
    pub overview: Vec<StatCard>,
    /// Total tokens across models
    pub total_tokens: u64,
    /// Tenants active in the last day
    pub active_tenants_24h: u64,
    /// One row per model seen in any usage map, by name
    pub usage: Vec<UsageRow>,
}

impl SystemDashboard {
    /// Shape the overview and usage payloads; either may be missing
    #[must_use]
    pub fn build(overview: Option<SystemOverview>, usage: Option<SystemUsage>) -> Self {
        let overview = overview.unwrap_or_default();
        let usage = usage.unwrap_or_default();

        let mut models: Vec<&String> = usage
            .tokens_by_model
            .keys()
            .chain(usage.cost_by_model.keys())
            .chain(usage.revenue_by_model.keys())
            .collect();
        models.sort();
        models.dedup();

        let money = |map: &BTreeMap<String, String>, model: &str| {
            format_amount_str(map.get(model).map_or("0", String::as_str), 2)
        };
        let credits = match overview.total_credits.as_str() {
            "" => format_amount_str("0", 2),
            raw => format_amount_str(raw, 2),
        };
        let rows = models
            .into_iter()
            .map(|model| UsageRow {
                model: model.clone(),
                tokens: usage.tokens_by_model.get(model).copied().unwrap_or_default(),
                cost: money(&usage.cost_by_model, model),
                revenue: money(&usage.revenue_by_model, model),
            })
            .collect();

        Self {
            overview: vec![
                StatCard::new("Total Partners", overview.total_partners),
                StatCard::new("Total Tenants", overview.total_tenants),
                StatCard::new("Total Users", overview.total_users),
                StatCard::new("Total Credits", credits),
            ],
            total_tokens: usage.total_tokens,
            active_tenants_24h: usage.active_tenants_24h,
            usage: rows,
        }
    }
}

/// Wholesale rate for one model
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct RateRow {
    /// Model name
    pub model: String,
    /// Rate per million tokens as currency
    pub rate: String,
}

/// Partner home: wallet, default markup and the system rate card
#[derive(Debug, Clone, Serialize)]
pub struct PartnerAccount {
    /// Wallet balance as currency
    pub wallet_balance: String,
    /// Credit limit as currency
    pub credit_limit: String,
    /// Default tenant markup as a percentage, `N/A` when unset
    pub default_markup: String,
    /// Raw markup for the edit dialog
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_tenant_markup_rate: Option<f64>,
    /// Rate card ordered by model name
    pub system_rates: Vec<RateRow>,
    /// Shown instead of an empty rate card
    #[serde(skip_serializing_if = "Option::is_none")]
    pub empty_message: Option<&'static str>,
}

impl PartnerAccount {
    /// Shape a partner profile
    #[must_use]
    pub fn build(profile: &PartnerProfile) -> Self {
        let mut system_rates: Vec<RateRow> = profile
            .system_rates
            .iter()
            .map(|(model, rate)| RateRow {
                model: model.clone(),
                rate: format_amount_str(rate, 2),
            })
            .collect();
        system_rates.sort_by(|a, b| a.model.cmp(&b.model));

        Self {
            wallet_balance: format_amount_str(&profile.wallet_balance, 2),
            credit_limit: format_amount_str(&profile.credit_limit, 2),
            default_markup: profile
                .default_tenant_markup_rate
                .map_or_else(|| "N/A".to_owned(), format_percent),
            default_tenant_markup_rate: profile.default_tenant_markup_rate,
            empty_message: system_rates.is_empty().then_some(NO_SYSTEM_RATES),
            system_rates,
        }
    }
}

/// Model the partner may assign to tenants
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct ModelRate {
    /// Model config id used when creating tenants
    pub id: String,
    /// Model name
    pub name: String,
    /// Partner cost per million tokens at four places
    pub rate: String,
}

/// Partner models page
#[derive(Debug, Clone, Serialize)]
pub struct ModelCatalog {
    /// Models in backend order
    pub models: Vec<ModelRate>,
    /// Shown instead of an empty list
    #[serde(skip_serializing_if = "Option::is_none")]
    pub empty_message: Option<&'static str>,
}

impl ModelCatalog {
    /// Shape the partner's model list
    #[must_use]
    pub fn build(models: &[PartnerModel]) -> Self {
        Self {
            models: models
                .iter()
                .map(|m| ModelRate {
                    id: m.id.clone(),
                    name: m.name.clone(),
                    rate: parse_number(&m.rate)
                        .map_or_else(|| m.rate.clone(), |v| format!("${}", format_fixed(v, 4))),
                })
                .collect(),
            empty_message: models.is_empty().then_some(NO_MODELS),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_usage_rows_merge_model_maps() {
        let usage: SystemUsage = serde_json::from_value(json!({
            "total_tokens": 1500,
            "tokens_by_model": { "gpt": 1000, "claude": 500 },
            "cost_by_model": { "gpt": "1.5" },
            "revenue_by_model": { "gpt": "2", "gemini": "0.25" }
        }))
        .unwrap();
        let dashboard = SystemDashboard::build(None, Some(usage));
        let models: Vec<&str> = dashboard.usage.iter().map(|r| r.model.as_str()).collect();
        assert_eq!(models, ["claude", "gemini", "gpt"]);
        assert_eq!(dashboard.usage[2].cost, "$1.50");
        assert_eq!(dashboard.usage[1].tokens, 0);
        assert_eq!(dashboard.overview[3].value, "$0.00");
    }

    #[test]
    fn test_partner_account_without_markup_or_rates() {
        let profile: PartnerProfile = serde_json::from_value(json!({
            "wallet_balance": "1234.5", "credit_limit": "100"
        }))
        .unwrap();
        let account = PartnerAccount::build(&profile);
        assert_eq!(account.wallet_balance, "$1,234.50");
        assert_eq!(account.default_markup, "N/A");
        assert_eq!(account.empty_message, Some(NO_SYSTEM_RATES));
    }

    #[test]
    fn test_partner_account_rates_sorted() {
        let profile: PartnerProfile = serde_json::from_value(json!({
            "default_tenant_markup_rate": 0.25,
            "system_rates": { "gpt": "2", "claude": "1.5" }
        }))
        .unwrap();
        let account = PartnerAccount::build(&profile);
        assert_eq!(account.default_markup, "25%");
        assert_eq!(account.system_rates[0].model, "claude");
        assert_eq!(account.system_rates[0].rate, "$1.50");
        assert!(account.empty_message.is_none());
    }

    #[test]
    fn test_model_catalog_rates() {
        let models: Vec<PartnerModel> =
            serde_json::from_value(json!([{ "id": "m1", "name": "gpt", "rate": "0.5" }])).unwrap();
        let catalog = ModelCatalog::build(&models);
        assert_eq!(catalog.models[0].rate, "$0.5000");
        assert_eq!(ModelCatalog::build(&[]).empty_message, Some(NO_MODELS));
    }
}
