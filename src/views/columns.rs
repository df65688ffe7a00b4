// ABOUTME: Column sets for partners, tenants, transactions, models and personas
// ABOUTME: Money is shown as currency and timestamps in a short US date format
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Async-IO.org

use chrono::{DateTime, Local, NaiveDateTime};

use super::table::{Cell, Column, Table};
use xaze_core::models::{Partner, PartnerTenant, Persona, SystemModel, Transaction};
use xaze_core::money::{
    format_currency, format_currency_with, parse_number, BASE_COST_FRACTION_DIGITS,
    DEFAULT_FRACTION_DIGITS,
};

/// Money cell from a backend decimal string
fn money(raw: &str) -> Cell {
    money_with(raw, DEFAULT_FRACTION_DIGITS)
}

fn money_with(raw: &str, min_digits: usize) -> Cell {
    let value = parse_number(raw);
    Cell::Amount {
        value,
        text: value.map_or_else(|| "-".to_owned(), |v| format_currency_with(v, min_digits)),
    }
}

/// Format a backend timestamp as `Jan 5, 2025, 03:04 PM`; unparseable input is shown as is
#[must_use]
pub fn format_timestamp(raw: &str) -> String {
    let parsed = DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Local).naive_local())
        .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f"));
    parsed.map_or_else(
        |_| raw.to_owned(),
        |dt| dt.format("%b %-d, %Y, %I:%M %p").to_string(),
    )
}

fn date(raw: &str) -> Cell {
    Cell::Date {
        raw: raw.to_owned(),
        text: format_timestamp(raw),
    }
}

fn or_dash(value: Option<&str>) -> Cell {
    Cell::text(value.filter(|v| !v.is_empty()).unwrap_or("-"))
}

/// Partners list for system admins
#[must_use]
pub fn partner_table() -> Table<Partner> {
    Table::new(
        vec![
            Column::new("name", "Name", |p: &Partner| Cell::text(&p.name)),
            Column::new("slug", "Slug", |p: &Partner| Cell::text(&p.slug)),
            Column::new("contact_email", "Contact Email", |p: &Partner| {
                or_dash(p.contact_email.as_deref())
            }),
            Column::new("wallet_balance", "Wallet Balance", |p: &Partner| {
                money(&p.wallet_balance)
            })
            .right(),
            Column::new("credit_limit", "Credit Limit", |p: &Partner| money(&p.credit_limit))
                .right(),
            Column::new("created_at", "Created At", |p: &Partner| date(&p.created_at)).right(),
        ],
        |p| p.id.clone(),
    )
    .searchable("name")
}

/// Tenants list for partner admins
#[must_use]
pub fn tenant_table() -> Table<PartnerTenant> {
    Table::new(
        vec![
            Column::new("name", "Name", |t: &PartnerTenant| Cell::text(&t.data.name)),
            Column::new("slug", "Slug", |t: &PartnerTenant| Cell::text(&t.data.slug)),
            Column::new("model_name", "Model", |t: &PartnerTenant| {
                Cell::text(&t.rate.model_name)
            }),
            Column::new("markup_rate", "Markup", |t: &PartnerTenant| Cell::Amount {
                value: t.rate.markup_rate.as_ref().and_then(|m| m.value()),
                text: t
                    .rate
                    .markup_rate
                    .as_ref()
                    .map_or_else(|| "-".to_owned(), ToString::to_string),
            })
            .right(),
            Column::new(
                "final_rate",
                "Final Rate (USD / 1M Token)",
                |t: &PartnerTenant| money(&t.rate.final_rate),
            )
            .right(),
            Column::new("balance", "Balance", |t: &PartnerTenant| money(&t.balance)).right(),
            Column::new("created_at", "Created At", |t: &PartnerTenant| {
                date(&t.data.created_at)
            })
            .right(),
        ],
        |t| t.data.id.clone(),
    )
    .searchable("name")
}

/// Wallet ledger for either role
#[must_use]
pub fn transaction_table() -> Table<Transaction> {
    Table::new(
        vec![
            Column::new("created_at", "Date", |t: &Transaction| date(&t.created_at)),
            Column::new("reference_type", "Ref Type", |t: &Transaction| {
                or_dash(Some(t.reference_type.as_str()))
            }),
            Column::new("reference_id", "Ref ID", |t: &Transaction| {
                or_dash(Some(t.reference_id.as_str()))
            }),
            Column::new("type", "Type", |t: &Transaction| Cell::text(&t.kind)),
            Column::new("amount", "Amount", |t: &Transaction| money(&t.amount)),
            Column::new("balance_after", "Balance After", |t: &Transaction| {
                money(&t.balance_after)
            }),
            Column::new("owner_type", "Owner", |t: &Transaction| Cell::text(&t.owner_type)),
            Column::new("wallet_id", "Wallet ID", |t: &Transaction| Cell::text(&t.wallet_id)),
        ],
        |t| t.id.clone(),
    )
    .searchable("reference_id")
}

/// Model catalog
#[must_use]
pub fn model_table() -> Table<SystemModel> {
    Table::new(
        vec![
            Column::new("name", "Name", |m: &SystemModel| Cell::text(&m.name)),
            Column::new("provider", "Provider", |m: &SystemModel| Cell::text(&m.provider)),
            Column::new("type", "Type", |m: &SystemModel| Cell::text(&m.model_type)),
            Column::new("base_cost", "Base Cost", |m: &SystemModel| {
                money_with(&m.base_cost, BASE_COST_FRACTION_DIGITS)
            }),
            Column::new("enabled", "Status", |m: &SystemModel| Cell::Badge {
                text: if m.enabled { "Enabled" } else { "Disabled" }.to_owned(),
                active: m.enabled,
            }),
        ],
        |m| m.id.clone(),
    )
    .searchable("name")
}

/// System persona list
#[must_use]
pub fn persona_table() -> Table<Persona> {
    Table::new(
        vec![
            Column::new("name", "Name", |p: &Persona| Cell::text(&p.name)),
            Column::new("description", "Description", |p: &Persona| {
                Cell::text(&p.description)
            })
            .unsorted(),
            Column::new("tenant_name", "Tenant", |p: &Persona| or_dash(p.tenant_name.as_deref())),
            Column::new("partner_name", "Partner", |p: &Persona| {
                or_dash(p.partner_name.as_deref())
            }),
            Column::new("is_default", "Default", |p: &Persona| Cell::Badge {
                text: if p.is_default { "Default" } else { "" }.to_owned(),
                active: p.is_default,
            }),
        ],
        |p| p.id.clone(),
    )
    .searchable("name")
}

/// Total of a set of backend decimal strings, formatted as currency
#[must_use]
pub fn sum_currency<'a>(amounts: impl IntoIterator<Item = &'a str>) -> String {
    format_currency(amounts.into_iter().filter_map(parse_number).sum())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::views::table::TableQuery;
    use serde_json::json;

    #[test]
    fn test_tenant_rate_display() {
        let tenant: PartnerTenant = serde_json::from_value(json!({
            "data": { "id": "t1", "name": "Acme", "slug": "acme" },
            "rate": { "final_rate": "1.2", "markup_rate": null, "model_name": "gpt" },
            "balance": "1234.5"
        }))
        .unwrap();
        let view = tenant_table().view(&[tenant], &TableQuery::default());
        let cells = &view.page.items[0].cells;
        assert_eq!(cells[3].display(), "-");
        assert_eq!(cells[4].display(), "$1.20");
        assert_eq!(cells[5].display(), "$1,234.50");
    }

    #[test]
    fn test_model_base_cost_uses_six_digits() {
        let model: SystemModel = serde_json::from_value(json!({
            "id": "m1", "name": "gpt", "base_cost": "0.5", "enabled": false
        }))
        .unwrap();
        let view = model_table().view(&[model], &TableQuery::default());
        let cells = &view.page.items[0].cells;
        assert_eq!(cells[3].display(), "$0.500000");
        assert_eq!(cells[4].display(), "Disabled");
    }

    #[test]
    fn test_timestamp_formatting() {
        assert_eq!(format_timestamp("2025-01-05T15:04:00"), "Jan 5, 2025, 03:04 PM");
        assert_eq!(format_timestamp("not a date"), "not a date");
    }

    #[test]
    fn test_transactions_search_by_reference() {
        let rows: Vec<Transaction> = serde_json::from_value(json!([
            { "id": "1", "wallet_id": "w1", "amount": "5", "reference_id": "inv-001" },
            { "id": "2", "wallet_id": "w1", "amount": "7", "reference_id": "usage-9" }
        ]))
        .unwrap();
        let query = TableQuery {
            search: Some("INV".into()),
            ..TableQuery::default()
        };
        let view = transaction_table().view(&rows, &query);
        assert_eq!(view.page.total, 1);
        assert_eq!(view.page.items[0].id, "1");
    }

    #[test]
    fn test_sum_currency_skips_unparseable() {
        assert_eq!(sum_currency(["1.50", "x", "2"]), "$3.50");
    }
}
