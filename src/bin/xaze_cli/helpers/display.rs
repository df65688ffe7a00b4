// ABOUTME: Output formatting helpers for xaze-cli
// ABOUTME: Fixed-width tables for partners, tenants, ledgers and models plus chat replies
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Async-IO.org

use xaze_console::playground::{Bubble, Speaker};
use xaze_core::models::{Partner, PartnerModel, PartnerTenant, SystemModel, Transaction, User};
use xaze_core::money::format_amount_str;

fn rule(width: usize) {
    println!("{}", "=".repeat(width));
}

/// Display the signed-in user
pub fn display_user(user: &User) {
    println!("User: {}", user.name.as_deref().unwrap_or(&user.email));
    println!("   Email: {}", user.email);
    println!("   Role: {}", user.role);
    println!("   ID: {}", user.id);
}

/// Display partners with balances
pub fn display_partners(partners: &[Partner]) {
    if partners.is_empty() {
        println!("No partners found.");
        return;
    }
    println!(
        "{:<38} {:<24} {:<16} {:>14} {:>14}",
        "ID", "Name", "Slug", "Balance", "Credit Limit"
    );
    rule(110);
    for partner in partners {
        println!(
            "{:<38} {:<24} {:<16} {:>14} {:>14}",
            partner.id,
            partner.name,
            partner.slug,
            format_amount_str(&partner.wallet_balance, 2),
            format_amount_str(&partner.credit_limit, 2),
        );
    }
}

/// Display tenants with their rate and balance
pub fn display_tenants(tenants: &[PartnerTenant]) {
    if tenants.is_empty() {
        println!("No tenants found.");
        return;
    }
    println!(
        "{:<38} {:<24} {:<20} {:>10} {:>14}",
        "ID", "Name", "Model", "Markup", "Balance"
    );
    rule(110);
    for tenant in tenants {
        let markup = tenant
            .rate
            .markup_rate
            .as_ref()
            .map_or_else(|| "-".to_owned(), ToString::to_string);
        println!(
            "{:<38} {:<24} {:<20} {:>10} {:>14}",
            tenant.data.id,
            tenant.data.name,
            tenant.rate.model_name,
            markup,
            format_amount_str(&tenant.balance, 2),
        );
    }
}

/// Display ledger rows
pub fn display_transactions(rows: &[Transaction]) {
    if rows.is_empty() {
        println!("No transactions found.");
        return;
    }
    println!(
        "{:<26} {:<12} {:>14} {:>14} {:<38}",
        "Date", "Type", "Amount", "Balance", "Wallet"
    );
    rule(108);
    for row in rows {
        println!(
            "{:<26} {:<12} {:>14} {:>14} {:<38}",
            row.created_at,
            row.kind,
            format_amount_str(&row.amount, 2),
            format_amount_str(&row.balance_after, 2),
            row.wallet_id,
        );
    }
}

/// Display the system model catalog; base costs keep six fraction digits
pub fn display_system_models(models: &[SystemModel]) {
    if models.is_empty() {
        println!("No models found.");
        return;
    }
    println!("{:<32} {:<16} {:>14} {:<8}", "Name", "Provider", "Base Cost", "Enabled");
    rule(74);
    for model in models {
        println!(
            "{:<32} {:<16} {:>14} {:<8}",
            model.name,
            model.provider,
            format_amount_str(&model.base_cost, 6),
            if model.enabled { "yes" } else { "no" },
        );
    }
}

/// Display the models a partner can assign
pub fn display_partner_models(models: &[PartnerModel]) {
    if models.is_empty() {
        println!("No models found.");
        return;
    }
    println!("{:<32} {:>14}", "Name", "Rate");
    rule(48);
    for model in models {
        println!("{:<32} {:>14}", model.name, format_amount_str(&model.rate, 4));
    }
}

/// Print the bubbles that follow the last user message
pub fn display_reply(messages: &[Bubble]) {
    let start = messages
        .iter()
        .rposition(|b| b.role == Speaker::User)
        .map_or(0, |i| i + 1);
    for bubble in &messages[start..] {
        if bubble.is_error {
            eprintln!("{}", bubble.content);
        } else {
            println!("{}", bubble.content);
        }
    }
}
