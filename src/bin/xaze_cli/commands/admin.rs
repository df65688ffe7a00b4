// ABOUTME: Administration commands for xaze-cli: partners, tenants, ledgers and model catalogs
// ABOUTME: Ledger and catalog commands pick the system or partner surface from the token's role
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Async-IO.org

use anyhow::Result;
use xaze_console::{
    client::{BackendClient, Credentials},
    forms::{partner::TenantTopupForm, system::PartnerTopupForm},
    session::decode_role,
    storage::LocalStore,
};
use xaze_core::models::{Role, TransactionQuery};

use super::session_credentials;
use crate::helpers::display::{
    display_partner_models, display_partners, display_system_models, display_tenants,
    display_transactions,
};

fn is_system_admin(credentials: &Credentials) -> bool {
    match credentials {
        Credentials::Session(token) => decode_role(token) == Some(Role::SystemAdmin),
        Credentials::ApiKey(_) => false,
    }
}

/// List partners
pub async fn list_partners(client: &BackendClient, store: &LocalStore) -> Result<()> {
    let credentials = session_credentials(store)?;
    let partners = client.partners(Some(&credentials)).await?;
    display_partners(&partners);
    Ok(())
}

/// Credit a partner wallet
pub async fn topup_partner(
    client: &BackendClient,
    store: &LocalStore,
    partner_id: String,
    amount: String,
) -> Result<()> {
    let credentials = session_credentials(store)?;
    let form = PartnerTopupForm { partner_id, amount };
    client.topup_partner(Some(&credentials), form).await?;
    println!("Wallet topped up successfully");
    Ok(())
}

/// List tenants
pub async fn list_tenants(client: &BackendClient, store: &LocalStore) -> Result<()> {
    let credentials = session_credentials(store)?;
    let tenants = client.partner_tenants(Some(&credentials)).await?;
    display_tenants(&tenants);
    Ok(())
}

/// Credit a tenant wallet
pub async fn topup_tenant(
    client: &BackendClient,
    store: &LocalStore,
    tenant_id: String,
    amount: String,
) -> Result<()> {
    let credentials = session_credentials(store)?;
    let form = TenantTopupForm { tenant_id, amount };
    client.topup_tenant(Some(&credentials), form).await?;
    println!("Tenant topped up successfully");
    Ok(())
}

/// Ledger for the signed-in role
pub async fn transactions(
    client: &BackendClient,
    store: &LocalStore,
    wallet: Option<String>,
) -> Result<()> {
    let credentials = session_credentials(store)?;
    let query = wallet
        .filter(|w| !w.trim().is_empty())
        .map_or_else(TransactionQuery::default, TransactionQuery::for_wallet);

    let rows = if is_system_admin(&credentials) {
        client.system_transactions(Some(&credentials), &query).await?
    } else {
        client.partner_transactions(Some(&credentials), &query).await?
    };
    display_transactions(&rows);
    Ok(())
}

/// Model catalog for the signed-in role
pub async fn models(client: &BackendClient, store: &LocalStore) -> Result<()> {
    let credentials = session_credentials(store)?;
    if is_system_admin(&credentials) {
        display_system_models(&client.system_models(Some(&credentials)).await?);
    } else {
        display_partner_models(&client.partner_models(Some(&credentials)).await?);
    }
    Ok(())
}
