// ABOUTME: Partner-admin actions: profile, tenants, models, top-ups, tenant keys and ledger
// ABOUTME: All calls carry the session bearer token and validate forms before sending
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Async-IO.org

use serde_json::Value;

use super::{require, segment, BackendClient, Call, Credentials};
use crate::constants::backend;
use crate::errors::ActionResult;
use crate::forms::partner::{CreateTenantForm, ProfileForm, TenantKeyForm, TenantTopupForm};
use xaze_core::models::{
    ApiKeyRecord, CreatedKey, PartnerModel, PartnerProfile, PartnerTenant, TenantUpdate,
    Transaction, TransactionQuery,
};

fn tenant_path(tenant_id: &str, suffix: &str) -> String {
    format!("{}/{}{suffix}", backend::PARTNER_TENANTS, segment(tenant_id))
}

impl BackendClient {
    /// Wallet, credit limit, default markup and system rates
    ///
    /// # Errors
    ///
    /// Returns an `ActionError` when signed out or when the backend call fails
    pub async fn partner_profile(
        &self,
        credentials: Option<&Credentials>,
    ) -> ActionResult<PartnerProfile> {
        let call = Call::get(backend::PARTNER_PROFILE)
            .auth(require(credentials)?)
            .fallback("Failed to fetch profile");
        self.fetch(&call).await
    }

    /// Change the default tenant markup
    ///
    /// # Errors
    ///
    /// Returns an `ActionError` when signed out, on invalid input, or when the
    /// backend rejects the change
    pub async fn update_partner_profile(
        &self,
        credentials: Option<&Credentials>,
        form: ProfileForm,
    ) -> ActionResult<()> {
        let credentials = require(credentials)?;
        let request = form.validate()?;
        let call = Call::put(backend::PARTNER_PROFILE)
            .auth(credentials)
            .json(&request)?
            .fallback("Failed to update profile");
        self.submit(&call).await
    }

    /// Tenants with their effective rate and balance
    ///
    /// # Errors
    ///
    /// Returns an `ActionError` when signed out or when the backend call fails
    pub async fn partner_tenants(
        &self,
        credentials: Option<&Credentials>,
    ) -> ActionResult<Vec<PartnerTenant>> {
        let call = Call::get(backend::PARTNER_TENANTS)
            .auth(require(credentials)?)
            .fallback("Failed to fetch tenants");
        self.fetch_list(&call).await
    }

    /// Create a tenant
    ///
    /// # Errors
    ///
    /// Returns an `ActionError` when signed out, on invalid input, or when the
    /// backend rejects the tenant
    pub async fn create_tenant(
        &self,
        credentials: Option<&Credentials>,
        form: CreateTenantForm,
    ) -> ActionResult<Value> {
        let credentials = require(credentials)?;
        let request = form.validate()?;
        let call = Call::post(backend::PARTNER_TENANTS)
            .auth(credentials)
            .json(&request)?
            .fallback("Failed to create tenant");
        self.send(&call).await
    }

    /// Send a tenant's changed fields
    ///
    /// Callers skip the call when `update` is empty.
    ///
    /// # Errors
    ///
    /// Returns an `ActionError` when signed out or when the backend rejects
    /// the update
    pub async fn update_tenant(
        &self,
        credentials: Option<&Credentials>,
        tenant_id: &str,
        update: &TenantUpdate,
    ) -> ActionResult<()> {
        let call = Call::put(tenant_path(tenant_id, ""))
            .auth(require(credentials)?)
            .json(update)?
            .fallback("Failed to update tenant");
        self.submit(&call).await
    }

    /// Models the partner may assign, with the partner's rate
    ///
    /// # Errors
    ///
    /// Returns an `ActionError` when signed out or when the backend call fails
    pub async fn partner_models(
        &self,
        credentials: Option<&Credentials>,
    ) -> ActionResult<Vec<PartnerModel>> {
        let call = Call::get(backend::PARTNER_MODELS)
            .auth(require(credentials)?)
            .fallback("Failed to fetch models");
        self.fetch_list(&call).await
    }

    /// Credit a tenant wallet from the partner wallet
    ///
    /// # Errors
    ///
    /// Returns an `ActionError` when signed out, on invalid input, or when the
    /// backend rejects the top-up
    pub async fn topup_tenant(
        &self,
        credentials: Option<&Credentials>,
        form: TenantTopupForm,
    ) -> ActionResult<()> {
        let credentials = require(credentials)?;
        let (tenant_id, request) = form.validate()?;
        let call = Call::post(tenant_path(&tenant_id, "/topup"))
            .auth(credentials)
            .json(&request)?
            .fallback("Failed to top-up tenant");
        self.submit(&call).await
    }

    /// API keys issued to a tenant
    ///
    /// # Errors
    ///
    /// Returns an `ActionError` when signed out or when the backend call fails
    pub async fn tenant_keys(
        &self,
        credentials: Option<&Credentials>,
        tenant_id: &str,
    ) -> ActionResult<Vec<ApiKeyRecord>> {
        let call = Call::get(tenant_path(tenant_id, "/keys"))
            .auth(require(credentials)?)
            .fallback("Failed to fetch tenant keys");
        self.fetch_list(&call).await
    }

    /// Issue a chat-scoped tenant key; the secret is only returned here
    ///
    /// # Errors
    ///
    /// Returns an `ActionError` when signed out, on invalid input, or when the
    /// backend rejects the key
    pub async fn create_tenant_key(
        &self,
        credentials: Option<&Credentials>,
        form: TenantKeyForm,
    ) -> ActionResult<CreatedKey> {
        let credentials = require(credentials)?;
        let (tenant_id, request) = form.validate()?;
        let call = Call::post(tenant_path(&tenant_id, "/keys"))
            .auth(credentials)
            .json(&request)?
            .fallback("Failed to create tenant key");
        self.fetch(&call).await
    }

    /// Revoke a tenant key
    ///
    /// # Errors
    ///
    /// Returns an `ActionError` when signed out or when the revoke fails; the
    /// backend's message is not surfaced
    pub async fn revoke_tenant_key(
        &self,
        credentials: Option<&Credentials>,
        tenant_id: &str,
        key_id: &str,
    ) -> ActionResult<()> {
        let path = tenant_path(tenant_id, &format!("/keys/{}", segment(key_id)));
        let call = Call::delete(path)
            .auth(require(credentials)?)
            .fallback("Failed to revoke tenant key")
            .opaque();
        self.submit(&call).await
    }

    /// Partner ledger, optionally for one wallet
    ///
    /// # Errors
    ///
    /// Returns an `ActionError` when signed out or when the backend call fails
    pub async fn partner_transactions(
        &self,
        credentials: Option<&Credentials>,
        query: &TransactionQuery,
    ) -> ActionResult<Vec<Transaction>> {
        let mut call = Call::get(backend::PARTNER_TRANSACTIONS)
            .auth(require(credentials)?)
            .query("limit", query.limit)
            .query("offset", query.offset)
            .fallback("Failed to fetch transactions");
        if let Some(wallet_id) = query.wallet_id.as_deref().filter(|w| !w.is_empty()) {
            call = call.query("wallet", wallet_id);
        }
        self.fetch_list(&call).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tenant_paths() {
        assert_eq!(tenant_path("t1", "/keys/k1"), "/partner/tenants/t1/keys/k1");
        assert_eq!(tenant_path("t/1", ""), "/partner/tenants/t%2F1");
    }
}
