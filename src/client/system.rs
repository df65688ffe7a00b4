// ABOUTME: System-admin actions: partners, wallets, keys, ledger, statistics, catalog and personas
// ABOUTME: All calls carry the session bearer token and validate forms before sending
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Async-IO.org

use serde_json::Value;

use super::{require, segment, BackendClient, Call, Credentials};
use crate::constants::{backend, limits};
use crate::errors::ActionResult;
use crate::forms::system::{
    CreatePartnerForm, CreditLimitForm, ModelForm, PartnerKeyForm, PartnerTopupForm, ProviderForm,
    SystemPersonaEditForm, SystemPersonaForm,
};
use xaze_core::models::{
    ApiKeyRecord, CreatedKey, CreatedPartner, Partner, Persona, PersonaOptions, SystemModel,
    SystemOverview, SystemProvider, SystemUsage, Transaction, TransactionQuery,
};

/// Query for the system persona list
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PersonaQuery {
    /// Page size
    pub limit: usize,
    /// Rows skipped
    pub offset: usize,
    /// Restrict to system or non-system personas
    pub is_system: Option<bool>,
}

impl Default for PersonaQuery {
    fn default() -> Self {
        Self {
            limit: limits::PERSONA_FETCH_LIMIT,
            offset: 0,
            is_system: None,
        }
    }
}

fn partner_path(partner_id: &str, suffix: &str) -> String {
    format!("{}/{}{suffix}", backend::SYSTEM_PARTNERS, segment(partner_id))
}

impl BackendClient {
    /// All partners
    ///
    /// # Errors
    ///
    /// Returns an `ActionError` when signed out or when the backend call fails
    pub async fn partners(&self, credentials: Option<&Credentials>) -> ActionResult<Vec<Partner>> {
        let call = Call::get(backend::SYSTEM_PARTNERS)
            .auth(require(credentials)?)
            .fallback("Failed to fetch partners");
        self.fetch_list(&call).await
    }

    /// Create a partner and its first admin user
    ///
    /// # Errors
    ///
    /// Returns an `ActionError` when signed out, on invalid input, or when the
    /// backend rejects the partner
    pub async fn create_partner(
        &self,
        credentials: Option<&Credentials>,
        form: CreatePartnerForm,
    ) -> ActionResult<CreatedPartner> {
        let credentials = require(credentials)?;
        let request = form.validate()?;
        let call = Call::post(backend::SYSTEM_PARTNERS)
            .auth(credentials)
            .json(&request)?
            .fallback("Failed to create partner");
        self.fetch(&call).await
    }

    /// Credit a partner wallet
    ///
    /// # Errors
    ///
    /// Returns an `ActionError` when signed out, on invalid input, or when the
    /// backend rejects the top-up
    pub async fn topup_partner(
        &self,
        credentials: Option<&Credentials>,
        form: PartnerTopupForm,
    ) -> ActionResult<()> {
        let credentials = require(credentials)?;
        let (partner_id, request) = form.validate()?;
        let call = Call::post(partner_path(&partner_id, "/topup"))
            .auth(credentials)
            .json(&request)?
            .fallback("Failed to top-up partner");
        self.submit(&call).await
    }

    /// Change a partner's credit limit
    ///
    /// # Errors
    ///
    /// Returns an `ActionError` when signed out, on invalid input, or when the
    /// backend rejects the change
    pub async fn update_credit_limit(
        &self,
        credentials: Option<&Credentials>,
        form: CreditLimitForm,
    ) -> ActionResult<()> {
        let credentials = require(credentials)?;
        let (partner_id, request) = form.validate()?;
        let call = Call::put(partner_path(&partner_id, "/credit-limit"))
            .auth(credentials)
            .json(&request)?
            .fallback("Failed to update credit limit");
        self.submit(&call).await
    }

    /// API keys issued to a partner
    ///
    /// # Errors
    ///
    /// Returns an `ActionError` when signed out or when the backend call fails
    pub async fn partner_keys(
        &self,
        credentials: Option<&Credentials>,
        partner_id: &str,
    ) -> ActionResult<Vec<ApiKeyRecord>> {
        let call = Call::get(partner_path(partner_id, "/keys"))
            .auth(require(credentials)?)
            .fallback("Failed to fetch partner keys");
        self.fetch_list(&call).await
    }

    /// Issue an admin-scoped partner key; the secret is only returned here
    ///
    /// # Errors
    ///
    /// Returns an `ActionError` when signed out, on invalid input, or when the
    /// backend rejects the key
    pub async fn create_partner_key(
        &self,
        credentials: Option<&Credentials>,
        form: PartnerKeyForm,
    ) -> ActionResult<CreatedKey> {
        let credentials = require(credentials)?;
        let (partner_id, request) = form.validate()?;
        let call = Call::post(partner_path(&partner_id, "/keys"))
            .auth(credentials)
            .json(&request)?
            .fallback("Failed to create partner key");
        self.fetch(&call).await
    }

    /// Revoke a partner key
    ///
    /// # Errors
    ///
    /// Returns an `ActionError` when signed out or when the revoke fails; the
    /// backend's message is not surfaced
    pub async fn revoke_partner_key(
        &self,
        credentials: Option<&Credentials>,
        partner_id: &str,
        key_id: &str,
    ) -> ActionResult<()> {
        let path = partner_path(partner_id, &format!("/keys/{}", segment(key_id)));
        let call = Call::delete(path)
            .auth(require(credentials)?)
            .fallback("Failed to revoke partner key")
            .opaque();
        self.submit(&call).await
    }

    /// Platform ledger, optionally for one wallet
    ///
    /// # Errors
    ///
    /// Returns an `ActionError` when signed out or when the backend call fails
    pub async fn system_transactions(
        &self,
        credentials: Option<&Credentials>,
        query: &TransactionQuery,
    ) -> ActionResult<Vec<Transaction>> {
        let mut call = Call::get(backend::SYSTEM_TRANSACTIONS)
            .auth(require(credentials)?)
            .query("limit", query.limit)
            .query("offset", query.offset)
            .fallback("Failed to fetch transactions");
        if let Some(wallet_id) = query.wallet_id.as_deref().filter(|w| !w.is_empty()) {
            call = call.query("wallet_id", wallet_id);
        }
        self.fetch_list(&call).await
    }

    /// Platform totals
    ///
    /// # Errors
    ///
    /// Returns an `ActionError` when signed out or when the backend call fails
    pub async fn system_overview(
        &self,
        credentials: Option<&Credentials>,
    ) -> ActionResult<SystemOverview> {
        let call = Call::get(backend::SYSTEM_STATS_OVERVIEW)
            .auth(require(credentials)?)
            .fallback("Failed to fetch overview");
        self.fetch(&call).await
    }

    /// Token usage and revenue by model
    ///
    /// # Errors
    ///
    /// Returns an `ActionError` when signed out or when the backend call fails
    pub async fn system_usage(&self, credentials: Option<&Credentials>) -> ActionResult<SystemUsage> {
        let call = Call::get(backend::SYSTEM_STATS_USAGE)
            .auth(require(credentials)?)
            .fallback("Failed to fetch usage");
        self.fetch(&call).await
    }

    /// Model catalog
    ///
    /// # Errors
    ///
    /// Returns an `ActionError` when signed out or when the backend call fails
    pub async fn system_models(
        &self,
        credentials: Option<&Credentials>,
    ) -> ActionResult<Vec<SystemModel>> {
        let call = Call::get(backend::SYSTEM_MODELS)
            .auth(require(credentials)?)
            .fallback("Failed to fetch models");
        self.fetch_list(&call).await
    }

    /// Update a model's cost or availability, keyed by name
    ///
    /// # Errors
    ///
    /// Returns an `ActionError` when signed out, on invalid input, or when the
    /// update fails; the backend's message is not surfaced
    pub async fn update_model(
        &self,
        credentials: Option<&Credentials>,
        form: ModelForm,
    ) -> ActionResult<Value> {
        let credentials = require(credentials)?;
        let request = form.validate()?;
        let call = Call::put(backend::SYSTEM_MODELS)
            .auth(credentials)
            .json(&request)?
            .fallback("Failed to update model")
            .opaque();
        self.send(&call).await
    }

    /// Provider catalog
    ///
    /// # Errors
    ///
    /// Returns an `ActionError` when signed out or when the backend call fails
    pub async fn system_providers(
        &self,
        credentials: Option<&Credentials>,
    ) -> ActionResult<Vec<SystemProvider>> {
        let call = Call::get(backend::SYSTEM_PROVIDERS)
            .auth(require(credentials)?)
            .fallback("Failed to fetch providers");
        self.fetch_list(&call).await
    }

    /// Update a provider, keyed by name
    ///
    /// # Errors
    ///
    /// Returns an `ActionError` when signed out or when the backend rejects
    /// the update
    pub async fn update_provider(
        &self,
        credentials: Option<&Credentials>,
        form: ProviderForm,
    ) -> ActionResult<Value> {
        let credentials = require(credentials)?;
        let call = Call::put(backend::SYSTEM_PROVIDERS)
            .auth(credentials)
            .json(&form.into_request())?
            .fallback("Failed to update provider");
        self.send(&call).await
    }

    /// One page of system personas
    ///
    /// # Errors
    ///
    /// Returns an `ActionError` when signed out or when the backend call fails
    pub async fn system_personas(
        &self,
        credentials: Option<&Credentials>,
        query: PersonaQuery,
    ) -> ActionResult<Vec<Persona>> {
        let mut call = Call::get(backend::SYSTEM_PERSONAS)
            .auth(require(credentials)?)
            .query("limit", query.limit)
            .query("offset", query.offset)
            .fallback("Failed to fetch personas");
        if let Some(is_system) = query.is_system {
            call = call.query("is_system", is_system);
        }
        self.fetch_list(&call).await
    }

    /// Create a system persona
    ///
    /// # Errors
    ///
    /// Returns an `ActionError` when signed out, on invalid input, or when the
    /// backend rejects the persona
    pub async fn create_system_persona(
        &self,
        credentials: Option<&Credentials>,
        form: SystemPersonaForm,
    ) -> ActionResult<Value> {
        let credentials = require(credentials)?;
        let request = form.validate()?;
        let call = Call::post(backend::SYSTEM_PERSONAS)
            .auth(credentials)
            .json(&request)?
            .fallback("Failed to create persona");
        self.send(&call).await
    }

    /// Update a system persona's name and config
    ///
    /// # Errors
    ///
    /// Returns an `ActionError` when signed out, on invalid input, or when the
    /// backend rejects the update
    pub async fn update_system_persona(
        &self,
        credentials: Option<&Credentials>,
        form: SystemPersonaEditForm,
    ) -> ActionResult<Value> {
        let credentials = require(credentials)?;
        let (id, request) = form.validate()?;
        let call = Call::put(format!("{}/{}", backend::SYSTEM_PERSONAS, segment(&id)))
            .auth(credentials)
            .json(&request)?
            .fallback("Failed to update persona");
        self.send(&call).await
    }

    /// Option lists for the system persona editor
    ///
    /// # Errors
    ///
    /// Returns an `ActionError` when signed out or when the backend call fails
    pub async fn system_persona_options(
        &self,
        credentials: Option<&Credentials>,
    ) -> ActionResult<PersonaOptions> {
        let call = Call::get(backend::SYSTEM_PERSONA_OPTIONS)
            .auth(require(credentials)?)
            .fallback("Failed to fetch persona options");
        self.fetch(&call).await
    }
}
