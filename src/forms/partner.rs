// ABOUTME: Partner-admin forms for the profile, tenants, top-ups and tenant keys
// ABOUTME: Tenant edits are diffed against the current record so only changes are sent
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Async-IO.org

use serde::Deserialize;

use super::{lenient_text, non_negative_amount, optional_number, positive_amount, require_all};
use crate::constants::scopes;
use crate::errors::ActionResult;
use xaze_core::models::{
    CreateKeyRequest, CreateTenantRequest, PartnerProfileUpdate, PartnerTenant, TenantUpdate,
    TopupRequest,
};
use xaze_core::money::parse_number;

const INVALID_MARKUP: &str = "Invalid markup rate";

/// Partner default markup
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProfileForm {
    /// Markup applied to new tenants, as entered
    #[serde(default, deserialize_with = "lenient_text")]
    pub default_tenant_markup_rate: String,
}

impl ProfileForm {
    /// Validate and build the request body
    ///
    /// # Errors
    ///
    /// Returns a validation error for a negative or non-numeric rate
    pub fn validate(self) -> ActionResult<PartnerProfileUpdate> {
        let rate = non_negative_amount(&self.default_tenant_markup_rate, INVALID_MARKUP)?;
        Ok(PartnerProfileUpdate {
            default_tenant_markup_rate: Some(rate),
        })
    }
}

/// New tenant
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreateTenantForm {
    /// Display name
    #[serde(default, deserialize_with = "lenient_text")]
    pub name: String,
    /// URL slug
    #[serde(default, deserialize_with = "lenient_text")]
    pub slug: String,
    /// Model the tenant is billed for
    #[serde(default, deserialize_with = "lenient_text")]
    pub model_config_id: String,
    /// Markup override as entered
    #[serde(default, deserialize_with = "lenient_text")]
    pub markup_rate: String,
    /// Opening balance as entered
    #[serde(default, deserialize_with = "lenient_text")]
    pub initial_balance: String,
}

impl CreateTenantForm {
    /// Validate and build the request body; a non-numeric opening balance is omitted
    ///
    /// # Errors
    ///
    /// Returns a validation error when name, slug or model is empty, or when
    /// a markup is entered that is not a number
    pub fn validate(self) -> ActionResult<CreateTenantRequest> {
        require_all(
            &[&self.name, &self.slug, &self.model_config_id],
            "Name, Slug, and Model Config ID are required",
        )?;
        Ok(CreateTenantRequest {
            markup_rate: optional_number(&self.markup_rate, INVALID_MARKUP)?,
            initial_balance: parse_number(&self.initial_balance),
            name: self.name,
            slug: self.slug,
            model_config_id: self.model_config_id,
        })
    }
}

/// Tenant edit, holding every field as currently shown in the dialog
#[derive(Debug, Clone, Default, Deserialize)]
pub struct EditTenantForm {
    /// Display name
    #[serde(default, deserialize_with = "lenient_text")]
    pub name: String,
    /// URL slug
    #[serde(default, deserialize_with = "lenient_text")]
    pub slug: String,
    /// Model the tenant is billed for
    #[serde(default, deserialize_with = "lenient_text")]
    pub model_config_id: String,
    /// Markup override as entered; blank leaves the current value
    #[serde(default, deserialize_with = "lenient_text")]
    pub markup_rate: String,
}

impl EditTenantForm {
    /// Parse the markup so the edit can be diffed
    ///
    /// # Errors
    ///
    /// Returns a validation error when a markup is entered that is not a number
    pub fn validate(self) -> ActionResult<TenantEdit> {
        Ok(TenantEdit {
            markup_rate: optional_number(&self.markup_rate, INVALID_MARKUP)?,
            name: self.name,
            slug: self.slug,
            model_config_id: self.model_config_id,
        })
    }
}

/// Validated tenant edit
#[derive(Debug, Clone, PartialEq)]
pub struct TenantEdit {
    name: String,
    slug: String,
    model_config_id: String,
    markup_rate: Option<f64>,
}

impl TenantEdit {
    /// Fields that differ from `current`
    ///
    /// Empty text never clears a field. The markup is compared numerically.
    #[must_use]
    pub fn changes(self, current: &PartnerTenant) -> TenantUpdate {
        let changed = |new: String, old: &str| (!new.is_empty() && new != old).then_some(new);
        let current_markup = current.rate.markup_rate.as_ref().and_then(|m| m.value());
        let markup_rate = self.markup_rate.filter(|rate| Some(*rate) != current_markup);

        TenantUpdate {
            name: changed(self.name, &current.data.name),
            slug: changed(self.slug, &current.data.slug),
            markup_rate,
            model_config_id: changed(self.model_config_id, &current.data.model_config_id),
        }
    }
}

/// Tenant wallet top-up
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TenantTopupForm {
    /// Tenant receiving the credit
    #[serde(default, deserialize_with = "lenient_text")]
    pub tenant_id: String,
    /// Amount as entered
    #[serde(default, deserialize_with = "lenient_text")]
    pub amount: String,
}

impl TenantTopupForm {
    /// Validate into `(tenant_id, body)`
    ///
    /// # Errors
    ///
    /// Returns a validation error for a missing tenant or an amount that is
    /// not a positive number
    pub fn validate(self) -> ActionResult<(String, TopupRequest)> {
        require_all(&[&self.tenant_id], "Tenant ID is required")?;
        let amount = positive_amount(&self.amount, "Invalid amount")?;
        Ok((self.tenant_id, TopupRequest { amount }))
    }
}

/// New tenant API key
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TenantKeyForm {
    /// Owning tenant
    #[serde(default, deserialize_with = "lenient_text")]
    pub tenant_id: String,
    /// Key label
    #[serde(default, deserialize_with = "lenient_text")]
    pub name: String,
}

impl TenantKeyForm {
    /// Validate into `(tenant_id, body)` with chat scopes
    ///
    /// # Errors
    ///
    /// Returns a validation error when tenant or name is empty
    pub fn validate(self) -> ActionResult<(String, CreateKeyRequest)> {
        require_all(&[&self.tenant_id, &self.name], "Tenant ID and Name are required")?;
        Ok((
            self.tenant_id,
            CreateKeyRequest::with_scopes(self.name, scopes::TENANT_KEY),
        ))
    }
}
