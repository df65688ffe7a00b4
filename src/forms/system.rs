// ABOUTME: System-admin forms for partners, wallets, keys, catalog entries and personas
// ABOUTME: Each form validates locally and yields the backend request body
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Async-IO.org

use serde::Deserialize;

use super::{json_object, lenient_flag, lenient_text, non_empty, positive_amount, require_all};
use crate::constants::scopes;
use crate::errors::{ActionError, ActionResult};
use xaze_core::models::{
    CreateKeyRequest, CreatePartnerRequest, CreditLimitRequest, PersonaPayload, SystemPersonaUpdate,
    TopupRequest, UpdateModelRequest, UpdateProviderRequest,
};
use xaze_core::money::{parse_integer, parse_number};

/// New partner
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreatePartnerForm {
    /// Display name
    #[serde(default, deserialize_with = "lenient_text")]
    pub name: String,
    /// URL slug
    #[serde(default, deserialize_with = "lenient_text")]
    pub slug: String,
    /// Opening balance as entered
    #[serde(default, deserialize_with = "lenient_text")]
    pub initial_balance: String,
    /// Opening credit limit as entered
    #[serde(default, deserialize_with = "lenient_text")]
    pub credit_limit: String,
}

impl CreatePartnerForm {
    /// Validate and build the request body
    ///
    /// # Errors
    ///
    /// Returns a validation error when name or slug is empty
    pub fn validate(self) -> ActionResult<CreatePartnerRequest> {
        require_all(&[&self.name, &self.slug], "Name and slug are required")?;
        Ok(CreatePartnerRequest {
            name: self.name,
            slug: self.slug,
            initial_balance: non_empty(self.initial_balance),
            credit_limit: non_empty(self.credit_limit),
        })
    }
}

/// Partner wallet top-up
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PartnerTopupForm {
    /// Partner receiving the credit
    #[serde(default, deserialize_with = "lenient_text")]
    pub partner_id: String,
    /// Amount as entered
    #[serde(default, deserialize_with = "lenient_text")]
    pub amount: String,
}

impl PartnerTopupForm {
    /// Validate into `(partner_id, body)`
    ///
    /// # Errors
    ///
    /// Returns a validation error for a missing partner or an amount that is
    /// not a positive number
    pub fn validate(self) -> ActionResult<(String, TopupRequest)> {
        require_all(&[&self.partner_id], "Partner ID is required")?;
        let amount = positive_amount(&self.amount, "Invalid amount")?;
        Ok((self.partner_id, TopupRequest { amount }))
    }
}

/// Partner credit limit change
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreditLimitForm {
    /// Partner being changed
    #[serde(default, deserialize_with = "lenient_text")]
    pub partner_id: String,
    /// New limit as entered
    #[serde(default, deserialize_with = "lenient_text")]
    pub credit_limit: String,
}

impl CreditLimitForm {
    /// Validate into `(partner_id, body)`
    ///
    /// # Errors
    ///
    /// Returns a validation error for a missing partner or a limit that is
    /// not a positive number
    pub fn validate(self) -> ActionResult<(String, CreditLimitRequest)> {
        require_all(&[&self.partner_id], "Partner ID is required")?;
        let credit_limit = positive_amount(&self.credit_limit, "Invalid credit limit")?;
        Ok((self.partner_id, CreditLimitRequest { credit_limit }))
    }
}

/// New partner API key
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PartnerKeyForm {
    /// Owning partner
    #[serde(default, deserialize_with = "lenient_text")]
    pub partner_id: String,
    /// Key label
    #[serde(default, deserialize_with = "lenient_text")]
    pub name: String,
}

impl PartnerKeyForm {
    /// Validate into `(partner_id, body)` with admin scope
    ///
    /// # Errors
    ///
    /// Returns a validation error when partner or name is empty
    pub fn validate(self) -> ActionResult<(String, CreateKeyRequest)> {
        require_all(&[&self.partner_id, &self.name], "Partner ID and Name are required")?;
        Ok((
            self.partner_id,
            CreateKeyRequest::with_scopes(self.name, scopes::PARTNER_KEY),
        ))
    }
}

/// Model catalog edit
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ModelForm {
    /// Model name, the backend's lookup key
    #[serde(default, deserialize_with = "lenient_text")]
    pub name: String,
    /// Base cost per million tokens as entered
    #[serde(default, deserialize_with = "lenient_text")]
    pub base_cost: String,
    /// Availability toggle
    #[serde(default, deserialize_with = "lenient_flag")]
    pub enabled: bool,
}

impl ModelForm {
    /// Validate and build the request body
    ///
    /// # Errors
    ///
    /// Returns a validation error when the base cost is not a number
    pub fn validate(self) -> ActionResult<UpdateModelRequest> {
        let base_cost =
            parse_number(&self.base_cost).ok_or_else(|| ActionError::validation("Invalid base cost"))?;
        Ok(UpdateModelRequest {
            name: self.name,
            base_cost,
            enabled: self.enabled,
        })
    }
}

/// Provider catalog edit
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProviderForm {
    /// Provider name, the backend's lookup key
    #[serde(default, deserialize_with = "lenient_text")]
    pub name: String,
    /// Replacement upstream API key; blank keeps the current one
    #[serde(default, deserialize_with = "lenient_text")]
    pub api_key: String,
    /// Availability toggle
    #[serde(default, deserialize_with = "lenient_flag")]
    pub enabled: bool,
    /// Routing priority as entered
    #[serde(default, deserialize_with = "lenient_text")]
    pub priority: String,
}

impl ProviderForm {
    /// Build the request body; a blank key and a non-integer priority are omitted
    #[must_use]
    pub fn into_request(self) -> UpdateProviderRequest {
        let api_key = (!self.api_key.trim().is_empty()).then_some(self.api_key);
        let priority = if self.priority.trim().is_empty() {
            None
        } else {
            parse_integer(&self.priority)
        };
        UpdateProviderRequest {
            name: self.name,
            enabled: self.enabled,
            api_key,
            priority,
        }
    }
}

/// New system persona, config entered as JSON text
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SystemPersonaForm {
    /// Persona name
    #[serde(default, deserialize_with = "lenient_text")]
    pub name: String,
    /// Persona description
    #[serde(default, deserialize_with = "lenient_text")]
    pub description: String,
    /// Config object as JSON text
    #[serde(default, deserialize_with = "lenient_text")]
    pub config: String,
}

impl SystemPersonaForm {
    /// Validate and build the request body
    ///
    /// # Errors
    ///
    /// Returns a validation error for a missing name or description, or a
    /// config that is not a JSON object
    pub fn validate(self) -> ActionResult<PersonaPayload> {
        require_all(&[&self.name, &self.description], "Name and Description are required")?;
        let config = json_object(&self.config, "Invalid JSON config")?;
        Ok(PersonaPayload {
            name: self.name,
            description: self.description,
            config,
        })
    }
}

/// System persona edit
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SystemPersonaEditForm {
    /// Persona being edited
    #[serde(default, deserialize_with = "lenient_text")]
    pub id: String,
    /// Persona name
    #[serde(default, deserialize_with = "lenient_text")]
    pub name: String,
    /// Config object as JSON text
    #[serde(default, deserialize_with = "lenient_text")]
    pub config: String,
}

impl SystemPersonaEditForm {
    /// Validate into `(id, body)`
    ///
    /// # Errors
    ///
    /// Returns a validation error for a missing id or name, or a config that
    /// is not a JSON object
    pub fn validate(self) -> ActionResult<(String, SystemPersonaUpdate)> {
        require_all(&[&self.id, &self.name], "ID and Name are required")?;
        let config = json_object(&self.config, "Invalid JSON config")?;
        Ok((
            self.id,
            SystemPersonaUpdate {
                name: self.name,
                description: None,
                config: Some(config),
            },
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_create_partner_passes_amounts_through() {
        let form: CreatePartnerForm = serde_json::from_value(json!({
            "name": "Acme", "slug": "acme", "initial_balance": "100.50", "credit_limit": ""
        }))
        .unwrap();
        let request = form.validate().unwrap();
        assert_eq!(request.initial_balance.as_deref(), Some("100.50"));
        assert_eq!(request.credit_limit, None);

        let missing = CreatePartnerForm {
            name: "Acme".into(),
            ..CreatePartnerForm::default()
        };
        assert_eq!(missing.validate().unwrap_err().message, "Name and slug are required");
    }

    #[test]
    fn test_topup_rejects_non_positive() {
        for amount in ["0", "-5", "abc", ""] {
            let form = PartnerTopupForm {
                partner_id: "p1".into(),
                amount: amount.into(),
            };
            assert_eq!(form.validate().unwrap_err().message, "Invalid amount");
        }
        let form = PartnerTopupForm {
            partner_id: String::new(),
            amount: "10".into(),
        };
        assert_eq!(form.validate().unwrap_err().message, "Partner ID is required");
    }

    #[test]
    fn test_credit_limit_must_be_positive() {
        for limit in ["0", "-1", "NaN", "abc", ""] {
            let form = CreditLimitForm {
                partner_id: "p1".into(),
                credit_limit: limit.into(),
            };
            assert_eq!(
                form.validate().unwrap_err().message,
                "Invalid credit limit",
                "limit {limit:?}"
            );
        }
        let form = CreditLimitForm {
            partner_id: "p1".into(),
            credit_limit: "500".into(),
        };
        assert_eq!(form.validate().unwrap().1.credit_limit, 500.0);
    }

    #[test]
    fn test_provider_optional_fields() {
        let form: ProviderForm = serde_json::from_value(json!({
            "name": "openai", "api_key": "   ", "enabled": "on", "priority": "3"
        }))
        .unwrap();
        let request = form.into_request();
        assert!(request.enabled);
        assert_eq!(request.api_key, None);
        assert_eq!(request.priority, Some(3));

        let form = ProviderForm {
            name: "openai".into(),
            priority: "high".into(),
            ..ProviderForm::default()
        };
        assert_eq!(form.into_request().priority, None);
    }

    #[test]
    fn test_partner_key_scopes() {
        let (partner, request) = PartnerKeyForm {
            partner_id: "p1".into(),
            name: "ci".into(),
        }
        .validate()
        .unwrap();
        assert_eq!(partner, "p1");
        assert_eq!(request.scopes, vec!["admin".to_owned()]);
    }

    #[test]
    fn test_persona_config_must_be_object() {
        let form = SystemPersonaForm {
            name: "Helper".into(),
            description: "Friendly".into(),
            config: "not json".into(),
        };
        assert_eq!(form.validate().unwrap_err().message, "Invalid JSON config");

        let form = SystemPersonaEditForm {
            id: "per_1".into(),
            name: "Helper".into(),
            config: r#"{"tone":"calm"}"#.into(),
        };
        let (id, update) = form.validate().unwrap();
        assert_eq!(id, "per_1");
        assert_eq!(update.config.unwrap().get("tone"), Some(&json!("calm")));
    }

    #[test]
    fn test_model_base_cost_must_be_numeric() {
        let form = ModelForm {
            name: "gpt".into(),
            base_cost: "n/a".into(),
            enabled: true,
        };
        assert_eq!(form.validate().unwrap_err().message, "Invalid base cost");
    }
}
