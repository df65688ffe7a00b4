// ABOUTME: Persona DTOs for system-wide and playground personas
// ABOUTME: Config is a free-form map with a fixed set of well-known fields
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Async-IO.org

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Response-style settings of a persona
///
/// Unknown keys are preserved in `extra` so edits round-trip.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct PersonaConfig {
    /// Tone of voice
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tone: Option<String>,
    /// Emoji usage level
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub emoji: Option<String>,
    /// Reply language code
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    /// Persona gender
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gender: Option<String>,
    /// How the persona refers to itself
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub self_reference: Option<String>,
    /// How the persona addresses the user
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_reference: Option<String>,
    /// Opening message
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub greeting: Option<String>,
    /// Keys with no dedicated field
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Persona as listed by either the system admin or the playground
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Persona {
    /// Persona id
    pub id: String,
    /// Display name
    pub name: String,
    /// Short description
    #[serde(default)]
    pub description: String,
    /// Owning tenant
    #[serde(default)]
    pub tenant_id: Option<String>,
    /// Style settings
    #[serde(default)]
    pub config: PersonaConfig,
    /// Tenant default persona
    #[serde(default)]
    pub is_default: bool,
    /// Platform-provided persona
    #[serde(default)]
    pub is_system: bool,
    /// Owning tenant name, system listing only
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tenant_name: Option<String>,
    /// Owning partner name, system listing only
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub partner_name: Option<String>,
    /// Creation timestamp
    #[serde(default)]
    pub created_at: Option<String>,
    /// Last update timestamp
    #[serde(default)]
    pub updated_at: Option<String>,
}

/// Allowed values for persona config fields
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PersonaOptions {
    /// Tones
    #[serde(default)]
    pub tones: Vec<String>,
    /// Emoji levels
    #[serde(default)]
    pub emojis: Vec<String>,
    /// Languages
    #[serde(default)]
    pub languages: Vec<LanguageOption>,
    /// Genders
    #[serde(default)]
    pub genders: Vec<String>,
}

/// Language choice
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LanguageOption {
    /// ISO code
    pub code: String,
    /// Display name
    pub name: String,
}

/// Body for persona create and playground persona update
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PersonaPayload {
    /// Display name
    pub name: String,
    /// Short description
    pub description: String,
    /// Style settings as a JSON object
    pub config: Map<String, Value>,
}

/// Body for `PUT /system/personas/{id}`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SystemPersonaUpdate {
    /// Display name
    pub name: String,
    /// Short description
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Style settings as a JSON object
    #[serde(skip_serializing_if = "Option::is_none")]
    pub config: Option<Map<String, Value>>,
}
