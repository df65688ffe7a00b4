// ABOUTME: Knowledge base, entry and business profile DTOs for the playground
// ABOUTME: All of these are scoped by the caller's API key
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Async-IO.org

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Named collection of retrieval entries
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KnowledgeBase {
    /// Knowledge base id
    pub id: String,
    /// Display name
    pub name: String,
    /// Description
    #[serde(default)]
    pub description: String,
    /// Linked persona
    #[serde(default)]
    pub persona_id: Option<String>,
    /// Linked business profile
    #[serde(default)]
    pub business_profile_id: Option<String>,
    /// Creation timestamp
    #[serde(default)]
    pub created_at: String,
}

/// Body for knowledge base create and update
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct KnowledgeBasePayload {
    /// Display name
    pub name: String,
    /// Description
    pub description: String,
    /// Linked persona
    #[serde(skip_serializing_if = "Option::is_none")]
    pub persona_id: Option<String>,
    /// Linked business profile
    #[serde(skip_serializing_if = "Option::is_none")]
    pub business_profile_id: Option<String>,
}

/// Document inside a knowledge base
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KbEntry {
    /// Entry id
    pub id: String,
    /// Title
    pub title: String,
    /// Body text
    pub content: String,
    /// Origin URL
    #[serde(default)]
    pub source_url: Option<String>,
    /// Free-form metadata
    #[serde(default)]
    pub metadata: Value,
    /// Creation timestamp
    #[serde(default)]
    pub created_at: String,
}

/// Body for entry create, batch create and update
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct KbEntryPayload {
    /// Title
    pub title: String,
    /// Body text
    pub content: String,
    /// Free-form metadata
    pub metadata: Map<String, Value>,
}

/// Business context injected into chat answers
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BusinessProfile {
    /// Profile id
    pub id: String,
    /// Display name
    pub name: String,
    /// Description
    #[serde(default)]
    pub description: String,
    /// Profile type
    #[serde(rename = "type", default)]
    pub profile_type: String,
    /// Structured settings
    #[serde(default)]
    pub config: Map<String, Value>,
    /// Creation timestamp
    #[serde(default)]
    pub created_at: String,
    /// Last update timestamp
    #[serde(default)]
    pub updated_at: String,
}

/// Structured business profile settings
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct BusinessProfileConfig {
    /// Who the business serves
    #[serde(default)]
    pub target_audience: String,
    /// Unique selling point
    #[serde(default)]
    pub usp: String,
    /// Opening hours
    #[serde(default)]
    pub operating_hours: String,
    /// Contact channels
    #[serde(default)]
    pub contact: Vec<Contact>,
}

/// Contact channel of a business
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Contact {
    /// Channel, e.g. `Line`
    pub platform: String,
    /// Handle or URL on that channel
    pub source: String,
}

/// Body for business profile create and update
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct BusinessProfilePayload {
    /// Display name
    pub name: String,
    /// Description
    pub description: String,
    /// Profile type
    #[serde(rename = "type")]
    pub profile_type: String,
    /// Structured settings
    pub config: BusinessProfileConfig,
}
