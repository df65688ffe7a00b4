// ABOUTME: Playground forms for personas, knowledge bases, entries, business profiles and sessions
// ABOUTME: Shapes dialog input into the API-key scoped request bodies
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Async-IO.org

use serde::Deserialize;
use serde_json::{Map, Value};

use super::{json_object, lenient_text, non_empty, require_all};
use crate::errors::{ActionError, ActionResult};
use xaze_core::models::{
    BusinessProfileConfig, BusinessProfilePayload, Contact, KbEntryPayload, KnowledgeBasePayload,
    PersonaPayload,
};

/// Entry source recorded when none is given
pub const DEFAULT_ENTRY_SOURCE: &str = "manual";

/// Playground persona with its fixed config fields
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PersonaForm {
    /// Persona name
    #[serde(default, deserialize_with = "lenient_text")]
    pub name: String,
    /// Persona description
    #[serde(default, deserialize_with = "lenient_text")]
    pub description: String,
    /// Voice tone
    #[serde(default, deserialize_with = "lenient_text")]
    pub tone: String,
    /// Emoji usage
    #[serde(default, deserialize_with = "lenient_text")]
    pub emoji: String,
    /// Reply language code
    #[serde(default, deserialize_with = "lenient_text")]
    pub language: String,
    /// Persona gender
    #[serde(default, deserialize_with = "lenient_text")]
    pub gender: String,
    /// How the persona refers to itself
    #[serde(default, deserialize_with = "lenient_text")]
    pub self_reference: String,
    /// How the persona addresses the user
    #[serde(default, deserialize_with = "lenient_text")]
    pub user_reference: String,
    /// Opening line
    #[serde(default, deserialize_with = "lenient_text")]
    pub greeting: String,
}

impl PersonaForm {
    /// Request body; every config field is sent, blank or not
    #[must_use]
    pub fn into_payload(self) -> PersonaPayload {
        let mut config = Map::new();
        for (key, value) in [
            ("tone", self.tone),
            ("emoji", self.emoji),
            ("language", self.language),
            ("self_reference", self.self_reference),
            ("user_reference", self.user_reference),
            ("gender", self.gender),
            ("greeting", self.greeting),
        ] {
            config.insert(key.to_owned(), Value::String(value));
        }
        PersonaPayload {
            name: self.name,
            description: self.description,
            config,
        }
    }
}

/// Knowledge base with its optional links
#[derive(Debug, Clone, Default, Deserialize)]
pub struct KnowledgeBaseForm {
    /// Knowledge base name
    #[serde(default, deserialize_with = "lenient_text")]
    pub name: String,
    /// Knowledge base description
    #[serde(default, deserialize_with = "lenient_text")]
    pub description: String,
    /// Linked persona
    #[serde(default, deserialize_with = "lenient_text")]
    pub persona_id: String,
    /// Linked business profile
    #[serde(default, deserialize_with = "lenient_text")]
    pub business_profile_id: String,
}

impl KnowledgeBaseForm {
    /// Request body; unselected links are omitted
    #[must_use]
    pub fn into_payload(self) -> KnowledgeBasePayload {
        KnowledgeBasePayload {
            name: self.name,
            description: self.description,
            persona_id: non_empty(self.persona_id),
            business_profile_id: non_empty(self.business_profile_id),
        }
    }
}

/// One knowledge-base entry
#[derive(Debug, Clone, Default, Deserialize)]
pub struct EntryForm {
    /// Entry title
    #[serde(default, deserialize_with = "lenient_text")]
    pub title: String,
    /// Entry body
    #[serde(default, deserialize_with = "lenient_text")]
    pub content: String,
    /// Where the entry came from
    #[serde(default, deserialize_with = "lenient_text")]
    pub source: String,
}

impl EntryForm {
    /// Request body with `metadata.source`, defaulting to `manual`
    #[must_use]
    pub fn into_payload(self) -> KbEntryPayload {
        let source = if self.source.trim().is_empty() {
            DEFAULT_ENTRY_SOURCE.to_owned()
        } else {
            self.source
        };
        let mut metadata = Map::new();
        metadata.insert("source".to_owned(), Value::String(source));
        KbEntryPayload {
            title: self.title,
            content: self.content,
            metadata,
        }
    }

    fn is_complete(&self) -> bool {
        !self.title.trim().is_empty() && !self.content.trim().is_empty()
    }
}

/// Several entries created in one call
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BatchEntryForm {
    /// Entries in display order
    #[serde(default)]
    pub entries: Vec<EntryForm>,
}

impl BatchEntryForm {
    /// Validate every entry and build the batch body
    ///
    /// # Errors
    ///
    /// Returns a validation error naming the first entry, counted from 1, that
    /// lacks a title or content
    pub fn validate(self) -> ActionResult<Vec<KbEntryPayload>> {
        if let Some(index) = self.entries.iter().position(|e| !e.is_complete()) {
            return Err(ActionError::validation(format!(
                "Entry #{} is missing title or content",
                index + 1
            )));
        }
        Ok(self.entries.into_iter().map(EntryForm::into_payload).collect())
    }
}

/// Business profile with its structured config
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BusinessProfileForm {
    /// Business name
    #[serde(default, deserialize_with = "lenient_text")]
    pub name: String,
    /// Business description
    #[serde(default, deserialize_with = "lenient_text")]
    pub description: String,
    /// Business category
    #[serde(rename = "type", default, deserialize_with = "lenient_text")]
    pub profile_type: String,
    /// Intended customers
    #[serde(default, deserialize_with = "lenient_text")]
    pub target_audience: String,
    /// Unique selling point
    #[serde(default, deserialize_with = "lenient_text")]
    pub usp: String,
    /// Opening hours
    #[serde(default, deserialize_with = "lenient_text")]
    pub operating_hours: String,
    /// Contact channels
    #[serde(default)]
    pub contact: Vec<Contact>,
}

impl BusinessProfileForm {
    /// Request body; contacts with a blank source are dropped
    #[must_use]
    pub fn into_payload(self) -> BusinessProfilePayload {
        BusinessProfilePayload {
            name: self.name,
            description: self.description,
            profile_type: self.profile_type,
            config: BusinessProfileConfig {
                target_audience: self.target_audience,
                usp: self.usp,
                operating_hours: self.operating_hours,
                contact: self
                    .contact
                    .into_iter()
                    .filter(|c| !c.source.trim().is_empty())
                    .collect(),
            },
        }
    }
}

/// Chat session metadata, as JSON text or an object
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SessionMetadataForm {
    /// Metadata object
    #[serde(default)]
    pub metadata: Value,
}

impl SessionMetadataForm {
    /// Validate into a metadata object
    ///
    /// # Errors
    ///
    /// Returns a validation error when the metadata is not a JSON object
    pub fn validate(self) -> ActionResult<Map<String, Value>> {
        const MESSAGE: &str = "Invalid JSON format";
        match self.metadata {
            Value::Object(map) => Ok(map),
            Value::String(raw) => json_object(&raw, MESSAGE),
            _ => Err(ActionError::validation(MESSAGE)),
        }
    }
}

/// A chat turn submitted from the playground
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ChatMessageForm {
    /// Message text
    #[serde(default, deserialize_with = "lenient_text")]
    pub content: String,
    /// Knowledge base used when no session exists yet
    #[serde(default, deserialize_with = "lenient_text")]
    pub knowledge_base_id: String,
}

impl ChatMessageForm {
    /// Validate the message text
    ///
    /// # Errors
    ///
    /// Returns a validation error for a blank message
    pub fn validate(&self) -> ActionResult<()> {
        require_all(&[self.content.trim()], "Message is required")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_batch_reports_first_incomplete_entry() {
        let form: BatchEntryForm = serde_json::from_value(json!({
            "entries": [
                { "title": "Hours", "content": "9-5", "source": "faq" },
                { "title": "Prices", "content": "  " },
                { "title": "", "content": "x" }
            ]
        }))
        .unwrap();
        assert_eq!(
            form.validate().unwrap_err().message,
            "Entry #2 is missing title or content"
        );
    }

    #[test]
    fn test_entry_source_defaults_to_manual() {
        let payload = EntryForm {
            title: "Hours".into(),
            content: "9-5".into(),
            source: String::new(),
        }
        .into_payload();
        assert_eq!(payload.metadata.get("source"), Some(&json!("manual")));
    }

    #[test]
    fn test_business_profile_drops_blank_contacts() {
        let form: BusinessProfileForm = serde_json::from_value(json!({
            "name": "Cafe", "description": "Coffee", "type": "retail",
            "contact": [
                { "platform": "line", "source": "@cafe" },
                { "platform": "phone", "source": " " }
            ]
        }))
        .unwrap();
        let payload = form.into_payload();
        assert_eq!(payload.profile_type, "retail");
        assert_eq!(payload.config.contact.len(), 1);
        assert_eq!(payload.config.contact[0].platform, "line");
    }

    #[test]
    fn test_session_metadata_accepts_text_or_object() {
        let form = SessionMetadataForm {
            metadata: json!(r#"{"customer":"c-1"}"#),
        };
        assert_eq!(form.validate().unwrap().get("customer"), Some(&json!("c-1")));

        let form = SessionMetadataForm {
            metadata: json!({ "vip": true }),
        };
        assert!(form.validate().is_ok());

        let form = SessionMetadataForm {
            metadata: json!("[1]"),
        };
        assert_eq!(form.validate().unwrap_err().message, "Invalid JSON format");
    }

    #[test]
    fn test_persona_sends_all_config_fields() {
        let payload = PersonaForm {
            name: "Mali".into(),
            tone: "friendly".into(),
            ..PersonaForm::default()
        }
        .into_payload();
        assert_eq!(payload.config.len(), 7);
        assert_eq!(payload.config.get("greeting"), Some(&json!("")));
    }

    #[test]
    fn test_knowledge_base_omits_unselected_links() {
        let payload = KnowledgeBaseForm {
            name: "FAQ".into(),
            persona_id: "per_1".into(),
            ..KnowledgeBaseForm::default()
        }
        .into_payload();
        assert_eq!(payload.persona_id.as_deref(), Some("per_1"));
        assert_eq!(payload.business_profile_id, None);
    }
}
