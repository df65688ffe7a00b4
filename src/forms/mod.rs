// ABOUTME: Form payloads submitted by console pages and their pre-flight validation
// ABOUTME: Turns loosely typed form fields into typed backend request bodies
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Async-IO.org

//! # Forms
//!
//! Browser forms post either JSON or `application/x-www-form-urlencoded`
//! bodies, so numeric inputs may arrive as strings or numbers and checkboxes
//! as `"on"`. Every form here keeps the raw text and validates it in a
//! `validate` step that runs before any backend call. Validation failures
//! are `ActionError::Validation` carrying the message shown to the user.

/// Partner-admin forms
pub mod partner;
/// Playground forms
pub mod playground;
/// System-admin forms
pub mod system;

use serde::{Deserialize, Deserializer};
use serde_json::{Map, Value};

use crate::errors::{ActionError, ActionResult};
use xaze_core::money::parse_number;

/// Deserialize a string, number or boolean field into its text form
///
/// Missing and `null` fields become the empty string.
///
/// # Errors
///
/// Fails for arrays and objects
pub fn lenient_text<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => Ok(String::new()),
        Some(Value::String(s)) => Ok(s),
        Some(Value::Number(n)) => Ok(n.to_string()),
        Some(Value::Bool(b)) => Ok(b.to_string()),
        Some(other) => Err(serde::de::Error::custom(format!(
            "expected a scalar form value, got {other}"
        ))),
    }
}

/// Deserialize a checkbox: `true`, `"on"` and `"true"` are checked
///
/// # Errors
///
/// Never fails for scalar input
pub fn lenient_flag<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::Bool(b)) => b,
        Some(Value::String(s)) => matches!(s.as_str(), "on" | "true"),
        _ => false,
    })
}

/// Fail with `message` when any of `fields` is empty
pub(crate) fn require_all(fields: &[&str], message: &str) -> ActionResult<()> {
    if fields.iter().any(|f| f.is_empty()) {
        return Err(ActionError::validation(message));
    }
    Ok(())
}

/// Non-empty text as `Some`
pub(crate) fn non_empty(value: String) -> Option<String> {
    (!value.is_empty()).then_some(value)
}

/// A strictly positive amount, `message` otherwise
pub(crate) fn positive_amount(raw: &str, message: &str) -> ActionResult<f64> {
    match parse_number(raw) {
        Some(amount) if amount > 0.0 => Ok(amount),
        _ => Err(ActionError::validation(message)),
    }
}

/// A non-negative amount, `message` otherwise
pub(crate) fn non_negative_amount(raw: &str, message: &str) -> ActionResult<f64> {
    match parse_number(raw) {
        Some(amount) if amount >= 0.0 => Ok(amount),
        _ => Err(ActionError::validation(message)),
    }
}

/// An optional number: blank is `None`, anything else must parse
pub(crate) fn optional_number(raw: &str, message: &str) -> ActionResult<Option<f64>> {
    if raw.trim().is_empty() {
        return Ok(None);
    }
    parse_number(raw)
        .map(Some)
        .ok_or_else(|| ActionError::validation(message))
}

/// Parse a JSON object entered as text, `message` when it is not one
pub(crate) fn json_object(raw: &str, message: &str) -> ActionResult<Map<String, Value>> {
    match serde_json::from_str::<Value>(raw) {
        Ok(Value::Object(map)) => Ok(map),
        _ => Err(ActionError::validation(message)),
    }
}
