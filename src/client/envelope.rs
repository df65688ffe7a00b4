// ABOUTME: Backend response envelope handling: {data: T} unwrapping and {error: msg} extraction
// ABOUTME: Shared by every action so success and failure bodies are read the same way
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Async-IO.org

use serde_json::Value;

/// Payload of a success body: `data` when present and non-null, else the whole body
#[must_use]
pub fn unwrap_data(body: Value) -> Value {
    match body {
        Value::Object(mut map) => match map.remove("data") {
            Some(data) if !data.is_null() => data,
            Some(data) => {
                map.insert("data".to_owned(), data);
                Value::Object(map)
            }
            None => Value::Object(map),
        },
        other => other,
    }
}

/// Payload of a list body; a missing or null `data` means an empty list
#[must_use]
pub fn unwrap_list(body: Value) -> Value {
    match unwrap_data(body) {
        Value::Null => Value::Array(Vec::new()),
        Value::Object(map) if map.get("data").is_some_and(Value::is_null) => {
            Value::Array(Vec::new())
        }
        other => other,
    }
}

/// Non-empty `error` string of a failure body
#[must_use]
pub fn error_message(body: &Value) -> Option<String> {
    body.get("error")
        .and_then(Value::as_str)
        .filter(|message| !message.is_empty())
        .map(ToOwned::to_owned)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_unwrap_prefers_data() {
        assert_eq!(unwrap_data(json!({ "data": { "id": "p1" } })), json!({ "id": "p1" }));
        assert_eq!(unwrap_data(json!({ "id": "p1" })), json!({ "id": "p1" }));
        assert_eq!(unwrap_data(json!({ "data": null, "x": 1 })), json!({ "data": null, "x": 1 }));
        assert_eq!(unwrap_data(json!([1, 2])), json!([1, 2]));
    }

    #[test]
    fn test_unwrap_list_defaults_to_empty() {
        assert_eq!(unwrap_list(json!({ "data": null })), json!([]));
        assert_eq!(unwrap_list(Value::Null), json!([]));
        assert_eq!(unwrap_list(json!({ "data": [1] })), json!([1]));
    }

    #[test]
    fn test_error_message_extraction() {
        assert_eq!(error_message(&json!({ "error": "slug taken" })).as_deref(), Some("slug taken"));
        assert_eq!(error_message(&json!({ "error": "" })), None);
        assert_eq!(error_message(&json!({ "error": { "code": 1 } })), None);
        assert_eq!(error_message(&json!("oops")), None);
    }
}
