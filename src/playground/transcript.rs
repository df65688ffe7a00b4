// ABOUTME: Chat transcript with user, assistant and bot bubbles
// ABOUTME: A pending reply is a "Thinking..." bot bubble that the outcome replaces in place
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Async-IO.org

use serde::Serialize;

use crate::constants::chat;
use xaze_core::models::HistoryMessage;

/// Author of a bubble
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Speaker {
    /// Typed by the operator
    User,
    /// Produced by the model
    Assistant,
    /// System prompt echoed by the backend
    System,
    /// Console-generated status text
    Bot,
}

impl Speaker {
    fn from_history(role: &str) -> Self {
        match role {
            "user" => Self::User,
            "assistant" => Self::Assistant,
            "system" => Self::System,
            _ => Self::Bot,
        }
    }
}

/// One message bubble
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Bubble {
    /// Author
    pub role: Speaker,
    /// Text
    pub content: String,
    /// Rendered as an error
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub is_error: bool,
}

impl Bubble {
    /// Operator message
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Speaker::User,
            content: content.into(),
            is_error: false,
        }
    }

    /// Model reply
    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Speaker::Assistant,
            content: content.into(),
            is_error: false,
        }
    }

    /// Bot error bubble
    pub fn error(content: impl Into<String>) -> Self {
        Self {
            role: Speaker::Bot,
            content: content.into(),
            is_error: true,
        }
    }

    fn thinking() -> Self {
        Self {
            role: Speaker::Bot,
            content: chat::THINKING_PLACEHOLDER.to_owned(),
            is_error: false,
        }
    }

    fn is_thinking(&self) -> bool {
        self.role == Speaker::Bot && self.content == chat::THINKING_PLACEHOLDER
    }
}

impl From<&HistoryMessage> for Bubble {
    fn from(message: &HistoryMessage) -> Self {
        Self {
            role: Speaker::from_history(&message.role),
            content: message.content.clone(),
            is_error: false,
        }
    }
}

/// Ordered bubbles of the selected session
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Transcript {
    messages: Vec<Bubble>,
}

impl Transcript {
    /// Transcript rebuilt from a session history
    #[must_use]
    pub fn from_history(history: &[HistoryMessage]) -> Self {
        Self {
            messages: history.iter().map(Bubble::from).collect(),
        }
    }

    /// Append the operator's message followed by the pending placeholder
    pub fn begin_turn(&mut self, content: &str) {
        self.messages.push(Bubble::user(content));
        self.messages.push(Bubble::thinking());
    }

    /// Replace a trailing placeholder with `bubble`, or append it
    pub fn resolve(&mut self, bubble: Bubble) {
        if self.messages.last().is_some_and(Bubble::is_thinking) {
            self.messages.pop();
        }
        self.messages.push(bubble);
    }

    /// Whether the last bubble is the pending placeholder
    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.messages.last().is_some_and(Bubble::is_thinking)
    }

    /// Drop every bubble
    pub fn clear(&mut self) {
        self.messages.clear();
    }

    /// Bubbles, oldest first
    #[must_use]
    pub fn messages(&self) -> &[Bubble] {
        &self.messages
    }

    /// Whether there is nothing to show
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn history(role: &str, content: &str) -> HistoryMessage {
        HistoryMessage {
            role: role.into(),
            content: content.into(),
        }
    }

    #[test]
    fn test_reply_replaces_placeholder() {
        let mut transcript = Transcript::default();
        transcript.begin_turn("hello");
        assert!(transcript.is_pending());

        transcript.resolve(Bubble::assistant("hi there"));
        assert_eq!(
            transcript.messages(),
            &[Bubble::user("hello"), Bubble::assistant("hi there")]
        );
        assert!(!transcript.is_pending());
    }

    #[test]
    fn test_resolve_without_placeholder_appends() {
        let mut transcript = Transcript::from_history(&[history("assistant", "earlier")]);
        transcript.resolve(Bubble::error("Error: boom"));
        assert_eq!(transcript.messages().len(), 2);
        assert!(transcript.messages()[1].is_error);
    }

    #[test]
    fn test_history_roles() {
        let transcript = Transcript::from_history(&[
            history("user", "q"),
            history("assistant", "a"),
            history("tool", "t"),
        ]);
        let roles: Vec<Speaker> = transcript.messages().iter().map(|b| b.role).collect();
        assert_eq!(roles, [Speaker::User, Speaker::Assistant, Speaker::Bot]);
    }

    #[test]
    fn test_bubble_wire_shape() {
        let json = serde_json::to_value(Bubble::error("(No response received)")).unwrap();
        assert_eq!(
            json,
            serde_json::json!({ "role": "bot", "content": "(No response received)", "is_error": true })
        );
        let json = serde_json::to_value(Bubble::user("x")).unwrap();
        assert!(json.get("is_error").is_none());
    }
}
