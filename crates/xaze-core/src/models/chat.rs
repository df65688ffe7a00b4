// ABOUTME: Chat session, message and job DTOs used by the playground poller
// ABOUTME: Job status values other than completed and failed count as still running
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Async-IO.org

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};

/// Chat session bound to a knowledge base
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatSession {
    /// Session id
    pub id: String,
    /// Owning tenant
    #[serde(default)]
    pub tenant_id: String,
    /// Knowledge base used for retrieval
    #[serde(default)]
    pub knowledge_base_id: String,
    /// Free-form session metadata
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Map<String, Value>>,
    /// Creation timestamp
    #[serde(default)]
    pub created_at: String,
    /// Last update timestamp
    #[serde(default)]
    pub updated_at: String,
}

/// Body for `POST /chat/sessions`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CreateSessionRequest {
    /// Knowledge base to chat against
    pub knowledge_base_id: String,
}

/// Body for `PUT /chat/sessions/{id}`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SessionMetadataUpdate {
    /// Replacement metadata object
    pub metadata: Map<String, Value>,
}

/// One message in a session history
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct HistoryMessage {
    /// `user`, `assistant` or `system`
    pub role: String,
    /// Message text
    pub content: String,
}

impl HistoryMessage {
    /// Whether the message was produced by the model
    #[must_use]
    pub fn is_assistant(&self) -> bool {
        self.role == "assistant"
    }
}

/// Body for `POST /chat/sessions/{id}/messages`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SendMessageRequest {
    /// User text
    pub content: String,
    /// Reply language code
    pub language: String,
    /// Whether prior turns are sent as context
    pub use_history: bool,
}

/// Job handle returned by a message send
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct JobTicket {
    /// Job id to poll
    pub job_id: String,
}

/// Lifecycle state of a chat job
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JobState {
    /// Queued or running
    Pending,
    /// Reply is in the session history
    Completed,
    /// Job gave up
    Failed,
    /// Any other non-terminal status string
    Other(String),
}

impl JobState {
    /// Parse a status string
    #[must_use]
    pub fn parse(value: &str) -> Self {
        match value {
            "pending" => Self::Pending,
            "completed" => Self::Completed,
            "failed" => Self::Failed,
            other => Self::Other(other.to_owned()),
        }
    }

    /// Status string
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Pending => "pending",
            Self::Completed => "completed",
            Self::Failed => "failed",
            Self::Other(value) => value,
        }
    }

    /// Whether polling can stop
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Failed)
    }
}

impl Serialize for JobState {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for JobState {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = String::deserialize(deserializer)?;
        Ok(Self::parse(&value))
    }
}

/// Job status response
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct JobStatus {
    /// Current state
    pub status: JobState,
    /// Failure text when `status` is `failed`
    #[serde(default)]
    pub error: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_job_state_parsing() {
        let status: JobStatus =
            serde_json::from_str(r#"{"status":"failed","error":"quota exceeded"}"#).unwrap();
        assert_eq!(status.status, JobState::Failed);
        assert!(status.status.is_terminal());
        assert_eq!(status.error.as_deref(), Some("quota exceeded"));

        let running: JobStatus = serde_json::from_str(r#"{"status":"processing"}"#).unwrap();
        assert_eq!(running.status, JobState::Other("processing".into()));
        assert!(!running.status.is_terminal());
    }
}
