// ABOUTME: Server-side view models for console pages
// ABOUTME: Tables, sidebar navigation, page metadata and toast envelopes rendered as JSON
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Async-IO.org

//! # View Models
//!
//! Pages are rendered by the browser from JSON view models. This module
//! shapes backend data into those models: tables are sorted, searched and
//! paged here, amounts are formatted, and mutations answer with an
//! [`notifications::ActionOutcome`].

/// Per-entity column sets
pub mod columns;
/// Dashboard cards, account summary and model list
pub mod dashboard;
/// Sidebar groups and application metadata
pub mod navigation;
/// Toasts and mutation envelopes
pub mod notifications;
/// Generic table model
pub mod table;

use serde::Serialize;

use navigation::{AppMeta, Area, Sidebar};
use xaze_core::models::User;

/// Frame shared by every page: branding, sidebar and signed-in user
#[derive(Debug, Clone, Serialize)]
pub struct PageFrame {
    /// Branding and footer
    pub app: AppMeta,
    /// Sidebar for the page's area
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sidebar: Option<Sidebar>,
    /// Signed-in user, absent in the playground
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<UserBadge>,
}

impl PageFrame {
    /// Frame for a request path
    #[must_use]
    pub fn for_path(path: &str, user: Option<&User>) -> Self {
        Self {
            app: AppMeta::current(),
            sidebar: Area::of_path(path).map(|area| Sidebar::for_path(area, path)),
            user: user.map(UserBadge::from),
        }
    }
}

/// User summary shown in the sidebar footer
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct UserBadge {
    /// Display name
    pub name: String,
    /// E-mail address
    pub email: String,
    /// Role claim
    pub role: String,
    /// Avatar URL
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
}

impl From<&User> for UserBadge {
    fn from(user: &User) -> Self {
        Self {
            name: user.display_name(),
            email: user.email.clone(),
            role: user.role.as_str().to_owned(),
            avatar: user.avatar.clone(),
        }
    }
}

/// Page payload: frame plus page-specific content
#[derive(Debug, Clone, Serialize)]
pub struct PageView<T: Serialize> {
    /// Shared frame
    pub frame: PageFrame,
    /// Page content
    pub content: T,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_frame_uses_email_local_part() {
        let user: User = serde_json::from_value(json!({
            "id": "u1", "email": "ops@xaze.ai", "role": "SYSTEM_ADMIN"
        }))
        .unwrap();
        let frame = PageFrame::for_path("/system/partners", Some(&user));
        let badge = frame.user.unwrap();
        assert_eq!(badge.name, "ops");
        assert_eq!(frame.sidebar.unwrap().active, Some("/system/partners"));
    }
}
