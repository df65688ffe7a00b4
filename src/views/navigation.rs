// ABOUTME: Sidebar navigation groups per console area and application metadata
// ABOUTME: The active item is derived from the request path
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Async-IO.org

use chrono::{Datelike, Utc};
use serde::Serialize;

use crate::constants::app;
use xaze_core::models::Role;

/// One sidebar link
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct NavItem {
    /// Link text
    pub title: &'static str,
    /// Target path
    pub url: &'static str,
    /// Icon name understood by the renderer
    pub icon: &'static str,
}

/// A labelled group of sidebar links
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct NavGroup {
    /// Stable group id
    pub id: u8,
    /// Group heading
    pub label: &'static str,
    /// Links in display order
    pub items: &'static [NavItem],
}

/// Console area a page belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Area {
    /// Platform operator pages
    System,
    /// Reseller pages
    Partner,
    /// API-key sandbox
    Playground,
}

impl Area {
    /// Area of a request path
    #[must_use]
    pub fn of_path(path: &str) -> Option<Self> {
        let first = path.trim_start_matches('/').split('/').next()?;
        match first {
            "system" => Some(Self::System),
            "partner" => Some(Self::Partner),
            "playground" => Some(Self::Playground),
            _ => None,
        }
    }

    /// Area an administrator lands in after login
    #[must_use]
    pub const fn for_role(role: &Role) -> Option<Self> {
        match role {
            Role::SystemAdmin => Some(Self::System),
            Role::PartnerAdmin => Some(Self::Partner),
            Role::Other(_) => None,
        }
    }

    /// Sidebar groups for the area
    #[must_use]
    pub const fn groups(self) -> &'static [NavGroup] {
        match self {
            Self::System => SYSTEM_GROUPS,
            Self::Partner => PARTNER_GROUPS,
            Self::Playground => PLAYGROUND_GROUPS,
        }
    }
}

const SYSTEM_GROUPS: &[NavGroup] = &[NavGroup {
    id: 1,
    label: "Platform",
    items: &[
        NavItem { title: "Dashboard", url: "/system", icon: "home" },
        NavItem { title: "Partners", url: "/system/partners", icon: "users" },
        NavItem { title: "Transactions", url: "/system/transactions", icon: "file-text" },
        NavItem { title: "Settings", url: "/system/settings", icon: "settings" },
        NavItem { title: "Personas", url: "/system/personas", icon: "user" },
        NavItem { title: "Playground", url: "/playground/chat", icon: "square-terminal" },
    ],
}];

const PARTNER_GROUPS: &[NavGroup] = &[
    NavGroup {
        id: 1,
        label: "Tools",
        items: &[
            NavItem { title: "Home", url: "/partner", icon: "home" },
            NavItem { title: "Models", url: "/partner/models", icon: "package" },
            NavItem { title: "Tenants", url: "/partner/tenants", icon: "layout-grid" },
            NavItem { title: "Transactions", url: "/partner/transactions", icon: "circle-dollar-sign" },
        ],
    },
    NavGroup {
        id: 2,
        label: "Support",
        items: &[
            NavItem { title: "Settings", url: "/partner/settings", icon: "settings" },
            NavItem { title: "Terms & Conditions", url: "/partner/terms", icon: "file-text" },
            NavItem { title: "Contact Us", url: "/partner/contact", icon: "phone" },
        ],
    },
];

const PLAYGROUND_GROUPS: &[NavGroup] = &[NavGroup {
    id: 1,
    label: "Playground",
    items: &[
        NavItem { title: "Chat", url: "/playground/chat", icon: "message-square" },
        NavItem { title: "Persona", url: "/playground/persona", icon: "users" },
        NavItem { title: "Business Profile", url: "/playground/business-profile", icon: "building-2" },
        NavItem { title: "Knowledge Base", url: "/playground/knowledge-base", icon: "database" },
    ],
}];

/// Sidebar as sent to the renderer
#[derive(Debug, Clone, Serialize)]
pub struct Sidebar {
    /// Area shown
    pub area: Area,
    /// Groups of links
    pub groups: &'static [NavGroup],
    /// URL of the highlighted link
    #[serde(skip_serializing_if = "Option::is_none")]
    pub active: Option<&'static str>,
}

impl Sidebar {
    /// Sidebar for `area` with the link matching `path` highlighted
    ///
    /// The longest matching link wins, so `/partner/tenants/t1` highlights
    /// Tenants rather than Home.
    #[must_use]
    pub fn for_path(area: Area, path: &str) -> Self {
        let active = area
            .groups()
            .iter()
            .flat_map(|g| g.items.iter())
            .filter(|item| {
                path == item.url
                    || path
                        .strip_prefix(item.url)
                        .is_some_and(|rest| rest.starts_with('/'))
            })
            .max_by_key(|item| item.url.len())
            .map(|item| item.url);
        Self {
            area,
            groups: area.groups(),
            active,
        }
    }
}

/// Page title and footer text
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct AppMeta {
    /// Product name
    pub name: &'static str,
    /// Build version
    pub version: &'static str,
    /// Footer copyright line
    pub copyright: String,
    /// HTML title
    pub title: &'static str,
    /// HTML meta description
    pub description: &'static str,
}

impl AppMeta {
    /// Metadata with the copyright year of `year`
    #[must_use]
    pub fn for_year(year: i32) -> Self {
        Self {
            name: app::NAME,
            version: app::VERSION,
            copyright: format!("© {year}, {}.", app::NAME),
            title: app::NAME,
            description: app::DESCRIPTION,
        }
    }

    /// Metadata for the current year
    #[must_use]
    pub fn current() -> Self {
        Self::for_year(Utc::now().year())
    }
}
