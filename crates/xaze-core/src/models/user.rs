// ABOUTME: Console user, role claim and login session DTOs
// ABOUTME: Role parsing is shared by the route guard and the auth actions
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Async-IO.org

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

use crate::constants::{roles, routes};

/// Role claim carried by the backend token
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Role {
    /// Platform operator
    SystemAdmin,
    /// Reseller operator
    PartnerAdmin,
    /// Any role the console has no dashboard for
    Other(String),
}

impl Role {
    /// Parse a role claim value
    #[must_use]
    pub fn parse(value: &str) -> Self {
        match value {
            roles::SYSTEM_ADMIN => Self::SystemAdmin,
            roles::PARTNER_ADMIN => Self::PartnerAdmin,
            other => Self::Other(other.to_owned()),
        }
    }

    /// Claim string for this role
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::SystemAdmin => roles::SYSTEM_ADMIN,
            Self::PartnerAdmin => roles::PARTNER_ADMIN,
            Self::Other(value) => value,
        }
    }

    /// Dashboard home for this role, if it has one
    #[must_use]
    pub const fn home(&self) -> Option<&'static str> {
        match self {
            Self::SystemAdmin => Some(routes::SYSTEM_HOME),
            Self::PartnerAdmin => Some(routes::PARTNER_HOME),
            Self::Other(_) => None,
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for Role {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Role {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = String::deserialize(deserializer)?;
        Ok(Self::parse(&value))
    }
}

/// Credentials submitted on the login form
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    /// Account e-mail
    pub email: String,
    /// Account password
    pub password: String,
}

/// Session issued by the backend on login
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginSession {
    /// Bearer token
    pub token: String,
    /// Expiry as Unix seconds
    #[serde(default)]
    pub expires_at: Option<i64>,
    /// Account the token belongs to
    pub user: SessionUser,
}

/// User block embedded in a login response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionUser {
    /// Role claim
    pub role: Role,
    /// Account e-mail
    #[serde(default)]
    pub email: Option<String>,
}

/// Authenticated console user
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    /// Backend user id
    pub id: String,
    /// Account e-mail
    #[serde(default)]
    pub email: String,
    /// Role claim
    pub role: Role,
    /// Display name
    #[serde(default)]
    pub name: Option<String>,
    /// Avatar URL
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
}

impl User {
    /// Name to show, falling back to the e-mail local part and then `User`
    #[must_use]
    pub fn display_name(&self) -> String {
        if let Some(name) = self.name.as_deref().filter(|n| !n.is_empty()) {
            return name.to_owned();
        }
        self.email
            .split('@')
            .next()
            .filter(|local| !local.is_empty())
            .unwrap_or("User")
            .to_owned()
    }
}
