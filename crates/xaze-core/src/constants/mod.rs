// ABOUTME: Constants module with domain-separated organization
// ABOUTME: Backend paths, header names, storage keys, roles and defaults for the console
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Async-IO.org

//! Constants module
//!
//! Constants are grouped by domain rather than kept in a single flat list.

/// Backend REST API paths, relative to the configured base URL
pub mod backend {
    /// Login endpoint
    pub const AUTH_LOGIN: &str = "/auth/login";
    /// Current user endpoint
    pub const AUTH_ME: &str = "/auth/me";
    /// System partner collection
    pub const SYSTEM_PARTNERS: &str = "/system/partners";
    /// System transaction ledger
    pub const SYSTEM_TRANSACTIONS: &str = "/system/transactions";
    /// Overview statistics
    pub const SYSTEM_STATS_OVERVIEW: &str = "/system/stats/overview";
    /// Usage statistics
    pub const SYSTEM_STATS_USAGE: &str = "/system/stats/usage";
    /// Model catalog
    pub const SYSTEM_MODELS: &str = "/system/config/models";
    /// Provider catalog
    pub const SYSTEM_PROVIDERS: &str = "/system/config/providers";
    /// System persona collection
    pub const SYSTEM_PERSONAS: &str = "/system/personas";
    /// System persona option lists
    pub const SYSTEM_PERSONA_OPTIONS: &str = "/system/personas/options";
    /// Partner profile
    pub const PARTNER_PROFILE: &str = "/partner/profile";
    /// Partner tenant collection
    pub const PARTNER_TENANTS: &str = "/partner/tenants";
    /// Models available to a partner
    pub const PARTNER_MODELS: &str = "/partner/models";
    /// Partner transaction ledger
    pub const PARTNER_TRANSACTIONS: &str = "/partner/transactions";
    /// Playground personas
    pub const PERSONAS: &str = "/personas";
    /// Playground persona option lists
    pub const PERSONA_OPTIONS: &str = "/personas/options";
    /// Knowledge bases
    pub const KNOWLEDGE: &str = "/knowledge";
    /// Business profiles
    pub const BUSINESS_PROFILES: &str = "/business-profiles";
    /// Credit balance, used to verify an API key
    pub const CREDITS: &str = "/credits";
    /// Chat sessions
    pub const CHAT_SESSIONS: &str = "/chat/sessions";
    /// Chat jobs
    pub const CHAT_JOBS: &str = "/chat/jobs";
}

/// HTTP header names
pub mod headers {
    /// API key header used by playground calls
    pub const API_KEY: &str = "x-api-key";
    /// Request correlation header
    pub const REQUEST_ID: &str = "x-request-id";
}

/// Console route prefixes
pub mod routes {
    /// Login page
    pub const LOGIN: &str = "/login";
    /// Registration page
    pub const REGISTER: &str = "/register";
    /// Logout action
    pub const LOGOUT: &str = "/logout";
    /// System admin home
    pub const SYSTEM_HOME: &str = "/system";
    /// Partner admin home
    pub const PARTNER_HOME: &str = "/partner";
    /// Playground root
    pub const PLAYGROUND: &str = "/playground";
    /// Health check
    pub const HEALTH: &str = "/health";
}

/// Role claim values issued by the backend
pub mod roles {
    /// Platform operator
    pub const SYSTEM_ADMIN: &str = "SYSTEM_ADMIN";
    /// Reseller operator
    pub const PARTNER_ADMIN: &str = "PARTNER_ADMIN";
}

/// Session cookie defaults
pub mod session {
    /// Cookie carrying the backend bearer token
    pub const COOKIE_NAME: &str = "token";
    /// Cookie lifetime when the backend does not send `expires_at`
    pub const DEFAULT_TTL_SECS: i64 = 60 * 60 * 24;
}

/// Keys used in client-local storage
pub mod storage_keys {
    /// Playground API key
    pub const PLAYGROUND_API_KEY: &str = "playground_api_key";
    /// Selected chat session
    pub const CHAT_SESSION_ID: &str = "playground_chat_session_id";
    /// Selected knowledge base
    pub const CHAT_KB_ID: &str = "playground_chat_kb_id";
    /// CLI session token
    pub const SESSION_TOKEN: &str = "session_token";
}

/// Chat playground defaults
pub mod chat {
    /// Interval between job status checks
    pub const POLL_INTERVAL_MS: u64 = 1000;
    /// Language sent with each message
    pub const DEFAULT_LANGUAGE: &str = "th";
    /// Placeholder shown while a reply is pending
    pub const THINKING_PLACEHOLDER: &str = "Thinking...";
    /// Bubble shown when a completed job produced no assistant message
    pub const NO_RESPONSE: &str = "(No response received)";
    /// Untouched controllers older than this are evicted
    pub const IDLE_TTL_SECS: u64 = 1800;
    /// Upper bound between idle sweeps
    pub const SWEEP_INTERVAL_SECS: u64 = 60;
}

/// API key scopes granted on creation
pub mod scopes {
    /// Scopes for partner keys issued by a system admin
    pub const PARTNER_KEY: &[&str] = &["admin"];
    /// Scopes for tenant keys issued by a partner admin
    pub const TENANT_KEY: &[&str] = &["chat:read", "chat:write"];
}

/// List limits
pub mod limits {
    /// Transactions fetched in one bulk call before client-side paging
    pub const TRANSACTION_FETCH_LIMIT: usize = 1000;
    /// System personas fetched per call
    pub const PERSONA_FETCH_LIMIT: usize = 20;
    /// System personas fetched for the personas page
    pub const PERSONA_PAGE_LIMIT: usize = 1000;
    /// Table rows per page
    pub const DEFAULT_PAGE_SIZE: usize = 10;
}

/// Service names used in logs
pub mod service_names {
    /// Console server
    pub const XAZE_CONSOLE: &str = "xaze-console";
    /// Operator CLI
    pub const XAZE_CLI: &str = "xaze-cli";
}
