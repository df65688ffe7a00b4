// ABOUTME: Main library entry point for the Xaze.ai console server and CLI
// ABOUTME: Role-scoped admin gateway in front of the Xaze billing backend plus the API-key playground
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Async-IO.org

#![deny(unsafe_code)]

//! # Xaze Console
//!
//! A backend-for-frontend that serves the Xaze.ai admin dashboard. It holds
//! no data of its own: every page and action is a call to the Xaze backend
//! made with the caller's credentials.
//!
//! ## Surfaces
//!
//! - **System admin**: partners, wallets, models, providers and personas
//! - **Partner admin**: account, tenants, tenant keys and the ledger
//! - **Playground**: API-key scoped personas, knowledge bases and chat
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use xaze_console::config::ServerConfig;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = ServerConfig::from_env()?;
//!     xaze_console::server::run(config).await
//! }
//! ```

// ── Public API ──────────────────────────────────────────────────────────
// Used by the binaries in src/bin/ and by integration tests.

/// Backend action layer
pub mod client;

/// Environment configuration
pub mod config;

/// Application constants
pub mod constants;

/// Error types shared with the core crate
pub mod errors;

/// Form payloads and their validation
pub mod forms;

/// Structured logging
pub mod logging;

/// HTTP middleware: tracing, role guard, CORS
pub mod middleware;

/// Chat playground controller and job poller
pub mod playground;

/// HTTP routes
pub mod routes;

/// Server resources, router assembly and serve loop
pub mod server;

/// Session cookie, token claims and route guard
pub mod session;

/// Client-local key/value store
pub mod storage;

/// Page view models: tables, navigation, dashboards and toasts
pub mod views;
