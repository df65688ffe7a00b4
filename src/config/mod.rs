// ABOUTME: Configuration management module for the console server and CLI
// ABOUTME: Environment-only configuration: backend URL, session cookie, CORS and chat polling
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Async-IO.org

//! Configuration module
//!
//! All settings come from environment variables; there is no config file.

/// Environment and server configuration
pub mod environment;

pub use environment::{
    BackendConfig, ChatConfig, CorsConfig, Environment, ServerConfig, SessionConfig,
    DEFAULT_API_BASE_URL, DEFAULT_HTTP_PORT,
};
