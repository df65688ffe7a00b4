// ABOUTME: Tests for environment-driven console configuration
// ABOUTME: Runs serially because each case mutates process environment variables
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Async-IO.org

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

use serial_test::serial;
use std::env;
use std::time::Duration;
use xaze_console::config::{Environment, ServerConfig, DEFAULT_API_BASE_URL, DEFAULT_HTTP_PORT};

const VARS: &[&str] = &[
    "HTTP_PORT",
    "ENVIRONMENT",
    "NODE_ENV",
    "API_BASE_URL",
    "SESSION_COOKIE_NAME",
    "SESSION_DEFAULT_TTL_SECS",
    "CORS_ALLOWED_ORIGINS",
    "CHAT_POLL_INTERVAL_MS",
    "CHAT_LANGUAGE",
    "CHAT_USE_HISTORY",
    "CHAT_IDLE_TTL_SECS",
];

fn clear_env() {
    for var in VARS {
        env::remove_var(var);
    }
}

#[test]
#[serial]
fn test_defaults_without_environment() {
    clear_env();
    let config = ServerConfig::from_env().unwrap();

    assert_eq!(config.http_port, DEFAULT_HTTP_PORT);
    assert_eq!(config.environment, Environment::Development);
    assert_eq!(config.backend.base_url, DEFAULT_API_BASE_URL);
    assert_eq!(config.session.cookie_name, "token");
    assert_eq!(config.session.default_ttl_secs, 86_400);
    assert!(!config.session.secure);
    assert_eq!(config.cors.allowed_origins, vec!["*"]);
    assert_eq!(config.chat.poll_interval, Duration::from_secs(1));
    assert_eq!(config.chat.language, "th");
    assert!(config.chat.use_history);
    assert_eq!(config.chat.idle_ttl, Duration::from_secs(1800));
}

#[test]
#[serial]
fn test_production_marks_cookies_secure() {
    clear_env();
    env::set_var("NODE_ENV", "production");
    env::set_var("API_BASE_URL", "https://api.xaze.test/api/v1/");
    env::set_var("CORS_ALLOWED_ORIGINS", "https://console.xaze.test, https://admin.xaze.test");

    let config = ServerConfig::from_env().unwrap();
    clear_env();

    assert!(config.environment.is_production());
    assert!(config.session.secure);
    assert_eq!(config.backend.base_url, "https://api.xaze.test/api/v1");
    assert_eq!(
        config.cors.allowed_origins,
        vec!["https://console.xaze.test", "https://admin.xaze.test"]
    );
}

#[test]
#[serial]
fn test_invalid_values_are_rejected() {
    clear_env();
    env::set_var("HTTP_PORT", "not-a-port");
    let err = ServerConfig::from_env().unwrap_err();
    assert!(err.to_string().contains("HTTP_PORT"));

    clear_env();
    env::set_var("API_BASE_URL", "ftp://files.xaze.test");
    assert!(ServerConfig::from_env().is_err());

    clear_env();
    env::set_var("CHAT_USE_HISTORY", "sometimes");
    assert!(ServerConfig::from_env().is_err());
    clear_env();
}

#[test]
#[serial]
fn test_chat_overrides() {
    clear_env();
    env::set_var("CHAT_POLL_INTERVAL_MS", "250");
    env::set_var("CHAT_LANGUAGE", "en");
    env::set_var("CHAT_USE_HISTORY", "false");
    env::set_var("CHAT_IDLE_TTL_SECS", "120");

    let config = ServerConfig::from_env().unwrap();
    clear_env();

    assert_eq!(config.chat.poll_interval, Duration::from_millis(250));
    assert_eq!(config.chat.language, "en");
    assert!(!config.chat.use_history);
    assert_eq!(config.chat.idle_ttl, Duration::from_secs(120));
    assert!(config.summary().contains("250ms"));
}
