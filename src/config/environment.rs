// ABOUTME: Environment-based server configuration with typed sections and parse errors
// ABOUTME: Loads backend base URL, cookie policy, CORS origins and chat poll settings
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Async-IO.org

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::fmt;
use std::time::Duration;
use tracing::info;
use url::Url;

use crate::constants::{chat, session};

/// Default console HTTP port
pub const DEFAULT_HTTP_PORT: u16 = 3000;

/// Default backend base URL
pub const DEFAULT_API_BASE_URL: &str = "http://localhost:8080/api/v1";

/// Deployment environment
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    /// Local development
    #[default]
    Development,
    /// Production; session cookies are marked `Secure`
    Production,
    /// Automated tests
    Testing,
}

impl Environment {
    /// Parse from string with fallback to development
    #[must_use]
    pub fn from_str_or_default(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "production" | "prod" => Self::Production,
            "testing" | "test" => Self::Testing,
            _ => Self::Development,
        }
    }

    /// Check if this is a production environment
    #[must_use]
    pub const fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Development => write!(f, "development"),
            Self::Production => write!(f, "production"),
            Self::Testing => write!(f, "testing"),
        }
    }
}

/// Upstream backend API
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackendConfig {
    /// Base URL without a trailing slash, e.g. `http://localhost:8080/api/v1`
    pub base_url: String,
}

impl BackendConfig {
    /// Validate and normalize a base URL
    ///
    /// # Errors
    ///
    /// Returns an error if the value is not an absolute http(s) URL
    pub fn new(base_url: &str) -> Result<Self> {
        let parsed = Url::parse(base_url).with_context(|| format!("Invalid API_BASE_URL: {base_url}"))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            anyhow::bail!("API_BASE_URL must use http or https, got {}", parsed.scheme());
        }
        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_owned(),
        })
    }
}

/// Session cookie policy
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionConfig {
    /// Cookie name carrying the backend token
    pub cookie_name: String,
    /// Lifetime used when the backend sends no expiry
    pub default_ttl_secs: i64,
    /// Whether cookies carry the `Secure` attribute
    pub secure: bool,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            cookie_name: session::COOKIE_NAME.to_owned(),
            default_ttl_secs: session::DEFAULT_TTL_SECS,
            secure: false,
        }
    }
}

/// CORS policy
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CorsConfig {
    /// `["*"]` or an explicit origin list
    pub allowed_origins: Vec<String>,
}

/// Chat playground polling
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatConfig {
    /// Delay between job status checks
    pub poll_interval: Duration,
    /// Language sent with each message
    pub language: String,
    /// Whether prior turns are used as context
    pub use_history: bool,
    /// How long an unused API key keeps its controller
    pub idle_ttl: Duration,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_millis(chat::POLL_INTERVAL_MS),
            language: chat::DEFAULT_LANGUAGE.to_owned(),
            use_history: true,
            idle_ttl: Duration::from_secs(chat::IDLE_TTL_SECS),
        }
    }
}

/// Complete console configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Port the console listens on
    pub http_port: u16,
    /// Deployment environment
    pub environment: Environment,
    /// Upstream backend
    pub backend: BackendConfig,
    /// Session cookie policy
    pub session: SessionConfig,
    /// CORS policy
    pub cors: CorsConfig,
    /// Chat polling
    pub chat: ChatConfig,
}

impl ServerConfig {
    /// Load configuration from environment variables
    ///
    /// # Errors
    ///
    /// Returns an error if any variable is set to an unparseable value
    pub fn from_env() -> Result<Self> {
        info!("Loading configuration from environment variables");

        let environment = Environment::from_str_or_default(
            &env::var("ENVIRONMENT")
                .or_else(|_| env::var("NODE_ENV"))
                .unwrap_or_default(),
        );

        let config = Self {
            http_port: env_var_or("HTTP_PORT", &DEFAULT_HTTP_PORT.to_string())
                .parse()
                .context("Invalid HTTP_PORT value")?,
            environment,
            backend: BackendConfig::new(&env_var_or("API_BASE_URL", DEFAULT_API_BASE_URL))?,
            session: SessionConfig {
                cookie_name: env_var_or("SESSION_COOKIE_NAME", session::COOKIE_NAME),
                default_ttl_secs: env_var_or(
                    "SESSION_DEFAULT_TTL_SECS",
                    &session::DEFAULT_TTL_SECS.to_string(),
                )
                .parse()
                .context("Invalid SESSION_DEFAULT_TTL_SECS value")?,
                secure: environment.is_production(),
            },
            cors: CorsConfig {
                allowed_origins: parse_origins(&env_var_or("CORS_ALLOWED_ORIGINS", "*")),
            },
            chat: ChatConfig {
                poll_interval: Duration::from_millis(
                    env_var_or("CHAT_POLL_INTERVAL_MS", &chat::POLL_INTERVAL_MS.to_string())
                        .parse()
                        .context("Invalid CHAT_POLL_INTERVAL_MS value")?,
                ),
                language: env_var_or("CHAT_LANGUAGE", chat::DEFAULT_LANGUAGE),
                use_history: env_var_or("CHAT_USE_HISTORY", "true")
                    .parse()
                    .context("Invalid CHAT_USE_HISTORY value")?,
                idle_ttl: Duration::from_secs(
                    env_var_or("CHAT_IDLE_TTL_SECS", &chat::IDLE_TTL_SECS.to_string())
                        .parse()
                        .context("Invalid CHAT_IDLE_TTL_SECS value")?,
                ),
            },
        };

        Ok(config)
    }

    /// Configuration pointing at a given backend, for tests and embedding
    ///
    /// # Errors
    ///
    /// Returns an error if `base_url` is not a valid http(s) URL
    pub fn for_backend(base_url: &str) -> Result<Self> {
        Ok(Self {
            http_port: DEFAULT_HTTP_PORT,
            environment: Environment::Testing,
            backend: BackendConfig::new(base_url)?,
            session: SessionConfig::default(),
            cors: CorsConfig {
                allowed_origins: vec!["*".to_owned()],
            },
            chat: ChatConfig::default(),
        })
    }

    /// Get a summary of the configuration for logging (without secrets)
    #[must_use]
    pub fn summary(&self) -> String {
        format!(
            "Xaze Console Configuration:\n\
             - HTTP Port: {}\n\
             - Environment: {}\n\
             - Backend: {}\n\
             - Session Cookie: {} (secure: {}, default ttl: {}s)\n\
             - CORS Origins: {}\n\
             - Chat Poll Interval: {}ms (language: {}, history: {}, idle ttl: {}s)",
            self.http_port,
            self.environment,
            self.backend.base_url,
            self.session.cookie_name,
            self.session.secure,
            self.session.default_ttl_secs,
            self.cors.allowed_origins.join(","),
            self.chat.poll_interval.as_millis(),
            self.chat.language,
            self.chat.use_history,
            self.chat.idle_ttl.as_secs(),
        )
    }
}

/// Get environment variable or default value
fn env_var_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_owned())
}

/// Parse comma-separated CORS origins
fn parse_origins(origins_str: &str) -> Vec<String> {
    if origins_str.trim() == "*" {
        vec!["*".to_owned()]
    } else {
        origins_str
            .split(',')
            .map(|s| s.trim().to_owned())
            .filter(|s| !s.is_empty())
            .collect()
    }
}
