// ABOUTME: Logging configuration and structured logging setup for the console and CLI
// ABOUTME: Builds a tracing subscriber from environment with noise reduction for HTTP internals
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Async-IO.org

//! Structured logging configuration

use crate::constants::service_names;
use anyhow::{anyhow, Result};
use serde_json::json;
use std::env;
use std::io;
use tracing::{debug, info, warn};
use tracing_subscriber::{
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter,
};

/// Logging configuration
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,
    /// Output format (json, pretty, compact)
    pub format: LogFormat,
    /// Include source file and line numbers
    pub include_location: bool,
    /// Include thread information
    pub include_thread: bool,
    /// Emit span open/close events
    pub include_spans: bool,
    /// Service name for structured logging
    pub service_name: String,
    /// Service version
    pub service_version: String,
    /// Environment (development, testing, production)
    pub environment: String,
    /// Where log lines go
    pub writer: LogWriter,
}

/// Log output format options
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    /// `JSON` format for production logging
    Json,
    /// Pretty format for development
    Pretty,
    /// Compact format for terminals
    Compact,
}

/// Log destination
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogWriter {
    /// Standard output, used by the server
    Stdout,
    /// Standard error, used by the CLI so command output stays clean
    Stderr,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".into(),
            format: LogFormat::Pretty,
            include_location: false,
            include_thread: false,
            include_spans: false,
            service_name: service_names::XAZE_CONSOLE.into(),
            service_version: env!("CARGO_PKG_VERSION").to_owned(),
            environment: "development".into(),
            writer: LogWriter::Stdout,
        }
    }
}

impl LogFormat {
    /// Parse `LOG_FORMAT`, defaulting to pretty
    #[must_use]
    pub fn parse(value: Option<&str>) -> Self {
        match value {
            Some("json") => Self::Json,
            Some("compact") => Self::Compact,
            _ => Self::Pretty,
        }
    }
}

impl LoggingConfig {
    /// Create logging configuration from environment variables
    #[must_use]
    pub fn from_env() -> Self {
        let level = env::var("RUST_LOG").unwrap_or_else(|_| "info".into());
        let format = LogFormat::parse(env::var("LOG_FORMAT").ok().as_deref());

        let environment = env::var("ENVIRONMENT")
            .or_else(|_| env::var("NODE_ENV"))
            .unwrap_or_else(|_| "development".into());
        let is_production = environment == "production";

        Self {
            level,
            format,
            include_location: is_production || env::var("LOG_INCLUDE_LOCATION").is_ok(),
            include_thread: env::var("LOG_INCLUDE_THREAD").is_ok(),
            include_spans: env::var("LOG_INCLUDE_SPANS").is_ok(),
            service_name: env::var("SERVICE_NAME")
                .unwrap_or_else(|_| service_names::XAZE_CONSOLE.into()),
            service_version: env::var("SERVICE_VERSION")
                .unwrap_or_else(|_| env!("CARGO_PKG_VERSION").to_owned()),
            environment,
            writer: LogWriter::Stdout,
        }
    }

    /// Configuration for the operator CLI: compact, warn by default, on stderr
    #[must_use]
    pub fn for_cli(verbose: bool) -> Self {
        let level = env::var("RUST_LOG").unwrap_or_else(|_| {
            if verbose {
                "debug".into()
            } else {
                "warn".into()
            }
        });
        Self {
            level,
            format: LogFormat::Compact,
            service_name: service_names::XAZE_CLI.into(),
            writer: LogWriter::Stderr,
            ..Self::default()
        }
    }

    fn env_filter(&self) -> EnvFilter {
        let base = env::var("RUST_LOG").unwrap_or_else(|_| self.level.clone());
        let mut filter = EnvFilter::new(base);
        for directive in [
            "hyper=warn",
            "hyper_util=warn",
            "reqwest=warn",
            "rustls=warn",
            "tower_http=info",
        ] {
            if let Ok(parsed) = directive.parse() {
                filter = filter.add_directive(parsed);
            }
        }
        if let Ok(own) = format!("xaze_console={}", self.level).parse() {
            filter = filter.add_directive(own);
        }
        filter
    }

    /// Initialize the global tracing subscriber
    ///
    /// # Errors
    ///
    /// Returns an error if a global subscriber is already installed
    pub fn init(&self) -> Result<()> {
        let registry = tracing_subscriber::registry().with(self.env_filter());
        let span_events = if self.include_spans {
            FmtSpan::NEW | FmtSpan::CLOSE
        } else {
            FmtSpan::NONE
        };

        let result = match (self.format, self.writer) {
            (LogFormat::Json, LogWriter::Stdout) => registry
                .with(
                    fmt::layer()
                        .with_file(self.include_location)
                        .with_line_number(self.include_location)
                        .with_thread_ids(self.include_thread)
                        .with_target(true)
                        .with_writer(io::stdout)
                        .with_span_events(span_events)
                        .json(),
                )
                .try_init(),
            (LogFormat::Json, LogWriter::Stderr) => registry
                .with(
                    fmt::layer()
                        .with_target(true)
                        .with_writer(io::stderr)
                        .with_span_events(span_events)
                        .json(),
                )
                .try_init(),
            (LogFormat::Pretty, LogWriter::Stdout) => registry
                .with(
                    fmt::layer()
                        .with_file(self.include_location)
                        .with_line_number(self.include_location)
                        .with_thread_ids(self.include_thread)
                        .with_target(true)
                        .with_writer(io::stdout)
                        .with_span_events(span_events),
                )
                .try_init(),
            (LogFormat::Pretty, LogWriter::Stderr) => registry
                .with(
                    fmt::layer()
                        .with_target(true)
                        .with_writer(io::stderr)
                        .with_span_events(span_events),
                )
                .try_init(),
            (LogFormat::Compact, LogWriter::Stdout) => registry
                .with(
                    fmt::layer()
                        .compact()
                        .with_target(false)
                        .with_writer(io::stdout),
                )
                .try_init(),
            (LogFormat::Compact, LogWriter::Stderr) => registry
                .with(
                    fmt::layer()
                        .compact()
                        .with_target(false)
                        .with_writer(io::stderr),
                )
                .try_init(),
        };
        result.map_err(|e| anyhow!("Failed to initialize tracing subscriber: {e}"))?;

        self.log_startup_info();
        Ok(())
    }

    fn log_startup_info(&self) {
        let summary = json!({
            "service": {
                "name": self.service_name,
                "version": self.service_version,
                "environment": self.environment
            },
            "logging": {
                "level": self.level,
                "format": format!("{:?}", self.format),
                "location": self.include_location,
                "spans": self.include_spans
            }
        });
        debug!("Logging configured: {summary}");
    }
}

/// Initialize logging from environment
///
/// # Errors
///
/// Returns an error if logging initialization fails
pub fn init_from_env() -> Result<()> {
    LoggingConfig::from_env().init()
}

/// Structured log events shared by the server and the CLI
pub struct AppLogger;

impl AppLogger {
    /// Log a login or logout outcome; never includes credentials
    pub fn log_auth_event(email: &str, event: &str, success: bool, details: Option<&str>) {
        info!(
            user.email = %email,
            auth.event = %event,
            auth.success = %success,
            auth.details = details.unwrap_or(""),
            "Authentication event"
        );
    }

    /// Log a role-guard redirect
    pub fn log_guard_redirect(path: &str, target: &str, role: Option<&str>) {
        debug!(
            http.path = %path,
            guard.target = %target,
            guard.role = role.unwrap_or("none"),
            "Route guard redirect"
        );
    }

    /// Log one finished backend call
    pub fn log_backend_call(method: &str, path: &str, status: Option<u16>, duration_ms: u64) {
        match status {
            Some(code) if code < 400 => debug!(
                backend.method = %method,
                backend.path = %path,
                backend.status = code,
                backend.duration_ms = duration_ms,
                "Backend call"
            ),
            Some(code) => warn!(
                backend.method = %method,
                backend.path = %path,
                backend.status = code,
                backend.duration_ms = duration_ms,
                "Backend call rejected"
            ),
            None => warn!(
                backend.method = %method,
                backend.path = %path,
                backend.duration_ms = duration_ms,
                "Backend call failed before a response"
            ),
        }
    }

    /// Log the end of a chat turn
    pub fn log_chat_turn(session_id: &str, job_id: &str, outcome: &str, polls: u64) {
        info!(
            chat.session_id = %session_id,
            chat.job_id = %job_id,
            chat.outcome = %outcome,
            chat.polls = polls,
            "Chat turn finished"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_format_parsing() {
        assert_eq!(LogFormat::parse(Some("json")), LogFormat::Json);
        assert_eq!(LogFormat::parse(Some("compact")), LogFormat::Compact);
        assert_eq!(LogFormat::parse(Some("fancy")), LogFormat::Pretty);
        assert_eq!(LogFormat::parse(None), LogFormat::Pretty);
    }

    #[test]
    fn test_cli_config_logs_to_stderr() {
        let config = LoggingConfig::for_cli(false);
        assert_eq!(config.writer, LogWriter::Stderr);
        assert_eq!(config.format, LogFormat::Compact);
        assert_eq!(config.service_name, service_names::XAZE_CLI);
    }
}
