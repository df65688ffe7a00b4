// ABOUTME: Console server binary serving the Xaze.ai admin dashboard
// ABOUTME: Loads environment configuration, initializes logging and runs the axum server
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Async-IO.org

//! # Xaze Console Binary
//!
//! Starts the role-scoped admin gateway in front of the Xaze backend.

use anyhow::Result;
use clap::Parser;
use tracing::{error, info};
use xaze_console::{config::ServerConfig, logging::LoggingConfig, server};

#[derive(Parser)]
#[command(name = "xaze-console")]
#[command(about = "Xaze.ai console - admin dashboard gateway for the Xaze backend")]
pub struct Args {
    /// Override HTTP port
    #[arg(long)]
    http_port: Option<u16>,

    /// Override backend base URL
    #[arg(long)]
    api_base_url: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    LoggingConfig::from_env().init()?;

    let mut config = ServerConfig::from_env()?;
    if let Some(http_port) = args.http_port {
        config.http_port = http_port;
    }
    if let Some(base_url) = args.api_base_url.as_deref() {
        config.backend = xaze_console::config::BackendConfig::new(base_url)?;
    }

    info!("Starting Xaze Console");
    info!("{}", config.summary());
    display_available_endpoints(config.http_port);

    if let Err(e) = server::run(config).await {
        error!("Server error: {}", e);
        return Err(e);
    }
    Ok(())
}

#[allow(clippy::cognitive_complexity)]
fn display_available_endpoints(port: u16) {
    let host = std::env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_owned());

    info!("=== Available Pages ===");
    info!("   Login:           http://{host}:{port}/login");
    info!("   System Admin:    http://{host}:{port}/system");
    info!("   Partner Admin:   http://{host}:{port}/partner");
    info!("   Playground:      http://{host}:{port}/playground");
    info!("   Health:          http://{host}:{port}/health");
    info!("=== End of Page List ===");
}
