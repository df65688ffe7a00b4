// ABOUTME: Console HTTP server: shared resources, router assembly and the serve loop
// ABOUTME: Layers request tracing, CORS and the role guard around every route group
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Async-IO.org

//! # Console Server
//!
//! One [`ServerResources`] value is shared by every handler. Layers run
//! outermost first: request id and span, `tower-http` tracing, CORS, then
//! the role guard, which decides redirects before routing.

use anyhow::{Context, Result};
use axum::{middleware, Router};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use crate::client::BackendClient;
use crate::config::ServerConfig;
use crate::constants::chat;
use crate::middleware::{request_tracing_middleware, role_guard_middleware, setup_cors};
use crate::playground::ChatRegistry;
use crate::routes::{AuthRoutes, HealthRoutes, PartnerRoutes, PlaygroundRoutes, SystemRoutes};

/// State shared by all handlers
pub struct ServerResources {
    /// Loaded configuration
    pub config: Arc<ServerConfig>,
    /// Backend action layer
    pub client: BackendClient,
    /// Playground chat controllers
    pub chats: ChatRegistry,
}

impl ServerResources {
    /// Build resources with a fresh backend client
    #[must_use]
    pub fn new(config: ServerConfig) -> Self {
        let client = BackendClient::new(&config.backend);
        Self::with_client(config, client)
    }

    /// Build resources around an existing client
    #[must_use]
    pub fn with_client(config: ServerConfig, client: BackendClient) -> Self {
        let chats = ChatRegistry::new(client.clone(), config.chat.clone());
        Self {
            config: Arc::new(config),
            client,
            chats,
        }
    }
}

/// Full console router
pub fn router(resources: &Arc<ServerResources>) -> Router {
    Router::new()
        .merge(HealthRoutes::routes())
        .merge(AuthRoutes::routes(Arc::clone(resources)))
        .merge(SystemRoutes::routes(Arc::clone(resources)))
        .merge(PartnerRoutes::routes(Arc::clone(resources)))
        .merge(PlaygroundRoutes::routes(Arc::clone(resources)))
        .layer(middleware::from_fn_with_state(
            Arc::clone(resources),
            role_guard_middleware,
        ))
        .layer(setup_cors(&resources.config.cors))
        .layer(TraceLayer::new_for_http())
        .layer(middleware::from_fn(request_tracing_middleware))
}

/// Bind the configured port and serve until Ctrl-C
///
/// # Errors
///
/// Returns an error when the port cannot be bound or the server fails
pub async fn run(config: ServerConfig) -> Result<()> {
    let addr = SocketAddr::from(([0, 0, 0, 0], config.http_port));
    let resources = Arc::new(ServerResources::new(config));
    let app = router(&resources);

    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    info!("Console listening on http://{addr}");

    let sweeper = tokio::spawn(sweep_idle_chats(Arc::clone(&resources)));
    let served = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Console server failed");
    sweeper.abort();
    served?;

    info!(open_chats = resources.chats.len(), "Console stopped");
    Ok(())
}

/// Periodically evict chat controllers whose API key has gone quiet
async fn sweep_idle_chats(resources: Arc<ServerResources>) {
    let period = resources
        .chats
        .idle_ttl()
        .min(Duration::from_secs(chat::SWEEP_INTERVAL_SECS))
        .max(Duration::from_secs(1));
    let mut ticker = tokio::time::interval(period);
    // The first tick completes immediately
    ticker.tick().await;
    loop {
        ticker.tick().await;
        resources.chats.sweep();
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
