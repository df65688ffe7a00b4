// ABOUTME: Per-API-key chat controllers shared across console requests
// ABOUTME: Only verified keys get a controller; idle ones are swept and their polls abandoned
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Async-IO.org

use dashmap::DashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, warn};

use super::poller::{ApiKeyChat, ChatController};
use crate::client::{BackendClient, Credentials};
use crate::config::ChatConfig;
use crate::errors::{ActionError, ActionErrorKind, ActionResult};

/// Rejection for an API key the backend does not accept
#[must_use]
pub fn invalid_api_key() -> ActionError {
    ActionError::new(ActionErrorKind::Unauthorized, "Invalid API Key")
}

/// Chat controller bound to a playground API key
pub type PlaygroundChat = ChatController<ApiKeyChat>;

struct Slot {
    chat: Arc<PlaygroundChat>,
    last_used: Instant,
}

/// Controllers keyed by API key
pub struct ChatRegistry {
    client: BackendClient,
    config: ChatConfig,
    controllers: DashMap<String, Slot>,
}

impl ChatRegistry {
    /// Empty registry creating controllers on `client`
    #[must_use]
    pub fn new(client: BackendClient, config: ChatConfig) -> Self {
        Self {
            client,
            config,
            controllers: DashMap::new(),
        }
    }

    /// Controller for an API key
    ///
    /// A key without a controller is verified against the backend first.
    ///
    /// # Errors
    ///
    /// Returns `Unauthorized` for session credentials and for keys the backend does not accept
    pub async fn controller(&self, credentials: &Credentials) -> ActionResult<Arc<PlaygroundChat>> {
        let Credentials::ApiKey(key) = credentials else {
            return Err(ActionError::unauthorized());
        };
        if let Some(chat) = self.touch(key) {
            return Ok(chat);
        }

        if !self.client.verify_api_key(credentials).await {
            warn!("Refusing chat controller for unverified API key");
            return Err(invalid_api_key());
        }

        let mut slot = self.controllers.entry(key.clone()).or_insert_with(|| {
            debug!("Creating playground chat controller");
            Slot {
                chat: Arc::new(ChatController::new(
                    ApiKeyChat::new(self.client.clone(), credentials.clone(), &self.config),
                    self.config.poll_interval,
                )),
                last_used: Instant::now(),
            }
        });
        slot.last_used = Instant::now();
        Ok(Arc::clone(&slot.chat))
    }

    /// Existing controller for a key, marked as used now
    fn touch(&self, key: &str) -> Option<Arc<PlaygroundChat>> {
        let mut slot = self.controllers.get_mut(key)?;
        slot.last_used = Instant::now();
        Some(Arc::clone(&slot.chat))
    }

    /// Forget the controller of an API key
    pub fn remove(&self, credentials: &Credentials) -> bool {
        match credentials {
            Credentials::ApiKey(key) => self.controllers.remove(key).is_some(),
            Credentials::Session(_) => false,
        }
    }

    /// Drop controllers unused for at least `max_idle`, returning how many went
    pub fn sweep_idle(&self, max_idle: Duration) -> usize {
        let before = self.controllers.len();
        self.controllers
            .retain(|_, slot| slot.last_used.elapsed() < max_idle);
        let evicted = before.saturating_sub(self.controllers.len());
        if evicted > 0 {
            debug!(evicted, "Evicted idle playground chat controllers");
        }
        evicted
    }

    /// Sweep with the configured idle TTL
    pub fn sweep(&self) -> usize {
        self.sweep_idle(self.config.idle_ttl)
    }

    /// Configured idle TTL
    #[must_use]
    pub const fn idle_ttl(&self) -> Duration {
        self.config.idle_ttl
    }

    /// Number of live controllers
    #[must_use]
    pub fn len(&self) -> usize {
        self.controllers.len()
    }

    /// Whether no controller exists
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.controllers.is_empty()
    }
}
