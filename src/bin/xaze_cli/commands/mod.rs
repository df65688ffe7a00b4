// ABOUTME: Re-exports command modules for xaze-cli
// ABOUTME: Session, administration and playground chat commands
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Async-IO.org

pub mod admin;
pub mod chat;
pub mod session;

use anyhow::{anyhow, Result};
use xaze_console::{client::Credentials, constants::storage_keys, storage::LocalStore};

/// Session credentials from the stored token
pub fn session_credentials(store: &LocalStore) -> Result<Credentials> {
    Credentials::session(store.get(storage_keys::SESSION_TOKEN))
        .ok_or_else(|| anyhow!("Not signed in. Run `xaze-cli login` first."))
}

/// API-key credentials from the stored playground key
pub fn playground_credentials(store: &LocalStore) -> Result<Credentials> {
    Credentials::api_key(store.get(storage_keys::PLAYGROUND_API_KEY))
        .ok_or_else(|| anyhow!("No API key stored. Run `xaze-cli playground key <KEY>` first."))
}
