// ABOUTME: Playground commands for xaze-cli: API key storage and one-shot chat turns
// ABOUTME: Runs the same controller and poller as the console and waits for the reply
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Async-IO.org

use anyhow::{anyhow, bail, Result};
use tracing::{info, warn};
use xaze_console::{
    client::{BackendClient, Credentials},
    config::ChatConfig,
    constants::storage_keys,
    playground::{ApiKeyChat, ChatController},
    storage::LocalStore,
};

use super::playground_credentials;
use crate::helpers::display::display_reply;

/// Options for a single chat turn
pub struct ChatOptions {
    /// Knowledge base for a new session
    pub knowledge_base: Option<String>,
    /// Start a new session instead of continuing the stored one
    pub new_session: bool,
}

/// Verify an API key and store it
pub async fn store_key(client: &BackendClient, store: &mut LocalStore, api_key: &str) -> Result<()> {
    let credentials =
        Credentials::api_key(Some(api_key)).ok_or_else(|| anyhow!("API Key is required"))?;
    if !client.verify_api_key(&credentials).await {
        bail!("Invalid API Key");
    }
    store.set(storage_keys::PLAYGROUND_API_KEY, api_key.trim())?;
    println!("Logged in successfully");
    Ok(())
}

/// Forget the API key and the chat selections made with it
pub fn forget(store: &mut LocalStore) -> Result<()> {
    store.remove(storage_keys::PLAYGROUND_API_KEY)?;
    store.remove(storage_keys::CHAT_SESSION_ID)?;
    store.remove(storage_keys::CHAT_KB_ID)?;
    println!("Logged out");
    Ok(())
}

/// Send one message and print the reply once the job finishes
pub async fn send(
    client: BackendClient,
    store: &mut LocalStore,
    config: &ChatConfig,
    message: &str,
    options: ChatOptions,
) -> Result<()> {
    let credentials = playground_credentials(store)?;
    let knowledge_base = match options.knowledge_base {
        Some(kb) => Some(kb),
        None => store.get(storage_keys::CHAT_KB_ID).map(str::to_owned),
    };
    let knowledge_base = match knowledge_base {
        Some(kb) => kb,
        None => first_knowledge_base(&client, &credentials).await?,
    };

    let backend = ApiKeyChat::new(client, credentials, config);
    let chat = ChatController::new(backend, config.poll_interval);

    if options.new_session {
        chat.select_knowledge_base(&knowledge_base).await;
        let session_id = chat.start_new_session().await?;
        info!(session_id = %session_id, "New session started");
    } else {
        let session_id = store.get(storage_keys::CHAT_SESSION_ID).map(str::to_owned);
        chat.restore(session_id, Some(knowledge_base)).await;
    }

    if chat.send(message).await?.is_none() {
        bail!("Message is required");
    }
    chat.wait_idle().await;

    let snapshot = chat.snapshot().await;
    store.set_or_remove(storage_keys::CHAT_SESSION_ID, snapshot.session_id.as_deref())?;
    store.set_or_remove(storage_keys::CHAT_KB_ID, snapshot.knowledge_base_id.as_deref())?;
    for notice in &snapshot.notices {
        warn!("{}", notice.message);
    }
    display_reply(&snapshot.messages);
    Ok(())
}

async fn first_knowledge_base(client: &BackendClient, credentials: &Credentials) -> Result<String> {
    client
        .knowledge_bases(Some(credentials))
        .await?
        .into_iter()
        .next()
        .map(|kb| kb.id)
        .ok_or_else(|| anyhow!("No knowledge bases found. Create one in the playground first."))
}
