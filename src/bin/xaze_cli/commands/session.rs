// ABOUTME: Session commands for xaze-cli: login, logout and whoami
// ABOUTME: The backend token is kept in the local store between invocations
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Async-IO.org

use anyhow::{anyhow, Result};
use tracing::info;
use xaze_console::{
    client::BackendClient, constants::storage_keys, storage::LocalStore,
};
use xaze_core::models::LoginRequest;

use super::session_credentials;
use crate::helpers::display::display_user;

/// Sign in and store the session token
pub async fn login(
    client: &BackendClient,
    store: &mut LocalStore,
    email: String,
    password: String,
) -> Result<()> {
    let session = client.login(&LoginRequest { email, password }).await?;
    store.set(storage_keys::SESSION_TOKEN, &session.token)?;
    info!(path = %store.path().display(), "Session token stored");

    let role = session.user.role;
    println!("Login successful ({})", role.as_str());
    if role.home().is_none() {
        println!("Warning: this role has no console dashboard");
    }
    Ok(())
}

/// Forget the stored session token
pub fn logout(store: &mut LocalStore) -> Result<()> {
    store.remove(storage_keys::SESSION_TOKEN)?;
    println!("Logged out");
    Ok(())
}

/// Show the signed-in user
pub async fn whoami(client: &BackendClient, store: &LocalStore) -> Result<()> {
    let credentials = session_credentials(store)?;
    let user = client
        .current_user(Some(&credentials))
        .await
        .ok_or_else(|| anyhow!("Session expired. Run `xaze-cli login` again."))?;
    display_user(&user);
    Ok(())
}
