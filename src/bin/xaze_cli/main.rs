// ABOUTME: Xaze CLI - command-line client for the Xaze backend sharing the console's action layer
// ABOUTME: Handles login, partner and tenant administration, ledgers and the API-key chat playground
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Async-IO.org
//!
//! Usage:
//! ```bash
//! # Sign in; the session token is kept in the local store
//! xaze-cli login --email admin@example.com --password secret
//!
//! # List partners (system admin) or tenants (partner admin)
//! xaze-cli partners list
//! xaze-cli tenants list
//!
//! # Top up a wallet
//! xaze-cli partners topup partner_123 250
//!
//! # Ledger for the signed-in role, optionally for one wallet
//! xaze-cli transactions --wallet wallet_9
//!
//! # Store a playground API key, then chat
//! xaze-cli playground key sk_live_abc
//! xaze-cli chat "What are your opening hours?"
//! ```

mod commands;
mod helpers;

use anyhow::Result;
use clap::{Parser, Subcommand};
use xaze_console::{
    client::BackendClient,
    config::{BackendConfig, ServerConfig},
    logging::LoggingConfig,
    storage::LocalStore,
};

#[derive(Parser)]
#[command(
    name = "xaze-cli",
    about = "Xaze.ai command-line client",
    long_about = "Command-line client for Xaze partner administration and the API-key chat playground."
)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Backend base URL override (defaults to API_BASE_URL)
    #[arg(long, global = true)]
    api_base_url: Option<String>,

    /// Local store file override
    #[arg(long, global = true)]
    store: Option<std::path::PathBuf>,

    /// Enable debug logging
    #[arg(long, short = 'v', global = true)]
    verbose: bool,
}

#[non_exhaustive]
#[derive(Subcommand)]
enum Command {
    /// Sign in with e-mail and password
    Login {
        /// Account e-mail
        #[arg(long)]
        email: String,

        /// Account password
        #[arg(long)]
        password: String,
    },

    /// Forget the stored session token
    Logout,

    /// Show the signed-in user
    Whoami,

    /// Partner administration (system admin)
    Partners {
        #[command(subcommand)]
        action: PartnerCommand,
    },

    /// Tenant administration (partner admin)
    Tenants {
        #[command(subcommand)]
        action: TenantCommand,
    },

    /// Wallet ledger for the signed-in role
    Transactions {
        /// Restrict to one wallet
        #[arg(long)]
        wallet: Option<String>,
    },

    /// Model catalog for the signed-in role
    Models,

    /// Playground API key management
    Playground {
        #[command(subcommand)]
        action: PlaygroundCommand,
    },

    /// Send one chat message and wait for the reply
    Chat {
        /// Message text
        message: String,

        /// Knowledge base for a new session
        #[arg(long)]
        knowledge_base: Option<String>,

        /// Start a new session instead of continuing the stored one
        #[arg(long)]
        new_session: bool,
    },
}

#[non_exhaustive]
#[derive(Subcommand)]
enum PartnerCommand {
    /// List partners
    List,

    /// Credit a partner wallet
    Topup {
        /// Partner ID
        partner_id: String,

        /// Amount to add
        amount: String,
    },
}

#[non_exhaustive]
#[derive(Subcommand)]
enum TenantCommand {
    /// List tenants
    List,

    /// Credit a tenant wallet
    Topup {
        /// Tenant ID
        tenant_id: String,

        /// Amount to add
        amount: String,
    },
}

#[non_exhaustive]
#[derive(Subcommand)]
enum PlaygroundCommand {
    /// Verify and store an API key
    Key {
        /// Tenant API key
        api_key: String,
    },

    /// Forget the stored API key and chat selections
    Forget,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    LoggingConfig::for_cli(cli.verbose).init()?;

    let backend = match cli.api_base_url.as_deref() {
        Some(base_url) => BackendConfig::new(base_url)?,
        None => ServerConfig::from_env()?.backend,
    };
    let client = BackendClient::new(&backend);
    let mut store = match cli.store {
        Some(path) => LocalStore::open(path)?,
        None => LocalStore::open_default()?,
    };

    match cli.command {
        Command::Login { email, password } => {
            commands::session::login(&client, &mut store, email, password).await?;
        }
        Command::Logout => commands::session::logout(&mut store)?,
        Command::Whoami => commands::session::whoami(&client, &store).await?,
        Command::Partners { action } => match action {
            PartnerCommand::List => commands::admin::list_partners(&client, &store).await?,
            PartnerCommand::Topup { partner_id, amount } => {
                commands::admin::topup_partner(&client, &store, partner_id, amount).await?;
            }
        },
        Command::Tenants { action } => match action {
            TenantCommand::List => commands::admin::list_tenants(&client, &store).await?,
            TenantCommand::Topup { tenant_id, amount } => {
                commands::admin::topup_tenant(&client, &store, tenant_id, amount).await?;
            }
        },
        Command::Transactions { wallet } => {
            commands::admin::transactions(&client, &store, wallet).await?;
        }
        Command::Models => commands::admin::models(&client, &store).await?,
        Command::Playground { action } => match action {
            PlaygroundCommand::Key { api_key } => {
                commands::chat::store_key(&client, &mut store, &api_key).await?;
            }
            PlaygroundCommand::Forget => commands::chat::forget(&mut store)?,
        },
        Command::Chat {
            message,
            knowledge_base,
            new_session,
        } => {
            let chat_config = ServerConfig::from_env()?.chat;
            let options = commands::chat::ChatOptions {
                knowledge_base,
                new_session,
            };
            commands::chat::send(client, &mut store, &chat_config, &message, options).await?;
        }
    }

    Ok(())
}
