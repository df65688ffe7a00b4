// ABOUTME: Wallet ledger entry DTO and list query
// ABOUTME: Transactions are read-only and paged client-side after a bulk fetch
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Async-IO.org

use serde::{Deserialize, Serialize};

use crate::constants::limits::TRANSACTION_FETCH_LIMIT;

/// One wallet ledger entry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transaction {
    /// Entry id
    pub id: String,
    /// Wallet the entry belongs to
    pub wallet_id: String,
    /// `partner` or `tenant`
    #[serde(default)]
    pub owner_type: String,
    /// Entry kind, e.g. `topup` or `usage`
    #[serde(rename = "type", default)]
    pub kind: String,
    /// Signed amount, decimal string
    pub amount: String,
    /// Balance after the entry, decimal string
    #[serde(default)]
    pub balance_after: String,
    /// External reference
    #[serde(default)]
    pub reference_id: String,
    /// Kind of the external reference
    #[serde(default)]
    pub reference_type: String,
    /// Creation timestamp
    #[serde(default)]
    pub created_at: String,
}

/// Query for a transaction listing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionQuery {
    /// Page size requested from the backend
    pub limit: usize,
    /// Rows skipped
    pub offset: usize,
    /// Restrict to one wallet
    pub wallet_id: Option<String>,
}

impl Default for TransactionQuery {
    fn default() -> Self {
        Self {
            limit: TRANSACTION_FETCH_LIMIT,
            offset: 0,
            wallet_id: None,
        }
    }
}

impl TransactionQuery {
    /// Bulk query filtered to one wallet
    #[must_use]
    pub fn for_wallet(wallet_id: impl Into<String>) -> Self {
        Self {
            wallet_id: Some(wallet_id.into()),
            ..Self::default()
        }
    }
}
