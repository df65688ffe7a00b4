// ABOUTME: Core types and constants for the Xaze billing and configuration console
// ABOUTME: Foundation crate with error handling, DTO models, pagination and rate arithmetic
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Async-IO.org

#![deny(unsafe_code)]

//! # Xaze Core
//!
//! Foundation crate providing shared types for the Xaze console. The console
//! never owns any of these entities: every model here is a transient copy of
//! a backend DTO, kept only long enough to render it or to build a request.
//!
//! ## Modules
//!
//! - **errors**: `AppError` for infrastructure failures, `ActionError` for the action boundary
//! - **constants**: backend paths, header names, storage keys and defaults
//! - **models**: partner, tenant, wallet, catalog, persona, knowledge and chat DTOs
//! - **pagination**: offset pagination used for bulk-fetched lists
//! - **money**: currency formatting and tenant rate arithmetic

/// Unified error handling with action-boundary errors and HTTP rendering
pub mod errors;

/// Application constants organized by domain
pub mod constants;

/// Backend DTO models mirrored by the console
pub mod models;

/// Offset pagination for client-side paging of bulk fetches
pub mod pagination;

/// Currency formatting and markup/final-rate arithmetic
pub mod money;
