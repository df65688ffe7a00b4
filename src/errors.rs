// ABOUTME: Error types for the console, re-exported from the core crate
// ABOUTME: AppError for infrastructure failures and ActionError at the backend action boundary
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Async-IO.org

//! # Unified Error Handling
//!
//! Infrastructure failures use `AppError`, rendered as
//! `{"error": {"code", "message"}}`. Every backend action resolves failures
//! to `ActionError`, rendered as `{"error": "<message>"}`.

pub use xaze_core::errors::{
    ActionError, ActionErrorKind, ActionResult, AppError, AppResult, ErrorCode, ErrorResponse,
    GENERIC_FAILURE,
};
