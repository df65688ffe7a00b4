// ABOUTME: Console constants re-exported from the core crate plus server-only values
// ABOUTME: Backend paths, storage keys and defaults live in xaze-core
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Async-IO.org

//! # Constants Module
//!
//! Domain constants are defined once in `xaze_core::constants` and re-exported
//! here so server code can keep using `crate::constants::...`.

pub use xaze_core::constants::{
    backend, chat, headers, limits, roles, routes, scopes, service_names, session, storage_keys,
};

/// Application branding
pub mod app {
    /// Product name shown in the sidebar and page titles
    pub const NAME: &str = "Xaze.ai";
    /// Version string shown in the footer
    pub const VERSION: &str = env!("CARGO_PKG_VERSION");
    /// HTML meta description
    pub const DESCRIPTION: &str = "Xaze.ai Dashboard";
}

/// Client-local storage file
pub mod storage {
    /// Directory under the user data dir
    pub const APP_DIR: &str = "xaze";
    /// File name of the JSON key/value store
    pub const FILE_NAME: &str = "local_store.json";
}
