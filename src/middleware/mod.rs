// ABOUTME: HTTP middleware for request tracing, role-based routing and CORS
// ABOUTME: Provides request ID propagation, the role guard and the CORS layer
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Async-IO.org

/// CORS configuration
pub mod cors;
/// Role guard redirects and session token extraction
pub mod role_guard;
/// Request ids and per-request spans
pub mod tracing;

pub use cors::setup_cors;
pub use role_guard::{role_guard_middleware, SessionToken, API_PREFIX};
pub use tracing::{create_request_span, request_tracing_middleware, RequestContext};
