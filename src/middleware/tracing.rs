// ABOUTME: Request tracing middleware for correlation and structured logging
// ABOUTME: Propagates or generates request IDs and opens an http_request span per request
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Async-IO.org

use axum::{extract::Request, middleware::Next, response::Response};
use http::HeaderValue;
use std::time::Instant;
use tracing::{field, info_span, Instrument, Span};
use uuid::Uuid;

use crate::constants::headers;

/// Request context that flows through the request lifecycle
#[derive(Debug, Clone)]
pub struct RequestContext {
    /// Correlation id, echoed in the `x-request-id` response header
    pub request_id: String,
}

impl RequestContext {
    /// Create new request context with generated request ID
    #[must_use]
    pub fn new() -> Self {
        Self {
            request_id: format!("req_{}", Uuid::new_v4().simple()),
        }
    }

    /// Reuse an inbound id when the caller supplied a usable one
    #[must_use]
    pub fn from_header(value: Option<&HeaderValue>) -> Self {
        value
            .and_then(|v| v.to_str().ok())
            .filter(|v| !v.is_empty() && v.len() <= 128)
            .map_or_else(Self::new, |id| Self {
                request_id: id.to_owned(),
            })
    }
}

impl Default for RequestContext {
    fn default() -> Self {
        Self::new()
    }
}

/// Create a tracing span for HTTP requests
pub fn create_request_span(method: &str, path: &str, request_id: &str) -> Span {
    info_span!(
        "http_request",
        method = %method,
        path = %path,
        request_id = %request_id,
        status_code = field::Empty,
        duration_ms = field::Empty,
    )
}

/// Attach a request id and an `http_request` span to every request
pub async fn request_tracing_middleware(mut req: Request, next: Next) -> Response {
    let context = RequestContext::from_header(req.headers().get(headers::REQUEST_ID));
    let span = create_request_span(req.method().as_str(), req.uri().path(), &context.request_id);
    req.extensions_mut().insert(context.clone());

    let started = Instant::now();
    let mut response = next.run(req).instrument(span.clone()).await;

    span.record("status_code", response.status().as_u16());
    span.record("duration_ms", started.elapsed().as_millis() as u64);
    if let Ok(value) = HeaderValue::from_str(&context.request_id) {
        response.headers_mut().insert(headers::REQUEST_ID, value);
    }
    response
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_id_generation_and_reuse() {
        let generated = RequestContext::new();
        assert!(generated.request_id.starts_with("req_"));

        let inbound = HeaderValue::from_static("abc-123");
        assert_eq!(RequestContext::from_header(Some(&inbound)).request_id, "abc-123");

        let empty = HeaderValue::from_static("");
        assert!(RequestContext::from_header(Some(&empty)).request_id.starts_with("req_"));
    }
}
