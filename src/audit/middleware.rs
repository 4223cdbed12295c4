//! Axum middleware wrapping every exchange with the auditor.
//!
//! # Per-request phases
//! ```text
//! Intercepting: entry gate, buffer request body, snapshot metadata
//!     → Measuring: downstream call + response body buffering, timed
//!     → Reporting: build & emit record (failures isolated)
//!     → response released to the caller (always)
//! ```
//!
//! # Design Decisions
//! - Excluded paths short-circuit before anything is buffered
//! - Bodies over the buffer limit stream through; timing then stops once the
//!   limit is reached
//! - A downstream panic is recorded as a 500 and then resumed unchanged

use std::net::SocketAddr;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::time::Instant;

use axum::{
    body::Body,
    extract::{ConnectInfo, State},
    http::{header, Request},
    middleware::Next,
    response::Response,
};
use futures_util::FutureExt;

use crate::audit::auditor::{AuditGate, Auditor, ResponseSnapshot};
use crate::audit::body::{BodyCapture, BufferedBody};
use crate::observability::metrics;

#[derive(Debug, Clone, Copy)]
enum AuditPhase {
    Intercepting,
    Measuring,
    Reporting,
}

/// Audit middleware. Install as the outermost layer with
/// `axum::middleware::from_fn_with_state(auditor, audit_middleware)`.
pub async fn audit_middleware(
    State(auditor): State<Arc<Auditor>>,
    request: Request<Body>,
    next: Next,
) -> Response {
    match auditor.gate(request.uri().path()) {
        AuditGate::Audited => {}
        AuditGate::Excluded => {
            metrics::record_audit("excluded");
            return next.run(request).await;
        }
        AuditGate::Disabled => return next.run(request).await,
    }

    tracing::trace!(phase = ?AuditPhase::Intercepting, path = %request.uri().path());
    let peer = request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| *addr);
    let limit = auditor.buffer_limit();

    let (parts, body) = request.into_parts();
    let snapshot = auditor.snapshot(&parts, peer);
    let (request_bytes, replay) = BufferedBody::capture(body, limit).await.into_parts();
    let request = Request::from_parts(parts, replay);

    tracing::trace!(phase = ?AuditPhase::Measuring);
    let start = Instant::now();
    let downstream = AssertUnwindSafe(async move {
        let (parts, body) = next.run(request).await.into_parts();
        (parts, BufferedBody::capture(body, limit).await.into_parts())
    })
    .catch_unwind()
    .await;
    let elapsed = start.elapsed();

    tracing::trace!(phase = ?AuditPhase::Reporting, elapsed_secs = elapsed.as_secs_f64());
    let request_body = BodyCapture::from(request_bytes.as_deref());
    match downstream {
        Ok((parts, (response_bytes, replay))) => {
            let content_type = parts
                .headers
                .get(header::CONTENT_TYPE)
                .and_then(|v| v.to_str().ok());
            let response = ResponseSnapshot {
                status: parts.status,
                content_type,
                body: BodyCapture::from(response_bytes.as_deref()),
            };
            auditor.report(&snapshot, request_body, Some(response), elapsed);
            Response::from_parts(parts, replay)
        }
        Err(panic_payload) => {
            auditor.report(&snapshot, request_body, None, elapsed);
            panic::resume_unwind(panic_payload)
        }
    }
}
