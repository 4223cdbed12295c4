//! Audit rules and record assembly.
//!
//! # Responsibilities
//! - Decide whether an exchange is audited at all
//! - Snapshot request metadata before the downstream call
//! - Build the record (decode, redact, truncate) after it returns
//! - Emit through the sink, isolating every failure from the exchange

use std::net::SocketAddr;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::time::Duration;

use axum::http::request::Parts;
use axum::http::StatusCode;

use crate::audit::body::{body_text, truncate_for_log, BodyCapture};
use crate::audit::client_ip::ClientIpResolver;
use crate::audit::exclusion::ExclusionSet;
use crate::audit::headers::HeaderAllowList;
use crate::audit::path::{decode_path, file_name};
use crate::audit::redaction::Redactor;
use crate::audit::sink::{AuditSink, TracingSink};
use crate::audit::AuditRecord;
use crate::config::AuditConfig;
use crate::observability::metrics;

/// Request metadata captured before the request is handed downstream.
#[derive(Debug, Clone)]
pub struct RequestSnapshot {
    pub method: String,
    /// Path exactly as received (still percent-encoded).
    pub raw_path: String,
    pub query: Option<String>,
    pub headers: std::collections::BTreeMap<String, String>,
    pub client_ip: Option<String>,
}

/// What the downstream produced.
#[derive(Debug, Clone, Copy)]
pub struct ResponseSnapshot<'a> {
    pub status: StatusCode,
    pub content_type: Option<&'a str>,
    pub body: BodyCapture<'a>,
}

/// Entry gate decision for one request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuditGate {
    /// Auditing is switched off.
    Disabled,
    /// The path matched the exclusion set.
    Excluded,
    Audited,
}

/// Result of reporting one exchange.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuditOutcome {
    Emitted,
    Failed,
}

/// Request/response auditor shared by all exchanges.
///
/// Immutable after construction; safe to share behind an `Arc`.
pub struct Auditor {
    enabled: bool,
    exclusions: ExclusionSet,
    redactor: Redactor,
    headers: HeaderAllowList,
    client_ip: ClientIpResolver,
    max_buffered_body_bytes: usize,
    max_logged_body_bytes: usize,
    sink: Arc<dyn AuditSink>,
}

impl Auditor {
    /// Build an auditor writing to the given sink.
    pub fn new(config: &AuditConfig, sink: Arc<dyn AuditSink>) -> Self {
        Self {
            enabled: config.enabled,
            exclusions: ExclusionSet::new(config.exclude_patterns.iter().cloned()),
            redactor: Redactor::new(config.redact_keys.iter().cloned(), config.redaction_marker.clone()),
            headers: HeaderAllowList::new(config.header_allowlist.iter().cloned()),
            client_ip: ClientIpResolver::new(config.client_ip_headers.iter().cloned()),
            max_buffered_body_bytes: config.max_buffered_body_bytes,
            max_logged_body_bytes: config.max_logged_body_bytes,
            sink,
        }
    }

    /// Build an auditor logging through `tracing` in the configured layout.
    pub fn from_config(config: &AuditConfig) -> Self {
        Self::new(config, Arc::new(TracingSink::new(config.layout)))
    }

    /// Decide whether an exchange on `path` is audited.
    pub fn gate(&self, path: &str) -> AuditGate {
        if !self.enabled {
            AuditGate::Disabled
        } else if self.exclusions.is_excluded(path) {
            AuditGate::Excluded
        } else {
            AuditGate::Audited
        }
    }

    /// Most bytes of one body held in memory; 0 means unbounded.
    pub fn buffer_limit(&self) -> usize {
        self.max_buffered_body_bytes
    }

    /// Capture request metadata before the downstream call.
    pub fn snapshot(&self, parts: &Parts, peer: Option<SocketAddr>) -> RequestSnapshot {
        RequestSnapshot {
            method: parts.method.to_string(),
            raw_path: parts.uri.path().to_string(),
            query: parts.uri.query().map(str::to_string),
            headers: self.headers.extract(&parts.headers),
            client_ip: self.client_ip.resolve(&parts.headers, peer),
        }
    }

    /// Build and emit the record for one exchange.
    ///
    /// `response` is `None` when the downstream call panicked. Never panics
    /// and never returns an error: failures are logged at ERROR level with the
    /// method and raw path only, since error text may echo request content.
    pub fn report(
        &self,
        request: &RequestSnapshot,
        request_body: BodyCapture<'_>,
        response: Option<ResponseSnapshot<'_>>,
        elapsed: Duration,
    ) -> AuditOutcome {
        let result = panic::catch_unwind(AssertUnwindSafe(|| {
            let record = self.build_record(request, request_body, response, elapsed);
            self.sink.emit(&record)
        }));

        let outcome = match result {
            Ok(Ok(())) => AuditOutcome::Emitted,
            Ok(Err(_)) => {
                tracing::error!(
                    method = %request.method,
                    path = %request.raw_path,
                    "HTTP audit logging failed"
                );
                AuditOutcome::Failed
            }
            Err(_) => {
                tracing::error!(
                    method = %request.method,
                    path = %request.raw_path,
                    "HTTP audit logging panicked"
                );
                AuditOutcome::Failed
            }
        };

        metrics::record_audit(match outcome {
            AuditOutcome::Emitted => "emitted",
            AuditOutcome::Failed => "failed",
        });
        outcome
    }

    /// Assemble the record from the captured exchange.
    pub fn build_record(
        &self,
        request: &RequestSnapshot,
        request_body: BodyCapture<'_>,
        response: Option<ResponseSnapshot<'_>>,
        elapsed: Duration,
    ) -> AuditRecord {
        let path = decode_path(&request.raw_path);

        let response_body = response.and_then(|r| self.response_text(r, &path));
        let status = response
            .map(|r| r.status)
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
            .as_u16();

        AuditRecord {
            method: request.method.clone(),
            headers: request.headers.clone(),
            client_ip: request.client_ip.clone(),
            query: request.query.clone(),
            request_body: self.loggable(request_body),
            response_body,
            status,
            elapsed_secs: elapsed.as_secs_f64(),
            path,
        }
    }

    fn response_text(&self, response: ResponseSnapshot<'_>, decoded_path: &str) -> Option<String> {
        if matches!(response.body, BodyCapture::Bytes(bytes) if bytes.is_empty()) {
            return None;
        }
        let is_image = response
            .content_type
            .map(|ct| ct.starts_with("image/"))
            .unwrap_or(false);
        if is_image {
            return file_name(decoded_path).map(str::to_string);
        }
        self.loggable(response.body)
    }

    fn loggable(&self, body: BodyCapture<'_>) -> Option<String> {
        match body {
            BodyCapture::Bytes(bytes) => body_text(bytes)
                .map(|text| self.redactor.redact(&text))
                .map(|text| truncate_for_log(text, self.max_logged_body_bytes)),
            BodyCapture::Oversized => Some(format!(
                "(body over {} bytes, not captured)",
                self.max_buffered_body_bytes
            )),
        }
    }
}
