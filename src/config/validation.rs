//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate addresses and header names up front
//! - Reject audit rules that would silently match everything or nothing
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: GatewayConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::net::SocketAddr;

use axum::http::{uri::Authority, HeaderName};
use thiserror::Error;

use crate::config::schema::GatewayConfig;

/// A single semantic problem found in a configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("listener.bind_address `{0}` is not a socket address")]
    InvalidBindAddress(String),

    #[error("upstream.address `{0}` is not a valid host:port authority")]
    InvalidUpstream(String),

    #[error("observability.metrics_address `{0}` is not a socket address")]
    InvalidMetricsAddress(String),

    #[error("timeouts.request_secs must be greater than zero")]
    ZeroRequestTimeout,

    #[error("{field} contains an empty entry")]
    EmptyEntry { field: &'static str },

    #[error("{field} entry `{value}` is not a valid header name")]
    InvalidHeaderName { field: &'static str, value: String },

    #[error("audit.redaction_marker must not be empty")]
    EmptyRedactionMarker,
}

/// Check a parsed configuration, collecting every problem found.
pub fn validate_config(config: &GatewayConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::InvalidBindAddress(config.listener.bind_address.clone()));
    }

    if config.upstream.address.parse::<Authority>().is_err() {
        errors.push(ValidationError::InvalidUpstream(config.upstream.address.clone()));
    }

    if config.observability.metrics_enabled
        && config.observability.metrics_address.parse::<SocketAddr>().is_err()
    {
        errors.push(ValidationError::InvalidMetricsAddress(
            config.observability.metrics_address.clone(),
        ));
    }

    if config.timeouts.request_secs == 0 {
        errors.push(ValidationError::ZeroRequestTimeout);
    }

    let audit = &config.audit;
    check_non_empty("audit.exclude_patterns", &audit.exclude_patterns, &mut errors);
    check_non_empty("audit.redact_keys", &audit.redact_keys, &mut errors);
    check_header_names("audit.header_allowlist", &audit.header_allowlist, &mut errors);
    check_header_names("audit.client_ip_headers", &audit.client_ip_headers, &mut errors);

    if audit.redaction_marker.is_empty() {
        errors.push(ValidationError::EmptyRedactionMarker);
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn check_non_empty(field: &'static str, values: &[String], errors: &mut Vec<ValidationError>) {
    if values.iter().any(|v| v.is_empty()) {
        errors.push(ValidationError::EmptyEntry { field });
    }
}

fn check_header_names(field: &'static str, values: &[String], errors: &mut Vec<ValidationError>) {
    for value in values {
        if HeaderName::from_bytes(value.as_bytes()).is_err() {
            errors.push(ValidationError::InvalidHeaderName {
                field,
                value: value.clone(),
            });
        }
    }
}
