//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the gateway.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

/// Root configuration for the audit gateway.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct GatewayConfig {
    /// Listener configuration (bind address).
    pub listener: ListenerConfig,

    /// Upstream application every request is forwarded to.
    pub upstream: UpstreamConfig,

    /// Timeout configuration.
    pub timeouts: TimeoutConfig,

    /// Request/response audit rules.
    pub audit: AuditConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:8080").
    pub bind_address: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
        }
    }
}

/// Upstream configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct UpstreamConfig {
    /// Upstream address (e.g., "127.0.0.1:3000").
    pub address: String,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            address: "127.0.0.1:3000".to_string(),
        }
    }
}

/// Timeout configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Request timeout (total time for request/response) in seconds.
    pub request_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self { request_secs: 30 }
    }
}

/// How an audit record is written to the log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLayout {
    /// Multi-line human readable block with pretty-printed JSON sections.
    #[default]
    Pretty,
    /// One event with every field attached as a structured tracing field.
    Structured,
}

/// Request/response audit configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct AuditConfig {
    /// Enable auditing. When disabled the middleware is a pass-through.
    pub enabled: bool,

    /// Path fragments that skip auditing entirely (substring match).
    pub exclude_patterns: Vec<String>,

    /// JSON key fragments whose top-level values are redacted (case-sensitive).
    pub redact_keys: Vec<String>,

    /// Replacement written in place of a redacted value.
    pub redaction_marker: String,

    /// Request headers copied into the record (case-insensitive).
    pub header_allowlist: Vec<String>,

    /// Forwarding headers consulted, in order, to resolve the client IP.
    pub client_ip_headers: Vec<String>,

    /// Bodies larger than this are streamed through without being captured
    /// and logged as a placeholder. 0 disables the cap.
    pub max_buffered_body_bytes: usize,

    /// Cap on logged body text in bytes; 0 disables truncation.
    pub max_logged_body_bytes: usize,

    /// Output layout of the record.
    pub layout: LogLayout,
}

impl Default for AuditConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            exclude_patterns: strings(&["/v3/api-docs", "/swagger", "/monitor/health", "/favicon.ico"]),
            redact_keys: strings(&["password", "token"]),
            redaction_marker: "*****".to_string(),
            header_allowlist: strings(&["referer", "accept", "user-agent"]),
            client_ip_headers: strings(&[
                "X-Forwarded-For",
                "Proxy-Client-IP",
                "WL-Proxy-Client-IP",
                "HTTP_CLIENT_IP",
                "HTTP_X_FORWARDED_FOR",
                "X-Real-IP",
            ]),
            max_buffered_body_bytes: 1024 * 1024,
            max_logged_body_bytes: 64 * 1024,
            layout: LogLayout::Pretty,
        }
    }
}

fn strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|s| s.to_string()).collect()
}

/// Log output format for the process-wide subscriber.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Log output format.
    pub log_format: LogFormat,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_format: LogFormat::Pretty,
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_audit_rules() {
        let config = GatewayConfig::default();
        assert!(config.audit.enabled);
        assert_eq!(config.audit.redact_keys, vec!["password", "token"]);
        assert_eq!(config.audit.redaction_marker, "*****");
        assert_eq!(config.audit.client_ip_headers.first().map(String::as_str), Some("X-Forwarded-For"));
        assert_eq!(config.audit.client_ip_headers.last().map(String::as_str), Some("X-Real-IP"));
        assert_eq!(config.audit.layout, LogLayout::Pretty);
        assert_eq!(config.audit.max_buffered_body_bytes, 1024 * 1024);
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config: GatewayConfig = toml::from_str(
            r#"
            [upstream]
            address = "10.1.2.3:8000"

            [audit]
            layout = "structured"
            redact_keys = ["secret"]
            "#,
        )
        .unwrap();

        assert_eq!(config.upstream.address, "10.1.2.3:8000");
        assert_eq!(config.audit.layout, LogLayout::Structured);
        assert_eq!(config.audit.redact_keys, vec!["secret"]);
        assert_eq!(config.audit.redaction_marker, "*****");
        assert_eq!(config.listener.bind_address, "0.0.0.0:8080");
        assert_eq!(config.timeouts.request_secs, 30);
    }
}
