//! Audit record sinks.

use thiserror::Error;

use crate::audit::AuditRecord;
use crate::config::LogLayout;

/// Tracing target used for audit records.
pub const AUDIT_TARGET: &str = "http_audit";

/// Failure while building or writing an audit record.
#[derive(Debug, Error)]
pub enum AuditError {
    #[error("failed to encode audit record: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("failed to format audit record: {0}")]
    Format(#[from] std::fmt::Error),

    #[error("audit sink rejected record: {0}")]
    Sink(String),
}

/// Destination for audit records.
pub trait AuditSink: Send + Sync {
    /// Write one record. Called once per audited exchange.
    fn emit(&self, record: &AuditRecord) -> Result<(), AuditError>;
}

/// Writes audit records through `tracing` at INFO level.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink {
    layout: LogLayout,
}

impl TracingSink {
    pub fn new(layout: LogLayout) -> Self {
        Self { layout }
    }
}

impl AuditSink for TracingSink {
    fn emit(&self, record: &AuditRecord) -> Result<(), AuditError> {
        match self.layout {
            LogLayout::Pretty => {
                let message = record.render_pretty()?;
                tracing::info!(target: AUDIT_TARGET, "{}", message);
            }
            LogLayout::Structured => {
                let headers = serde_json::to_string(&record.headers)?;
                tracing::info!(
                    target: AUDIT_TARGET,
                    method = %record.method,
                    path = %record.path,
                    headers = %headers,
                    client_ip = record.client_ip.as_deref().unwrap_or("null"),
                    query = record.query.as_deref().unwrap_or("null"),
                    request_body = record.request_body.as_deref().unwrap_or("null"),
                    response_body = record.response_body.as_deref().unwrap_or("null"),
                    status = record.status,
                    elapsed_secs = record.elapsed_secs,
                    "HTTP exchange audited"
                );
            }
        }
        Ok(())
    }
}
