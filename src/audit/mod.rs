//! HTTP request/response audit subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming request:
//!     → exclusion.rs (entry gate; excluded paths pass straight through)
//!     → body.rs (buffer request body up to a limit, replay to downstream)
//!     → headers.rs / client_ip.rs (snapshot metadata)
//!     → [downstream handler, timed]
//!     → body.rs (buffer response body)
//!     → path.rs / redaction.rs (decode path, redact bodies)
//!     → record.rs (AuditRecord)
//!     → sink.rs (one tracing event per exchange)
//!     → response released to the caller
//! ```
//!
//! # Design Decisions
//! - One record per non-excluded exchange, never more
//! - The caller always receives the downstream's bytes, even if logging fails
//! - Rules are fixed at construction; no state is shared between exchanges
//! - Redaction is shallow: only top-level JSON keys are inspected

pub mod auditor;
pub mod body;
pub mod client_ip;
pub mod exclusion;
pub mod headers;
pub mod middleware;
pub mod path;
pub mod record;
pub mod redaction;
pub mod sink;

pub use auditor::{AuditGate, AuditOutcome, Auditor};
pub use middleware::audit_middleware;
pub use record::AuditRecord;
pub use redaction::Redactor;
pub use sink::{AuditError, AuditSink, TracingSink, AUDIT_TARGET};
