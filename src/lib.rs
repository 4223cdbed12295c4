//! HTTP request/response audit gateway.
//!
//! The [`audit`] module is usable on its own as axum middleware:
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use axum::{middleware, routing::get, Router};
//! use audit_gateway::audit::{audit_middleware, Auditor};
//! use audit_gateway::config::AuditConfig;
//!
//! let auditor = Arc::new(Auditor::from_config(&AuditConfig::default()));
//! let app: Router = Router::new()
//!     .route("/todos", get(|| async { "[]" }))
//!     .layer(middleware::from_fn_with_state(auditor, audit_middleware));
//! ```

pub mod audit;
pub mod config;
pub mod http;
pub mod lifecycle;
pub mod observability;

pub use audit::Auditor;
pub use config::GatewayConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
