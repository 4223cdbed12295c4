//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup)
//!     → audit middleware (outermost; see crate::audit)
//!     → trace + timeout layers
//!     → forward_handler (rewrite URI to upstream, stream body)
//!     → upstream response streamed back through the auditor
//! ```

pub mod server;

pub use server::HttpServer;
