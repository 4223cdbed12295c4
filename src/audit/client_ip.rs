//! Client address resolution behind proxies.
//!
//! # Design Decisions
//! - Forwarding headers are consulted in a fixed order; first usable wins
//! - `unknown` (any case) and empty values are skipped
//! - A comma separated chain yields its first (client-most) element
//! - Falls back to the transport peer address when no header qualifies
//! - Non-UTF-8 header bytes are decoded lossily rather than skipped

use std::net::SocketAddr;

use axum::http::HeaderMap;

/// Ordered list of forwarding headers used to find the originating client.
#[derive(Debug, Clone)]
pub struct ClientIpResolver {
    headers: Vec<String>,
}

impl ClientIpResolver {
    pub fn new(headers: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            headers: headers.into_iter().map(Into::into).collect(),
        }
    }

    /// Resolve the client IP from forwarding headers or the peer address.
    pub fn resolve(&self, headers: &HeaderMap, peer: Option<SocketAddr>) -> Option<String> {
        self.headers
            .iter()
            .filter_map(|name| headers.get(name.as_str()))
            .map(|value| String::from_utf8_lossy(value.as_bytes()))
            .find(|value| is_usable(value))
            .map(|value| value.split(',').next().unwrap_or(&value).trim().to_string())
            .or_else(|| peer.map(|addr| addr.ip().to_string()))
    }
}

fn is_usable(value: &str) -> bool {
    !value.is_empty() && !value.eq_ignore_ascii_case("unknown")
}
