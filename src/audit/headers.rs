//! Allow-listed request header capture.

use std::collections::BTreeMap;

use axum::http::HeaderMap;

/// Copies only allow-listed request headers into the audit record.
#[derive(Debug, Clone)]
pub struct HeaderAllowList {
    names: Vec<String>,
}

impl HeaderAllowList {
    pub fn new(names: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            names: names.into_iter().map(|n| n.into().to_ascii_lowercase()).collect(),
        }
    }

    /// Extract allow-listed headers, keyed by lowercase name.
    ///
    /// Repeated headers keep their first value.
    pub fn extract(&self, headers: &HeaderMap) -> BTreeMap<String, String> {
        let mut captured = BTreeMap::new();
        for (name, value) in headers {
            if self.names.iter().any(|n| n == name.as_str()) && !captured.contains_key(name.as_str()) {
                captured.insert(
                    name.as_str().to_string(),
                    String::from_utf8_lossy(value.as_bytes()).into_owned(),
                );
            }
        }
        captured
    }
}
