//! Path exclusion for the audit entry gate.
//!
//! # Design Decisions
//! - Substring match: any path containing a fragment is excluded
//! - Matched against the raw (still percent-encoded) path
//! - No regex to guarantee O(n) matching

/// Set of path fragments that bypass auditing.
#[derive(Debug, Clone)]
pub struct ExclusionSet {
    fragments: Vec<String>,
}

impl ExclusionSet {
    pub fn new(fragments: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            fragments: fragments.into_iter().map(Into::into).collect(),
        }
    }

    /// Returns true if the path must not be audited.
    pub fn is_excluded(&self, path: &str) -> bool {
        self.fragments.iter().any(|f| path.contains(f.as_str()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AuditConfig;

    fn default_set() -> ExclusionSet {
        ExclusionSet::new(AuditConfig::default().exclude_patterns)
    }

    #[test]
    fn test_excludes_docs_health_and_favicon() {
        let set = default_set();
        assert!(set.is_excluded("/v3/api-docs"));
        assert!(set.is_excluded("/v3/api-docs/swagger-config"));
        assert!(set.is_excluded("/swagger-ui/index.html"));
        assert!(set.is_excluded("/monitor/health"));
        assert!(set.is_excluded("/monitor/health/liveness"));
        assert!(set.is_excluded("/favicon.ico"));
    }

    #[test]
    fn test_fragment_anywhere_in_path() {
        let set = default_set();
        assert!(set.is_excluded("/api/v1/swagger"));
        assert!(set.is_excluded("/static/favicon.ico"));
    }

    #[test]
    fn test_regular_paths_are_audited() {
        let set = default_set();
        assert!(!set.is_excluded("/"));
        assert!(!set.is_excluded("/todos"));
        assert!(!set.is_excluded("/monitor"));
        assert!(!set.is_excluded("/health"));
    }
}
