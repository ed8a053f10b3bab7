use serde::{Deserialize, Serialize};

/// Namespace that servers belong to unless explicitly assigned elsewhere.
pub const DEFAULT_NAMESPACE: &str = "default";

/// A partitioning key under which servers are grouped.
///
/// Topology queries for nodes are always scoped to one namespace.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Namespace {
    /// Namespace name, unique within the cluster.
    pub name: String,
}

impl Namespace {
    /// Creates a namespace with the given name.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

impl Default for Namespace {
    fn default() -> Self {
        Self::new(DEFAULT_NAMESPACE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_namespace() {
        assert_eq!(Namespace::default().name, DEFAULT_NAMESPACE);
        assert_eq!(Namespace::new("staging").name, "staging");
    }
}
