use serde::{Deserialize, Serialize};

/// An opaque mirrored record.
///
/// Certificate authorities, connectors, sessions and provisioning tokens are
/// mirrored by key and full value; the access layer never interprets the
/// payload itself.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawRecord {
    /// Record key, unique within its kind.
    pub id: String,
    /// Full upstream payload.
    pub value: serde_json::Value,
}

impl RawRecord {
    /// Creates a record from its key and payload.
    #[must_use]
    pub fn new(id: impl Into<String>, value: serde_json::Value) -> Self {
        Self {
            id: id.into(),
            value,
        }
    }
}
