use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::CoreError;

/// Entity kinds mirrored from the upstream control plane.
///
/// Each kind is fetched, refreshed and snapshotted independently of the
/// others. `Node` snapshots are additionally scoped by namespace.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    Namespace,
    Node,
    Proxy,
    User,
    CertAuthority,
    Connector,
    Session,
    Token,
}

impl EntityKind {
    /// All mirrored kinds, in initial synchronization order.
    pub const ALL: [EntityKind; 8] = [
        EntityKind::Namespace,
        EntityKind::Node,
        EntityKind::Proxy,
        EntityKind::User,
        EntityKind::CertAuthority,
        EntityKind::Connector,
        EntityKind::Session,
        EntityKind::Token,
    ];

    /// Stable string form of the kind, matching its serde representation.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            EntityKind::Namespace => "namespace",
            EntityKind::Node => "node",
            EntityKind::Proxy => "proxy",
            EntityKind::User => "user",
            EntityKind::CertAuthority => "cert_authority",
            EntityKind::Connector => "connector",
            EntityKind::Session => "session",
            EntityKind::Token => "token",
        }
    }

    /// Returns `true` if snapshots of this kind are scoped by namespace.
    #[must_use]
    pub fn is_namespaced(&self) -> bool {
        matches!(self, EntityKind::Node)
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for EntityKind {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "namespace" => Ok(EntityKind::Namespace),
            "node" => Ok(EntityKind::Node),
            "proxy" => Ok(EntityKind::Proxy),
            "user" => Ok(EntityKind::User),
            "cert_authority" => Ok(EntityKind::CertAuthority),
            "connector" => Ok(EntityKind::Connector),
            "session" => Ok(EntityKind::Session),
            "token" => Ok(EntityKind::Token),
            other => Err(CoreError::unknown_entity_kind(other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_matches_from_str() {
        for kind in EntityKind::ALL {
            let parsed: EntityKind = kind.as_str().parse().unwrap();
            assert_eq!(parsed, kind);
            assert_eq!(kind.to_string(), kind.as_str());
        }
    }

    #[test]
    fn test_unknown_kind_is_rejected() {
        let err = "gadget".parse::<EntityKind>().unwrap_err();
        assert!(matches!(err, CoreError::UnknownEntityKind(_)));
    }

    #[test]
    fn test_only_nodes_are_namespaced() {
        for kind in EntityKind::ALL {
            assert_eq!(kind.is_namespaced(), kind == EntityKind::Node);
        }
    }

    #[test]
    fn test_serde_uses_snake_case() {
        let json = serde_json::to_string(&EntityKind::CertAuthority).unwrap();
        assert_eq!(json, "\"cert_authority\"");
        let kind: EntityKind = serde_json::from_str("\"node\"").unwrap();
        assert_eq!(kind, EntityKind::Node);
    }
}
