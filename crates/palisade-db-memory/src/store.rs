use async_trait::async_trait;
use dashmap::DashMap;
use palisade_core::{EntityKind, Namespace, RawRecord, Server, User};
use palisade_storage::{SnapshotStore, StorageError};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::debug;

pub type SnapshotKey = String; // Format: "kind" or "kind/scope"

pub(crate) fn make_snapshot_key(kind: EntityKind, scope: Option<&str>) -> SnapshotKey {
    match scope {
        Some(scope) => format!("{kind}/{scope}"),
        None => kind.as_str().to_string(),
    }
}

/// In-memory mirror store backed by a concurrent hash map.
///
/// Snapshots are kept JSON-encoded under their kind key, the same shape a
/// durable keyed backend would hold, so replace-on-put and empty-on-absence
/// behave identically across backends. An entry is only ever written
/// wholesale: the last completed put for a key wins.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    snapshots: DashMap<SnapshotKey, serde_json::Value>,
}

impl InMemoryStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self {
            snapshots: DashMap::new(),
        }
    }

    /// Number of snapshot entries currently held.
    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    /// Returns `true` if no snapshot was ever stored.
    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    fn put_snapshot<T: Serialize>(
        &self,
        kind: EntityKind,
        scope: Option<&str>,
        items: &[T],
    ) -> Result<(), StorageError> {
        let value = serde_json::to_value(items)
            .map_err(|e| StorageError::serialization(e.to_string()))?;
        let key = make_snapshot_key(kind, scope);
        debug!(key = %key, count = items.len(), "Replaced mirror snapshot");
        self.snapshots.insert(key, value);
        Ok(())
    }

    fn get_snapshot<T: DeserializeOwned>(
        &self,
        kind: EntityKind,
        scope: Option<&str>,
    ) -> Result<Vec<T>, StorageError> {
        match self.snapshots.get(&make_snapshot_key(kind, scope)) {
            Some(entry) => serde_json::from_value(entry.value().clone())
                .map_err(|e| StorageError::serialization(e.to_string())),
            None => Ok(Vec::new()),
        }
    }
}

#[async_trait]
impl SnapshotStore for InMemoryStore {
    async fn put_namespaces(&self, namespaces: &[Namespace]) -> Result<(), StorageError> {
        self.put_snapshot(EntityKind::Namespace, None, namespaces)
    }

    async fn get_namespaces(&self) -> Result<Vec<Namespace>, StorageError> {
        self.get_snapshot(EntityKind::Namespace, None)
    }

    async fn put_nodes(&self, namespace: &str, nodes: &[Server]) -> Result<(), StorageError> {
        self.put_snapshot(EntityKind::Node, Some(namespace), nodes)
    }

    async fn get_nodes(&self, namespace: &str) -> Result<Vec<Server>, StorageError> {
        self.get_snapshot(EntityKind::Node, Some(namespace))
    }

    async fn put_proxies(&self, proxies: &[Server]) -> Result<(), StorageError> {
        self.put_snapshot(EntityKind::Proxy, None, proxies)
    }

    async fn get_proxies(&self) -> Result<Vec<Server>, StorageError> {
        self.get_snapshot(EntityKind::Proxy, None)
    }

    async fn put_users(&self, users: &[User]) -> Result<(), StorageError> {
        self.put_snapshot(EntityKind::User, None, users)
    }

    async fn get_users(&self) -> Result<Vec<User>, StorageError> {
        self.get_snapshot(EntityKind::User, None)
    }

    async fn put_cert_authorities(&self, authorities: &[RawRecord]) -> Result<(), StorageError> {
        self.put_snapshot(EntityKind::CertAuthority, None, authorities)
    }

    async fn get_cert_authorities(&self) -> Result<Vec<RawRecord>, StorageError> {
        self.get_snapshot(EntityKind::CertAuthority, None)
    }

    async fn put_connectors(&self, connectors: &[RawRecord]) -> Result<(), StorageError> {
        self.put_snapshot(EntityKind::Connector, None, connectors)
    }

    async fn get_connectors(&self) -> Result<Vec<RawRecord>, StorageError> {
        self.get_snapshot(EntityKind::Connector, None)
    }

    async fn put_sessions(&self, sessions: &[RawRecord]) -> Result<(), StorageError> {
        self.put_snapshot(EntityKind::Session, None, sessions)
    }

    async fn get_sessions(&self) -> Result<Vec<RawRecord>, StorageError> {
        self.get_snapshot(EntityKind::Session, None)
    }

    async fn put_tokens(&self, tokens: &[RawRecord]) -> Result<(), StorageError> {
        self.put_snapshot(EntityKind::Token, None, tokens)
    }

    async fn get_tokens(&self) -> Result<Vec<RawRecord>, StorageError> {
        self.get_snapshot(EntityKind::Token, None)
    }

    async fn has_snapshot(
        &self,
        kind: EntityKind,
        scope: Option<&str>,
    ) -> Result<bool, StorageError> {
        Ok(self.snapshots.contains_key(&make_snapshot_key(kind, scope)))
    }
}
