//! Core trait for mirror-store backends.

use async_trait::async_trait;
use palisade_core::{EntityKind, Namespace, RawRecord, Server, User};

use crate::error::StorageError;

/// The latest known-good snapshot of every mirrored entity kind.
///
/// Each `put_*` wholly replaces the stored snapshot for its kind - there is
/// no incremental merge, so the store always reflects one upstream response
/// per kind. Each `get_*` returns an empty collection for a kind that was
/// never stored; reads never fail due to absence. Node snapshots are scoped
/// by namespace; all other kinds hold a single cluster-wide snapshot.
///
/// The store is only ever populated by the caching access point; it exposes
/// no external write path of its own.
#[async_trait]
pub trait SnapshotStore: Send + Sync {
    // ==================== Namespaces ====================

    /// Replaces the namespace snapshot.
    async fn put_namespaces(&self, namespaces: &[Namespace]) -> Result<(), StorageError>;

    /// Returns the namespace snapshot.
    async fn get_namespaces(&self) -> Result<Vec<Namespace>, StorageError>;

    // ==================== Nodes ====================

    /// Replaces the node snapshot for one namespace.
    async fn put_nodes(&self, namespace: &str, nodes: &[Server]) -> Result<(), StorageError>;

    /// Returns the node snapshot for one namespace.
    async fn get_nodes(&self, namespace: &str) -> Result<Vec<Server>, StorageError>;

    // ==================== Proxies ====================

    /// Replaces the proxy snapshot.
    async fn put_proxies(&self, proxies: &[Server]) -> Result<(), StorageError>;

    /// Returns the proxy snapshot.
    async fn get_proxies(&self) -> Result<Vec<Server>, StorageError>;

    // ==================== Users ====================

    /// Replaces the user snapshot.
    async fn put_users(&self, users: &[User]) -> Result<(), StorageError>;

    /// Returns the user snapshot.
    async fn get_users(&self) -> Result<Vec<User>, StorageError>;

    // ==================== Certificate authorities ====================

    /// Replaces the certificate-authority snapshot.
    async fn put_cert_authorities(&self, authorities: &[RawRecord]) -> Result<(), StorageError>;

    /// Returns the certificate-authority snapshot.
    async fn get_cert_authorities(&self) -> Result<Vec<RawRecord>, StorageError>;

    // ==================== Connectors ====================

    /// Replaces the auth-connector snapshot.
    async fn put_connectors(&self, connectors: &[RawRecord]) -> Result<(), StorageError>;

    /// Returns the auth-connector snapshot.
    async fn get_connectors(&self) -> Result<Vec<RawRecord>, StorageError>;

    // ==================== Sessions ====================

    /// Replaces the session snapshot.
    async fn put_sessions(&self, sessions: &[RawRecord]) -> Result<(), StorageError>;

    /// Returns the session snapshot.
    async fn get_sessions(&self) -> Result<Vec<RawRecord>, StorageError>;

    // ==================== Provisioning tokens ====================

    /// Replaces the provisioning-token snapshot.
    async fn put_tokens(&self, tokens: &[RawRecord]) -> Result<(), StorageError>;

    /// Returns the provisioning-token snapshot.
    async fn get_tokens(&self) -> Result<Vec<RawRecord>, StorageError>;

    // ==================== Snapshot presence ====================

    /// Reports whether a snapshot was ever stored for the kind.
    ///
    /// `scope` carries the namespace for node snapshots and is `None` for
    /// every other kind. This is how callers tell a never-synchronized kind
    /// apart from one whose latest snapshot is legitimately empty.
    async fn has_snapshot(
        &self,
        kind: EntityKind,
        scope: Option<&str>,
    ) -> Result<bool, StorageError>;
}

// Ensure traits are object-safe by using them as trait objects
#[cfg(test)]
mod tests {
    use super::*;

    // Compile-time test that SnapshotStore is object-safe
    fn _assert_store_object_safe(_: &dyn SnapshotStore) {}
}
