//! Read contract of the upstream control plane.

use async_trait::async_trait;
use palisade_core::{Namespace, RawRecord, Server, User};

use crate::error::AccessResult;

/// Full-snapshot read operations exposed by the control plane.
///
/// Every operation returns the complete current collection of its kind -
/// there are no cursors or since-parameters. The real control-plane client
/// implements this trait; so does [`CachingAccessPoint`], which lets callers
/// hold either without knowing which one they were given.
///
/// [`CachingAccessPoint`]: crate::caching::CachingAccessPoint
#[async_trait]
pub trait AccessPoint: Send + Sync {
    /// Fetches all namespaces.
    async fn get_namespaces(&self) -> AccessResult<Vec<Namespace>>;

    /// Fetches all nodes registered in one namespace.
    async fn get_nodes(&self, namespace: &str) -> AccessResult<Vec<Server>>;

    /// Fetches all proxies.
    async fn get_proxies(&self) -> AccessResult<Vec<Server>>;

    /// Fetches all users.
    async fn get_users(&self) -> AccessResult<Vec<User>>;

    /// Fetches all certificate authorities.
    async fn get_cert_authorities(&self) -> AccessResult<Vec<RawRecord>>;

    /// Fetches all auth connectors.
    async fn get_connectors(&self) -> AccessResult<Vec<RawRecord>>;

    /// Fetches all active sessions.
    async fn get_sessions(&self) -> AccessResult<Vec<RawRecord>>;

    /// Fetches all provisioning tokens.
    async fn get_tokens(&self) -> AccessResult<Vec<RawRecord>>;
}

/// Type alias for a shared access-point trait object.
pub type DynAccessPoint = std::sync::Arc<dyn AccessPoint>;
