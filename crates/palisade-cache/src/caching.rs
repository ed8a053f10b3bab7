//! CachingAccessPoint - a mirroring decorator over the upstream contract.
//!
//! This wrapper delegates reads to the real control-plane client while
//! copying every successful result into a local snapshot store. When the
//! upstream call fails or is short-circuited by the breaker, the caller is
//! served the last mirrored snapshot instead, so readers keep getting
//! answers (possibly stale ones) throughout an upstream outage.
//!
//! # Example
//!
//! ```ignore
//! use palisade_cache::CachingAccessPoint;
//! use palisade_db_memory::create_snapshot_store;
//!
//! let access_point = CachingAccessPoint::new(client, create_snapshot_store()).await?;
//!
//! // Keeps answering even if the control plane goes away now
//! let nodes = access_point.get_nodes("default").await?;
//! ```

use async_trait::async_trait;
use palisade_core::{EntityKind, Namespace, RawRecord, Server, User};
use palisade_storage::DynSnapshotStore;
use tracing::debug;

use crate::access_point::{AccessPoint, DynAccessPoint};
use crate::breaker::Breaker;
use crate::config::CacheConfig;
use crate::error::{AccessError, AccessResult};

/// A read-through mirror of the upstream control plane.
///
/// Implements [`AccessPoint`] with fail-open semantics: every read first
/// attempts a guarded upstream fetch, stores the fresh snapshot on success
/// and falls back to the mirror on failure. An error reaches the caller only
/// when the kind has never been fetched successfully *and* the current call
/// also failed.
///
/// The mirror store is populated exclusively through this type; it is
/// deliberately not exposed to callers.
pub struct CachingAccessPoint {
    /// The authoritative client every read is first attempted against.
    upstream: DynAccessPoint,
    /// Holds the latest known-good snapshot per entity kind.
    store: DynSnapshotStore,
    /// Guards all upstream calls of this access point.
    breaker: Breaker,
}

impl CachingAccessPoint {
    /// Creates an access point with the default configuration.
    ///
    /// # Errors
    ///
    /// Fails with `AccessError::InitialSync` if any entity kind cannot be
    /// fetched, or with a store error if a snapshot cannot be written. No
    /// access point is returned in that case.
    pub async fn new(upstream: DynAccessPoint, store: DynSnapshotStore) -> AccessResult<Self> {
        Self::with_config(upstream, store, CacheConfig::default()).await
    }

    /// Creates an access point with an explicit configuration.
    ///
    /// Performs one fetch per mirrored entity kind directly against the
    /// upstream - the breaker is not consulted, there is no health state to
    /// protect yet - and mirrors each result before returning.
    ///
    /// # Errors
    ///
    /// Fails with the first error encountered during the initial
    /// synchronization.
    pub async fn with_config(
        upstream: DynAccessPoint,
        store: DynSnapshotStore,
        config: CacheConfig,
    ) -> AccessResult<Self> {
        let access_point = Self {
            upstream,
            store,
            breaker: Breaker::new(config.backoff()),
        };
        access_point.fetch_all().await?;
        Ok(access_point)
    }

    /// One full fetch per mirrored kind. Namespaces come first so the node
    /// population of every discovered namespace can be synchronized too.
    async fn fetch_all(&self) -> AccessResult<()> {
        debug!("Starting initial mirror synchronization");

        let namespaces = self
            .upstream
            .get_namespaces()
            .await
            .map_err(|e| AccessError::initial_sync(EntityKind::Namespace, e))?;
        self.store.put_namespaces(&namespaces).await?;

        for namespace in &namespaces {
            let nodes = self
                .upstream
                .get_nodes(&namespace.name)
                .await
                .map_err(|e| AccessError::initial_sync(EntityKind::Node, e))?;
            self.store.put_nodes(&namespace.name, &nodes).await?;
        }

        let proxies = self
            .upstream
            .get_proxies()
            .await
            .map_err(|e| AccessError::initial_sync(EntityKind::Proxy, e))?;
        self.store.put_proxies(&proxies).await?;

        let users = self
            .upstream
            .get_users()
            .await
            .map_err(|e| AccessError::initial_sync(EntityKind::User, e))?;
        self.store.put_users(&users).await?;

        let authorities = self
            .upstream
            .get_cert_authorities()
            .await
            .map_err(|e| AccessError::initial_sync(EntityKind::CertAuthority, e))?;
        self.store.put_cert_authorities(&authorities).await?;

        let connectors = self
            .upstream
            .get_connectors()
            .await
            .map_err(|e| AccessError::initial_sync(EntityKind::Connector, e))?;
        self.store.put_connectors(&connectors).await?;

        let sessions = self
            .upstream
            .get_sessions()
            .await
            .map_err(|e| AccessError::initial_sync(EntityKind::Session, e))?;
        self.store.put_sessions(&sessions).await?;

        let tokens = self
            .upstream
            .get_tokens()
            .await
            .map_err(|e| AccessError::initial_sync(EntityKind::Token, e))?;
        self.store.put_tokens(&tokens).await?;

        debug!(
            namespaces = namespaces.len(),
            users = users.len(),
            "Initial mirror synchronization complete"
        );
        Ok(())
    }
}

#[async_trait]
impl AccessPoint for CachingAccessPoint {
    async fn get_namespaces(&self) -> AccessResult<Vec<Namespace>> {
        match self.breaker.guard(|| self.upstream.get_namespaces()).await {
            Ok(namespaces) => {
                self.store.put_namespaces(&namespaces).await?;
                Ok(namespaces)
            }
            Err(error) => {
                if self.store.has_snapshot(EntityKind::Namespace, None).await? {
                    debug!(error = %error, "Serving mirrored namespaces; upstream unavailable");
                    Ok(self.store.get_namespaces().await?)
                } else {
                    Err(error)
                }
            }
        }
    }

    async fn get_nodes(&self, namespace: &str) -> AccessResult<Vec<Server>> {
        match self
            .breaker
            .guard(|| self.upstream.get_nodes(namespace))
            .await
        {
            Ok(nodes) => {
                self.store.put_nodes(namespace, &nodes).await?;
                Ok(nodes)
            }
            Err(error) => {
                if self
                    .store
                    .has_snapshot(EntityKind::Node, Some(namespace))
                    .await?
                {
                    debug!(
                        namespace = %namespace,
                        error = %error,
                        "Serving mirrored nodes; upstream unavailable"
                    );
                    Ok(self.store.get_nodes(namespace).await?)
                } else {
                    Err(error)
                }
            }
        }
    }

    async fn get_proxies(&self) -> AccessResult<Vec<Server>> {
        match self.breaker.guard(|| self.upstream.get_proxies()).await {
            Ok(proxies) => {
                self.store.put_proxies(&proxies).await?;
                Ok(proxies)
            }
            Err(error) => {
                if self.store.has_snapshot(EntityKind::Proxy, None).await? {
                    debug!(error = %error, "Serving mirrored proxies; upstream unavailable");
                    Ok(self.store.get_proxies().await?)
                } else {
                    Err(error)
                }
            }
        }
    }

    async fn get_users(&self) -> AccessResult<Vec<User>> {
        match self.breaker.guard(|| self.upstream.get_users()).await {
            Ok(users) => {
                self.store.put_users(&users).await?;
                Ok(users)
            }
            Err(error) => {
                if self.store.has_snapshot(EntityKind::User, None).await? {
                    debug!(error = %error, "Serving mirrored users; upstream unavailable");
                    Ok(self.store.get_users().await?)
                } else {
                    Err(error)
                }
            }
        }
    }

    async fn get_cert_authorities(&self) -> AccessResult<Vec<RawRecord>> {
        match self
            .breaker
            .guard(|| self.upstream.get_cert_authorities())
            .await
        {
            Ok(authorities) => {
                self.store.put_cert_authorities(&authorities).await?;
                Ok(authorities)
            }
            Err(error) => {
                if self
                    .store
                    .has_snapshot(EntityKind::CertAuthority, None)
                    .await?
                {
                    debug!(error = %error, "Serving mirrored certificate authorities; upstream unavailable");
                    Ok(self.store.get_cert_authorities().await?)
                } else {
                    Err(error)
                }
            }
        }
    }

    async fn get_connectors(&self) -> AccessResult<Vec<RawRecord>> {
        match self.breaker.guard(|| self.upstream.get_connectors()).await {
            Ok(connectors) => {
                self.store.put_connectors(&connectors).await?;
                Ok(connectors)
            }
            Err(error) => {
                if self.store.has_snapshot(EntityKind::Connector, None).await? {
                    debug!(error = %error, "Serving mirrored connectors; upstream unavailable");
                    Ok(self.store.get_connectors().await?)
                } else {
                    Err(error)
                }
            }
        }
    }

    async fn get_sessions(&self) -> AccessResult<Vec<RawRecord>> {
        match self.breaker.guard(|| self.upstream.get_sessions()).await {
            Ok(sessions) => {
                self.store.put_sessions(&sessions).await?;
                Ok(sessions)
            }
            Err(error) => {
                if self.store.has_snapshot(EntityKind::Session, None).await? {
                    debug!(error = %error, "Serving mirrored sessions; upstream unavailable");
                    Ok(self.store.get_sessions().await?)
                } else {
                    Err(error)
                }
            }
        }
    }

    async fn get_tokens(&self) -> AccessResult<Vec<RawRecord>> {
        match self.breaker.guard(|| self.upstream.get_tokens()).await {
            Ok(tokens) => {
                self.store.put_tokens(&tokens).await?;
                Ok(tokens)
            }
            Err(error) => {
                if self.store.has_snapshot(EntityKind::Token, None).await? {
                    debug!(error = %error, "Serving mirrored tokens; upstream unavailable");
                    Ok(self.store.get_tokens().await?)
                } else {
                    Err(error)
                }
            }
        }
    }
}
