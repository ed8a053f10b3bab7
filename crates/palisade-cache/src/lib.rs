//! # palisade-cache
//!
//! Caching access point for the Palisade control plane: the resilience layer
//! that keeps proxies, agents and CLI tools answering topology and identity
//! reads while the authoritative server is unreachable.
//!
//! ## Overview
//!
//! [`CachingAccessPoint`] wraps any [`AccessPoint`] (the upstream read
//! contract), mirrors every successful fetch into a snapshot store and guards
//! upstream calls with a [`Breaker`]: after one failure, calls inside the
//! backoff window short-circuit to the recorded error and readers are served
//! the last mirrored snapshot instead of a hard failure.
//!
//! Construction performs a full synchronization of every mirrored entity
//! kind and fails if any kind cannot be fetched - an access point that could
//! not establish an initial snapshot is never handed out.
//!
//! ## Example
//!
//! ```ignore
//! use palisade_cache::{AccessPoint, CacheConfig, CachingAccessPoint};
//! use palisade_db_memory::create_snapshot_store;
//!
//! let access_point = CachingAccessPoint::with_config(
//!     control_plane_client,
//!     create_snapshot_store(),
//!     CacheConfig::default(),
//! )
//! .await?;
//!
//! // Fresh from upstream while it is healthy, mirrored while it is not
//! let users = access_point.get_users().await?;
//! ```

pub mod access_point;
pub mod breaker;
pub mod caching;
pub mod config;
pub mod error;

pub use access_point::{AccessPoint, DynAccessPoint};
pub use breaker::Breaker;
pub use caching::CachingAccessPoint;
pub use config::CacheConfig;
pub use error::{AccessError, AccessResult, ErrorCategory};

/// Prelude module for convenient imports.
///
/// ```ignore
/// use palisade_cache::prelude::*;
/// ```
pub mod prelude {
    pub use crate::access_point::{AccessPoint, DynAccessPoint};
    pub use crate::breaker::Breaker;
    pub use crate::caching::CachingAccessPoint;
    pub use crate::config::CacheConfig;
    pub use crate::error::{AccessError, AccessResult, ErrorCategory};
}
