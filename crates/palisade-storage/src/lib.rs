//! # palisade-storage
//!
//! Mirror-store abstraction for the Palisade access layer.
//!
//! This crate defines the contract that all mirror-store backends must
//! implement. It does not contain any implementations - those are provided by
//! separate crates.
//!
//! ## Overview
//!
//! The main trait is [`SnapshotStore`], which holds the latest known-good
//! snapshot of every mirrored entity kind:
//! - `put_*` replaces the stored snapshot for a kind wholesale
//! - `get_*` returns it, or an empty collection if the kind was never stored
//! - [`SnapshotStore::has_snapshot`] distinguishes "never synchronized" from
//!   "synchronized and empty"
//!
//! ## Example
//!
//! ```ignore
//! use palisade_storage::{SnapshotStore, StorageError};
//!
//! async fn count_users(store: &dyn SnapshotStore) -> Result<usize, StorageError> {
//!     Ok(store.get_users().await?.len())
//! }
//! ```
//!
//! ## Store Backends
//!
//! To implement a backend, implement the [`SnapshotStore`] trait:
//!
//! ```ignore
//! use async_trait::async_trait;
//! use palisade_storage::{SnapshotStore, StorageError};
//!
//! struct MyStore {
//!     // ...
//! }
//!
//! #[async_trait]
//! impl SnapshotStore for MyStore {
//!     async fn get_users(&self) -> Result<Vec<User>, StorageError> {
//!         // Implementation
//!     }
//!     // ... other methods
//! }
//! ```

mod error;
mod traits;

// Re-export everything from submodules
pub use error::{ErrorCategory, StorageError};
pub use traits::SnapshotStore;

/// Type alias for a storage result.
pub type StorageResult<T> = Result<T, StorageError>;

/// Type alias for a boxed snapshot-store trait object.
pub type DynSnapshotStore = std::sync::Arc<dyn SnapshotStore>;

/// Prelude module for convenient imports.
///
/// ```ignore
/// use palisade_storage::prelude::*;
/// ```
pub mod prelude {
    pub use crate::error::{ErrorCategory, StorageError};
    pub use crate::traits::SnapshotStore;
    pub use crate::{DynSnapshotStore, StorageResult};
}
