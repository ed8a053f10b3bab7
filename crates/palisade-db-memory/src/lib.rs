//! In-memory mirror store for the Palisade access layer.
//!
//! This crate provides an in-memory implementation of the `SnapshotStore`
//! trait from `palisade-storage`, using a concurrent hash map keyed by entity
//! kind.
//!
//! # Example
//!
//! ```ignore
//! use palisade_db_memory::InMemoryStore;
//! use palisade_storage::SnapshotStore;
//!
//! let store = InMemoryStore::new();
//!
//! store.put_users(&users).await?;
//! let mirrored = store.get_users().await?;
//! ```

pub mod store;

// Re-export the SnapshotStore trait for convenience
pub use palisade_storage::{DynSnapshotStore, SnapshotStore, StorageError};

pub use store::{InMemoryStore, SnapshotKey};

/// Creates a new in-memory SnapshotStore instance.
pub fn create_snapshot_store() -> DynSnapshotStore {
    std::sync::Arc::new(InMemoryStore::new())
}
