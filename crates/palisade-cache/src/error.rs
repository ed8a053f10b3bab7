//! Error types for the caching access point.

use std::fmt;

use palisade_core::EntityKind;
use palisade_storage::StorageError;

/// Errors surfaced by the caching access point.
///
/// Cloneable by design: the guarded executor stores the most recent failure
/// and returns a copy to every caller it short-circuits.
#[derive(Debug, Clone, thiserror::Error)]
pub enum AccessError {
    /// The upstream control plane failed or was unreachable.
    #[error("Upstream failure: {message}")]
    Upstream {
        /// Description of the upstream failure.
        message: String,
    },

    /// The local mirror store failed.
    #[error(transparent)]
    Storage(#[from] StorageError),

    /// Initial synchronization of one entity kind failed during
    /// construction.
    #[error("Initial synchronization of {kind} failed: {source}")]
    InitialSync {
        /// The entity kind whose fetch failed.
        kind: EntityKind,
        /// The underlying failure.
        #[source]
        source: Box<AccessError>,
    },
}

impl AccessError {
    /// Creates a new `Upstream` error.
    #[must_use]
    pub fn upstream(message: impl Into<String>) -> Self {
        Self::Upstream {
            message: message.into(),
        }
    }

    /// Creates a new `InitialSync` error wrapping the failure for `kind`.
    #[must_use]
    pub fn initial_sync(kind: EntityKind, source: AccessError) -> Self {
        Self::InitialSync {
            kind,
            source: Box::new(source),
        }
    }

    /// Returns `true` if this is an upstream failure.
    #[must_use]
    pub fn is_upstream(&self) -> bool {
        matches!(self, Self::Upstream { .. })
    }

    /// Returns `true` if this is a mirror-store failure.
    #[must_use]
    pub fn is_storage(&self) -> bool {
        matches!(self, Self::Storage(_))
    }

    /// Returns `true` if this is an initial-synchronization failure.
    #[must_use]
    pub fn is_initial_sync(&self) -> bool {
        matches!(self, Self::InitialSync { .. })
    }

    /// Returns the error category for logging/monitoring purposes.
    #[must_use]
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::Upstream { .. } => ErrorCategory::Upstream,
            Self::Storage(_) => ErrorCategory::Storage,
            Self::InitialSync { .. } => ErrorCategory::InitialSync,
        }
    }
}

/// Categories of access errors for logging and monitoring.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    /// Upstream control-plane failure.
    Upstream,
    /// Mirror-store failure.
    Storage,
    /// Construction-time synchronization failure.
    InitialSync,
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Upstream => write!(f, "upstream"),
            Self::Storage => write!(f, "storage"),
            Self::InitialSync => write!(f, "initial_sync"),
        }
    }
}

/// Convenience result type for access-point operations.
pub type AccessResult<T> = Result<T, AccessError>;
