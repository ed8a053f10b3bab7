use thiserror::Error;

/// Core error types for entity validation and parsing.
#[derive(Debug, Clone, Error)]
pub enum CoreError {
    #[error("Invalid Unix login: {0}")]
    InvalidLogin(String),

    #[error("Invalid user: {message}")]
    InvalidUser { message: String },

    #[error("Invalid external identity: {message}")]
    InvalidIdentity { message: String },

    #[error("Unknown entity kind: {0}")]
    UnknownEntityKind(String),
}

impl CoreError {
    /// Create a new InvalidLogin error
    pub fn invalid_login(login: impl Into<String>) -> Self {
        Self::InvalidLogin(login.into())
    }

    /// Create a new InvalidUser error
    pub fn invalid_user(message: impl Into<String>) -> Self {
        Self::InvalidUser {
            message: message.into(),
        }
    }

    /// Create a new InvalidIdentity error
    pub fn invalid_identity(message: impl Into<String>) -> Self {
        Self::InvalidIdentity {
            message: message.into(),
        }
    }

    /// Create a new UnknownEntityKind error
    pub fn unknown_entity_kind(kind: impl Into<String>) -> Self {
        Self::UnknownEntityKind(kind.into())
    }

    /// Check if this error was produced by entity validation
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::InvalidLogin(_) | Self::InvalidUser { .. } | Self::InvalidIdentity { .. }
        )
    }

    /// Get error category for logging/monitoring
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::InvalidLogin(_) | Self::InvalidUser { .. } | Self::InvalidIdentity { .. } => {
                ErrorCategory::Validation
            }
            Self::UnknownEntityKind(_) => ErrorCategory::Parse,
        }
    }
}

/// Error categories for monitoring and classification
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Validation,
    Parse,
}

impl std::fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation => write!(f, "validation"),
            Self::Parse => write!(f, "parse"),
        }
    }
}

/// Convenience result type for core operations
pub type Result<T> = std::result::Result<T, CoreError>;
