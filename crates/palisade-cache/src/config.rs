//! Availability tuning for the caching access point.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Configuration for a caching access point.
///
/// The single tunable is the breaker's backoff window: how long one upstream
/// failure suppresses further upstream calls through the access point.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Backoff window after an upstream failure, in milliseconds
    #[serde(default = "default_backoff_ms")]
    pub backoff_ms: u64,
}

fn default_backoff_ms() -> u64 {
    10_000 // 10 seconds
}

impl CacheConfig {
    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns a message describing the first invalid value.
    pub fn validate(&self) -> Result<(), String> {
        if self.backoff_ms == 0 {
            return Err("backoff_ms must be > 0".into());
        }
        Ok(())
    }

    /// Backoff window as a `Duration`.
    #[must_use]
    pub fn backoff(&self) -> Duration {
        Duration::from_millis(self.backoff_ms)
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            backoff_ms: default_backoff_ms(),
        }
    }
}
