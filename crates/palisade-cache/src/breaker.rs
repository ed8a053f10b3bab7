//! Failure-aware guard for upstream calls.
//!
//! The breaker has two states. While no failure is recorded it is closed and
//! every call goes through. After a failure it is open for exactly one
//! backoff window: calls inside the window are not executed at all and get a
//! copy of the recorded error. The first call after the window runs
//! unconditionally - there is no separate half-open probe - and its own
//! outcome re-arms or clears the breaker.

use std::future::Future;
use std::sync::Mutex;
use std::time::Duration;

use tokio::time::Instant;
use tracing::{debug, warn};

use crate::error::{AccessError, AccessResult};

#[derive(Debug, Default)]
struct BreakerState {
    /// When the most recent failure was recorded; `None` while closed.
    last_error_at: Option<Instant>,
    /// The most recent failure, handed to short-circuited callers.
    last_error: Option<AccessError>,
}

/// Two-state circuit breaker guarding one upstream.
///
/// Each caching access point owns its own instance, so independent access
/// points (for example pointed at different upstreams) never share failure
/// state. One instance is shared across all entity kinds of its access
/// point: a single failure suppresses every upstream call through it until
/// the window elapses.
#[derive(Debug)]
pub struct Breaker {
    backoff: Duration,
    state: Mutex<BreakerState>,
}

impl Breaker {
    /// Creates a closed breaker with the given backoff window.
    #[must_use]
    pub fn new(backoff: Duration) -> Self {
        Self {
            backoff,
            state: Mutex::new(BreakerState::default()),
        }
    }

    /// The configured backoff window.
    #[must_use]
    pub fn backoff(&self) -> Duration {
        self.backoff
    }

    /// Runs `operation` unless a recent failure is being backed off.
    ///
    /// Safe to call from any number of tasks concurrently; the health state
    /// is the only shared data and is updated atomically.
    ///
    /// # Errors
    ///
    /// Returns the recorded error without invoking `operation` while the
    /// breaker is open; otherwise returns whatever `operation` produced,
    /// recording it in passing.
    pub async fn guard<F, Fut, T>(&self, operation: F) -> AccessResult<T>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = AccessResult<T>>,
    {
        if let Some(last_error) = self.short_circuit() {
            return Err(last_error);
        }

        let result = operation().await;
        self.record(&result);
        result
    }

    /// Returns the recorded error if the backoff window is still running.
    fn short_circuit(&self) -> Option<AccessError> {
        let state = self.state.lock().unwrap();
        match (state.last_error_at, &state.last_error) {
            (Some(at), Some(error)) if at.elapsed() < self.backoff => {
                debug!(error = %error, "Circuit open; returning recorded upstream error");
                Some(error.clone())
            }
            _ => None,
        }
    }

    fn record<T>(&self, result: &AccessResult<T>) {
        let mut state = self.state.lock().unwrap();
        match result {
            Ok(_) => {
                if state.last_error_at.take().is_some() {
                    state.last_error = None;
                    debug!("Upstream call succeeded; circuit closed");
                }
            }
            Err(error) => {
                warn!(
                    error = %error,
                    backoff = ?self.backoff,
                    "Upstream call failed; suppressing upstream calls for the backoff window"
                );
                state.last_error_at = Some(Instant::now());
                state.last_error = Some(error.clone());
            }
        }
    }
}
