//! Bounded, flat-backoff retry policies used by the fetcher and the persister.

use serde::Deserialize;
use std::time::Duration;

/// Total attempts (first try included) made by the fetcher before giving up.
pub const FETCH_MAX_ATTEMPTS: usize = 6;
/// Wait between two fetch attempts.
pub const FETCH_BACKOFF: Duration = Duration::from_secs(3600);
/// Total attempts (first try included) made by the persister before giving up.
pub const PERSIST_MAX_ATTEMPTS: usize = 6;
/// Wait between two persist attempts.
pub const PERSIST_BACKOFF: Duration = Duration::from_secs(1800);

/// Default policy of the fetcher: 6 attempts, one hour apart.
pub const FETCH_RETRY: RetryPolicy = RetryPolicy::new(FETCH_MAX_ATTEMPTS, FETCH_BACKOFF);
/// Default policy of the persister: 6 attempts, half an hour apart.
pub const PERSIST_RETRY: RetryPolicy = RetryPolicy::new(PERSIST_MAX_ATTEMPTS, PERSIST_BACKOFF);

/// A fixed number of attempts separated by a fixed delay.
///
/// The delay is flat: no exponential growth, no jitter. A policy with `max_attempts`
/// attempts waits `max_attempts - 1` times, so the worst case before giving up is
/// exactly `(max_attempts - 1) * backoff`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: usize,
    pub backoff: Duration,
}

impl RetryPolicy {
    pub const fn new(max_attempts: usize, backoff: Duration) -> Self {
        Self {
            max_attempts,
            backoff,
        }
    }

    /// Whether another attempt follows a failure of attempt number `attempt` (1-based).
    pub fn has_next(&self, attempt: usize) -> bool {
        attempt < self.max_attempts
    }

    /// Longest time spent waiting before the policy is exhausted.
    pub fn total_backoff(&self) -> Duration {
        let waits = u32::try_from(self.max_attempts.saturating_sub(1)).unwrap_or(u32::MAX);
        self.backoff.saturating_mul(waits)
    }
}

/// Settings-file form of a [`RetryPolicy`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct RetryPolicySettings {
    pub max_attempts: usize,
    pub backoff_secs: u64,
}

impl From<RetryPolicySettings> for RetryPolicy {
    fn from(value: RetryPolicySettings) -> Self {
        RetryPolicy::new(value.max_attempts, Duration::from_secs(value.backoff_secs))
    }
}
