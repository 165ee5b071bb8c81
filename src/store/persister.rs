use crate::retry::{RetryPolicy, PERSIST_RETRY};
use crate::store::error::{PersistError, StoreError};
use crate::store::RecordStore;
use log::{info, warn};
use polars::prelude::DataFrame;
use std::sync::Arc;

/// Appends one record to the destination store, retrying with a flat backoff.
pub struct Persister {
    store: Arc<dyn RecordStore>,
    policy: RetryPolicy,
}

impl Persister {
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        Self::with_policy(store, PERSIST_RETRY)
    }

    pub fn with_policy(store: Arc<dyn RecordStore>, policy: RetryPolicy) -> Self {
        Self { store, policy }
    }

    /// Appends the single row of `frame`, the record for `date`.
    ///
    /// Each attempt is a full [`RecordStore::append`]: connection, schema and table
    /// provisioning, insert. Any failure in any of those waits `policy.backoff` and
    /// starts over, up to `policy.max_attempts` attempts.
    ///
    /// # Errors
    ///
    /// [`PersistError::Exhausted`], naming `date`, when every attempt failed.
    pub async fn persist(&self, date: &str, frame: &DataFrame) -> Result<(), PersistError> {
        let mut attempt = 1;
        loop {
            match self.store.append(frame).await {
                Ok(()) => {
                    info!("Appended the record for {} (attempt {})", date, attempt);
                    return Ok(());
                }
                Err(e) if self.policy.has_next(attempt) => {
                    self.log_retry(date, attempt, &e);
                    tokio::time::sleep(self.policy.backoff).await;
                    attempt += 1;
                }
                Err(e) => {
                    warn!(
                        "Attempt {}/{} to store {} failed: {}. No attempts left",
                        attempt, self.policy.max_attempts, date, e
                    );
                    return Err(PersistError::Exhausted {
                        date: date.to_string(),
                        attempts: attempt,
                        last: e,
                    });
                }
            }
        }
    }

    fn log_retry(&self, date: &str, attempt: usize, error: &StoreError) {
        warn!(
            "Attempt {}/{} to store {} failed: {}. Retrying in {} seconds",
            attempt,
            self.policy.max_attempts,
            date,
            error,
            self.policy.backoff.as_secs()
        );
    }
}
