use crate::store::error::StoreError;
use crate::store::RecordStore;
use log::{debug, info};
use std::collections::BTreeSet;
use std::sync::Arc;

/// Rows read per query while scanning the `date` column.
pub const DEFAULT_SCAN_CHUNK_SIZE: usize = 1000;

/// Whether a date still needs to be ingested.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardDecision {
    NotIngested,
    AlreadyIngested,
}

/// Decides whether a date has already been ingested into the destination table.
///
/// `date` is the natural key of the table, but nothing in the database enforces it;
/// this check is what keeps a second run for the same day from adding a second row.
pub struct DuplicateGuard {
    store: Arc<dyn RecordStore>,
    chunk_size: usize,
}

impl DuplicateGuard {
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        Self::with_chunk_size(store, DEFAULT_SCAN_CHUNK_SIZE)
    }

    pub fn with_chunk_size(store: Arc<dyn RecordStore>, chunk_size: usize) -> Self {
        Self {
            store,
            chunk_size: chunk_size.max(1),
        }
    }

    /// Scans the `date` column chunk by chunk looking for `date`.
    ///
    /// A missing table means nothing was ingested yet. The scan stops at the first chunk
    /// containing the date, or at the first chunk shorter than the chunk size.
    ///
    /// # Errors
    ///
    /// Any [`StoreError`] is returned as-is; this check is never retried.
    pub async fn check(&self, date: &str) -> Result<GuardDecision, StoreError> {
        if !self.store.table_exists().await? {
            info!("Destination table does not exist yet, nothing to check for {}", date);
            return Ok(GuardDecision::NotIngested);
        }

        let mut seen = BTreeSet::new();
        let mut offset = 0;
        loop {
            let chunk = self.store.date_chunk(offset, self.chunk_size).await?;
            let chunk_len = chunk.len();
            seen.extend(chunk);

            if seen.contains(date) {
                info!("Date {} is already ingested", date);
                return Ok(GuardDecision::AlreadyIngested);
            }
            if chunk_len < self.chunk_size {
                break;
            }
            offset += chunk_len;
        }

        debug!(
            "Scanned {} distinct dates, {} not among them",
            seen.len(),
            date
        );
        Ok(GuardDecision::NotIngested)
    }
}
