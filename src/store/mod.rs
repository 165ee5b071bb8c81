//! Destination store: duplicate detection and append-only persistence.

pub mod error;
pub mod guard;
pub mod persister;
pub mod postgres;
pub mod sql;

use crate::store::error::StoreError;
use async_trait::async_trait;
use polars::prelude::DataFrame;

/// The destination table of weather records.
///
/// Every call stands on its own: implementations backed by a network resource open
/// their connection inside the call, so a retry after a failure never reuses a broken
/// handle.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Whether the destination table exists yet.
    async fn table_exists(&self) -> Result<bool, StoreError>;

    /// Up to `limit` values of the `date` column, skipping the first `offset`, in a
    /// stable order.
    async fn date_chunk(&self, offset: usize, limit: usize) -> Result<Vec<String>, StoreError>;

    /// One append attempt: provisions the schema and table if missing, then inserts the
    /// single row of `frame`. Existing rows are never touched.
    async fn append(&self, frame: &DataFrame) -> Result<(), StoreError>;
}
