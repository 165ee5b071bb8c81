use polars::error::PolarsError;
use thiserror::Error;

/// A failed operation against the destination store.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Failed to connect to the destination database")]
    Connect(#[source] sqlx::Error),

    #[error("Failed to create schema {0}")]
    CreateSchema(String, #[source] sqlx::Error),

    #[error("Failed to create table {0}")]
    CreateTable(String, #[source] sqlx::Error),

    #[error("Failed to insert row into {0}")]
    Insert(String, #[source] sqlx::Error),

    #[error("Failed to query {0}")]
    Query(String, #[source] sqlx::Error),

    #[error("Expected a frame with exactly one row, found {0}")]
    RowCount(usize),

    #[error("Failed reading values from the frame: {0}")]
    Frame(#[from] PolarsError),
}

/// Final outcome of a failed [`crate::store::persister::Persister::persist`].
#[derive(Debug, Error)]
pub enum PersistError {
    #[error("Unable to append the record for {date} after {attempts} attempts")]
    Exhausted {
        date: String,
        attempts: usize,
        #[source]
        last: StoreError,
    },
}
