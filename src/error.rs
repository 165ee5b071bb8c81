use crate::settings::SettingsError;
use crate::store::error::{PersistError, StoreError};
use crate::validate::ValidationError;
use crate::weather_api::error::WeatherApiError;
use polars::error::PolarsError;
use thiserror::Error;

/// Every way an ingestion run can fail. All of them are fatal for the run.
///
/// An already-ingested date is not an error; see [`crate::IngestOutcome`].
#[derive(Debug, Error)]
pub enum IngestError {
    #[error(transparent)]
    InvalidDate(#[from] ValidationError),

    #[error(transparent)]
    Settings(#[from] SettingsError),

    #[error("Failed to check the destination for an existing record")]
    DuplicateCheck(#[source] StoreError),

    #[error(transparent)]
    WeatherApi(#[from] WeatherApiError),

    #[error("Failed to build the table row for the record")]
    Transform(#[from] PolarsError),

    #[error(transparent)]
    Persist(#[from] PersistError),
}
