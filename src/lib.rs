mod error;
mod pipeline;
mod retry;
mod settings;
mod store;
mod transform;
mod types;
mod utils;
mod validate;
mod weather_api;

#[cfg(test)]
mod testing;

pub use error::IngestError;
pub use pipeline::*;

pub use retry::*;
pub use settings::*;
pub use utils::default_settings_path;
pub use validate::{validate_date, ValidationError, DATE_FORMAT};

pub use types::ingestion_request::IngestionRequest;
pub use types::secret::Secret;
pub use types::weather_record::*;

pub use transform::record_to_frame;

pub use weather_api::client::{
    WeatherApiClient, WeatherSource, DEFAULT_HISTORY_URL, DEFAULT_REQUEST_TIMEOUT,
};
pub use weather_api::error::{ExtractError, FetchError, WeatherApiError};
pub use weather_api::extractor::{extract_day_record, PRUNED_FIELDS};
pub use weather_api::fetcher::Fetcher;

pub use store::error::{PersistError, StoreError};
pub use store::guard::{DuplicateGuard, GuardDecision, DEFAULT_SCAN_CHUNK_SIZE};
pub use store::persister::Persister;
pub use store::postgres::PostgresStore;
pub use store::RecordStore;
