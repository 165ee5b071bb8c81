use thiserror::Error;

/// A single failed attempt at getting a payload from the weather API.
///
/// Every variant is treated as transient by the [`crate::weather_api::fetcher::Fetcher`].
/// URLs are never included: they carry the API key as a query parameter.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Network request to the weather API failed")]
    NetworkRequest(#[source] reqwest::Error),

    #[error("Weather API answered with status {status}")]
    HttpStatus { status: reqwest::StatusCode },

    #[error("Failed to read the weather API response body")]
    Body(#[source] reqwest::Error),
}

/// The payload arrived but does not have the shape of a history response.
///
/// Not retried: asking again would return the same body.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ExtractError {
    #[error("Weather API response is not valid JSON: {0}")]
    InvalidJson(String),

    #[error("Weather API response has no forecast day")]
    MissingForecastDay,

    #[error("Required field '{0}' not found in the forecast day")]
    MissingField(&'static str),

    #[error("Field '{field}' has an unexpected type, expected {expected}")]
    UnexpectedType {
        field: &'static str,
        expected: &'static str,
    },
}

/// Final outcome of a failed [`crate::weather_api::fetcher::Fetcher::fetch`].
#[derive(Debug, Error)]
pub enum WeatherApiError {
    #[error("Unable to get data from the API after {attempts} attempts")]
    Exhausted {
        attempts: usize,
        #[source]
        last: FetchError,
    },

    #[error(transparent)]
    Extract(#[from] ExtractError),
}
