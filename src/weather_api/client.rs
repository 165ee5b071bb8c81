//! HTTP access to the weatherapi.com history endpoint.

use crate::types::ingestion_request::IngestionRequest;
use crate::weather_api::error::FetchError;
use async_trait::async_trait;
use log::{debug, warn};
use reqwest::Client;
use std::time::Duration;

/// History endpoint of weatherapi.com.
pub const DEFAULT_HISTORY_URL: &str = "http://api.weatherapi.com/v1/history.json";
/// Upper bound on one request, connection and body included. A stalled request fails
/// with a transport error and goes through the fetcher's retry policy like any other.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

/// Something that can make one attempt at fetching a day of weather history.
///
/// Implementations return the raw response body of a successful request. They must not
/// retry on their own; the [`crate::weather_api::fetcher::Fetcher`] owns the retry policy.
#[async_trait]
pub trait WeatherSource: Send + Sync {
    async fn history(&self, request: &IngestionRequest) -> Result<String, FetchError>;
}

pub struct WeatherApiClient {
    history_url: String,
    timeout: Duration,
    http: Client,
}

impl WeatherApiClient {
    pub fn new(history_url: impl Into<String>) -> Self {
        Self {
            history_url: history_url.into(),
            timeout: DEFAULT_REQUEST_TIMEOUT,
            http: Client::new(),
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

impl Default for WeatherApiClient {
    fn default() -> Self {
        Self::new(DEFAULT_HISTORY_URL)
    }
}

#[async_trait]
impl WeatherSource for WeatherApiClient {
    async fn history(&self, request: &IngestionRequest) -> Result<String, FetchError> {
        let date = request.date_string();
        debug!(
            "Requesting weather history for '{}' on {} from {}",
            request.location(),
            date,
            self.history_url
        );

        // A fresh request per attempt; reqwest errors carry the full URL, key included,
        // so it is stripped before the error goes anywhere.
        let response = self
            .http
            .get(&self.history_url)
            .timeout(self.timeout)
            .query(&[
                ("key", request.api_key().expose()),
                ("q", request.location()),
                ("dt", date.as_str()),
            ])
            .send()
            .await
            .map_err(|e| FetchError::NetworkRequest(e.without_url()))?;

        let status = response.status();
        if !status.is_success() {
            warn!("Weather API returned HTTP {} for {}", status, date);
            return Err(FetchError::HttpStatus { status });
        }

        response
            .text()
            .await
            .map_err(|e| FetchError::Body(e.without_url()))
    }
}
