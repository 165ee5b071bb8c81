use crate::retry::{RetryPolicy, FETCH_RETRY};
use crate::types::ingestion_request::IngestionRequest;
use crate::types::weather_record::WeatherRecord;
use crate::weather_api::client::WeatherSource;
use crate::weather_api::error::{FetchError, WeatherApiError};
use crate::weather_api::extractor::extract_day_record;
use log::{info, warn};
use std::sync::Arc;

/// Fetches one day of weather, retrying transient failures with a flat backoff.
pub struct Fetcher {
    source: Arc<dyn WeatherSource>,
    policy: RetryPolicy,
}

impl Fetcher {
    pub fn new(source: Arc<dyn WeatherSource>) -> Self {
        Self::with_policy(source, FETCH_RETRY)
    }

    pub fn with_policy(source: Arc<dyn WeatherSource>, policy: RetryPolicy) -> Self {
        Self { source, policy }
    }

    /// Requests the history for `request` and extracts its day record.
    ///
    /// Any [`FetchError`] (transport failure or non-success status) is retried after
    /// `policy.backoff`, up to `policy.max_attempts` attempts in total. The wait blocks
    /// the caller; nothing else happens meanwhile. Once a success status comes back, the
    /// body is extracted and the result returned as-is: extraction errors are not retried.
    ///
    /// # Errors
    ///
    /// * [`WeatherApiError::Exhausted`] when every attempt failed.
    /// * [`WeatherApiError::Extract`] when the successful response is malformed.
    pub async fn fetch(&self, request: &IngestionRequest) -> Result<WeatherRecord, WeatherApiError> {
        let date = request.date_string();
        let mut attempt = 1;

        let body = loop {
            match self.source.history(request).await {
                Ok(body) => break body,
                Err(e) => {
                    if !self.policy.has_next(attempt) {
                        warn!(
                            "Attempt {}/{} to get data from the API failed: {}. No attempts left",
                            attempt, self.policy.max_attempts, e
                        );
                        return Err(WeatherApiError::Exhausted {
                            attempts: attempt,
                            last: e,
                        });
                    }
                    self.log_retry(attempt, &e);
                    tokio::time::sleep(self.policy.backoff).await;
                    attempt += 1;
                }
            }
        };

        info!(
            "Got weather data for '{}' on {} (attempt {}/{})",
            request.location(),
            date,
            attempt,
            self.policy.max_attempts
        );
        Ok(extract_day_record(&body, &date)?)
    }

    fn log_retry(&self, attempt: usize, error: &FetchError) {
        warn!(
            "Attempt {}/{} to get data from the API failed: {}. Retrying in {} seconds",
            attempt,
            self.policy.max_attempts,
            error,
            self.policy.backoff.as_secs()
        );
    }
}
