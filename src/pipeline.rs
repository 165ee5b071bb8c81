//! The ingestion pipeline: duplicate check, fetch, transform, persist.

use crate::error::IngestError;
use crate::retry::{RetryPolicy, FETCH_RETRY, PERSIST_RETRY};
use crate::store::guard::{DuplicateGuard, GuardDecision, DEFAULT_SCAN_CHUNK_SIZE};
use crate::store::persister::Persister;
use crate::store::RecordStore;
use crate::transform::record_to_frame;
use crate::types::ingestion_request::IngestionRequest;
use crate::weather_api::client::WeatherSource;
use crate::weather_api::fetcher::Fetcher;
use bon::bon;
use log::info;
use std::sync::Arc;

/// How a successful run ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IngestOutcome {
    /// The date was already in the destination; nothing was fetched or written.
    AlreadyIngested { date: String },
    /// The record was fetched and appended.
    Persisted { date: String },
}

/// Runs one ingestion, strictly in sequence.
///
/// The request date is validated when the [`IngestionRequest`] is built, so by the time
/// it reaches [`Ingestor::ingest`] only the store and the API remain to be consulted.
/// The duplicate check comes first so that an already-ingested date costs no API call.
///
/// # Examples
///
/// ```no_run
/// use std::path::Path;
/// use std::sync::Arc;
/// use weather_ingest::{
///     IngestionRequest, Ingestor, PostgresStore, Secret, Settings, WeatherApiClient,
/// };
///
/// # #[tokio::main]
/// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let settings = Settings::load(Path::new("settings.json")).await?;
/// let ingestor = Ingestor::builder()
///     .source(Arc::new(WeatherApiClient::new(settings.api.base_url.clone())))
///     .store(Arc::new(PostgresStore::new(&settings.database)))
///     .fetch_retry(settings.fetch_retry())
///     .build();
///
/// let request = IngestionRequest::new(Secret::new("my-key"), "Lisbon", "2023-07-15")?;
/// let outcome = ingestor.ingest(&request).await?;
/// println!("{outcome:?}");
/// # Ok(())
/// # }
/// ```
pub struct Ingestor {
    guard: DuplicateGuard,
    fetcher: Fetcher,
    persister: Persister,
}

#[bon]
impl Ingestor {
    /// Wires the pipeline. Retry policies and the scan chunk size default to
    /// [`FETCH_RETRY`], [`PERSIST_RETRY`] and [`DEFAULT_SCAN_CHUNK_SIZE`].
    #[builder]
    pub fn new(
        source: Arc<dyn WeatherSource>,
        store: Arc<dyn RecordStore>,
        #[builder(default = FETCH_RETRY)] fetch_retry: RetryPolicy,
        #[builder(default = PERSIST_RETRY)] persist_retry: RetryPolicy,
        #[builder(default = DEFAULT_SCAN_CHUNK_SIZE)] scan_chunk_size: usize,
    ) -> Self {
        Self {
            guard: DuplicateGuard::with_chunk_size(store.clone(), scan_chunk_size),
            fetcher: Fetcher::with_policy(source, fetch_retry),
            persister: Persister::with_policy(store, persist_retry),
        }
    }

    /// Ingests the day described by `request`, exactly once.
    ///
    /// # Errors
    ///
    /// * [`IngestError::DuplicateCheck`] if the destination cannot be scanned.
    /// * [`IngestError::WeatherApi`] if the API stays unavailable or answers garbage.
    /// * [`IngestError::Transform`] if the record cannot be laid out as a row.
    /// * [`IngestError::Persist`] if the row cannot be written within the retry budget.
    ///
    /// Nothing is written unless every earlier step succeeded.
    pub async fn ingest(&self, request: &IngestionRequest) -> Result<IngestOutcome, IngestError> {
        let date = request.date_string();
        info!("Ingesting weather for '{}' on {}", request.location(), date);

        let decision = self
            .guard
            .check(&date)
            .await
            .map_err(IngestError::DuplicateCheck)?;
        if decision == GuardDecision::AlreadyIngested {
            info!("{} is already stored, nothing to do", date);
            return Ok(IngestOutcome::AlreadyIngested { date });
        }

        let record = self.fetcher.fetch(request).await?;
        let frame = record_to_frame(&record)?;
        self.persister.persist(&date, &frame).await?;

        info!("Successfully appended the weather record for {}", date);
        Ok(IngestOutcome::Persisted { date })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::error::PersistError;
    use crate::testing::{InMemoryStore, ScriptedSource};
    use crate::types::secret::Secret;
    use crate::weather_api::error::WeatherApiError;
    use crate::weather_api::extractor::tests::sample_body;

    fn request(date: &str) -> IngestionRequest {
        IngestionRequest::new(Secret::new("key"), "Lisbon", date).unwrap()
    }

    fn ingestor(source: &Arc<ScriptedSource>, store: &Arc<InMemoryStore>) -> Ingestor {
        Ingestor::builder()
            .source(source.clone())
            .store(store.clone())
            .build()
    }

    #[tokio::test(start_paused = true)]
    async fn test_ingest_fetches_and_persists_new_date() {
        let source = Arc::new(ScriptedSource::failing_then(0, sample_body()));
        let store = Arc::new(InMemoryStore::with_dates(&["2023-07-14"]));

        let outcome = ingestor(&source, &store)
            .ingest(&request("2023-07-15"))
            .await
            .unwrap();

        assert_eq!(
            outcome,
            IngestOutcome::Persisted {
                date: "2023-07-15".to_string()
            }
        );
        assert_eq!(source.calls(), 1);
        assert_eq!(store.dates(), vec!["2023-07-14", "2023-07-15"]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_already_ingested_date_is_a_silent_no_op() {
        let source = Arc::new(ScriptedSource::failing_then(0, sample_body()));
        let store = Arc::new(InMemoryStore::with_dates(&["2023-07-15"]));

        let outcome = ingestor(&source, &store)
            .ingest(&request("2023-07-15"))
            .await
            .unwrap();

        assert!(matches!(outcome, IngestOutcome::AlreadyIngested { .. }));
        assert_eq!(source.calls(), 0);
        assert_eq!(store.append_calls(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_second_run_for_same_date_short_circuits() {
        let source = Arc::new(ScriptedSource::failing_then(0, sample_body()));
        let store = Arc::new(InMemoryStore::new());
        let ingestor = ingestor(&source, &store);

        let first = ingestor.ingest(&request("2023-07-15")).await.unwrap();
        let second = ingestor.ingest(&request("2023-07-15")).await.unwrap();

        assert!(matches!(first, IngestOutcome::Persisted { .. }));
        assert!(matches!(second, IngestOutcome::AlreadyIngested { .. }));
        assert_eq!(source.calls(), 1);
        assert_eq!(store.append_calls(), 1);
        assert_eq!(store.dates(), vec!["2023-07-15"]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_fetch_exhaustion_never_reaches_the_store() {
        let source = Arc::new(ScriptedSource::always_failing());
        let store = Arc::new(InMemoryStore::new());

        let err = ingestor(&source, &store)
            .ingest(&request("2023-07-15"))
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            IngestError::WeatherApi(WeatherApiError::Exhausted { attempts: 6, .. })
        ));
        assert_eq!(source.calls(), 6);
        assert_eq!(store.append_calls(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_duplicate_check_failure_is_fatal_and_not_retried() {
        let source = Arc::new(ScriptedSource::failing_then(0, sample_body()));
        let store = Arc::new(InMemoryStore::with_dates(&[]));
        store.set_unreachable(true);

        let err = ingestor(&source, &store)
            .ingest(&request("2023-07-15"))
            .await
            .unwrap_err();

        assert!(matches!(err, IngestError::DuplicateCheck(_)));
        assert_eq!(source.calls(), 0);
        assert_eq!(store.append_calls(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_persist_exhaustion_reports_the_date() {
        let source = Arc::new(ScriptedSource::failing_then(0, sample_body()));
        let store = Arc::new(InMemoryStore::new());
        store.fail_next_appends(usize::MAX);

        let err = ingestor(&source, &store)
            .ingest(&request("2023-07-15"))
            .await
            .unwrap_err();

        match err {
            IngestError::Persist(PersistError::Exhausted { date, attempts, .. }) => {
                assert_eq!(date, "2023-07-15");
                assert_eq!(attempts, 6);
            }
            other => panic!("unexpected error: {other}"),
        }
        assert!(store.dates().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_builder_accepts_custom_policies() {
        let source = Arc::new(ScriptedSource::always_failing());
        let store = Arc::new(InMemoryStore::new());
        let ingestor = Ingestor::builder()
            .source(source.clone())
            .store(store.clone())
            .fetch_retry(RetryPolicy::new(2, std::time::Duration::from_secs(1)))
            .scan_chunk_size(10)
            .build();

        let err = ingestor.ingest(&request("2023-07-15")).await.unwrap_err();

        assert!(matches!(
            err,
            IngestError::WeatherApi(WeatherApiError::Exhausted { attempts: 2, .. })
        ));
        assert_eq!(source.calls(), 2);
    }
}
