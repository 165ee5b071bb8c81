//! In-memory stand-ins for the weather API and the destination store.

use crate::store::error::StoreError;
use crate::store::RecordStore;
use crate::types::ingestion_request::IngestionRequest;
use crate::types::weather_record::DATE_FIELD;
use crate::weather_api::client::WeatherSource;
use crate::weather_api::error::FetchError;
use async_trait::async_trait;
use polars::prelude::DataFrame;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

/// Fails a fixed number of times with HTTP 503, then returns `body` forever.
pub(crate) struct ScriptedSource {
    failures: Option<usize>,
    body: String,
    calls: AtomicUsize,
}

impl ScriptedSource {
    pub(crate) fn failing_then(failures: usize, body: String) -> Self {
        Self {
            failures: Some(failures),
            body,
            calls: AtomicUsize::new(0),
        }
    }

    pub(crate) fn always_failing() -> Self {
        Self {
            failures: None,
            body: String::new(),
            calls: AtomicUsize::new(0),
        }
    }

    pub(crate) fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl WeatherSource for ScriptedSource {
    async fn history(&self, _request: &IngestionRequest) -> Result<String, FetchError> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst);
        match self.failures {
            Some(failures) if call >= failures => Ok(self.body.clone()),
            _ => Err(FetchError::HttpStatus {
                status: reqwest::StatusCode::SERVICE_UNAVAILABLE,
            }),
        }
    }
}

#[derive(Default)]
struct StoreState {
    table_exists: bool,
    dates: Vec<String>,
    unreachable: bool,
    failing_appends: usize,
    append_calls: usize,
    chunk_queries: usize,
    schema_creations: usize,
}

/// A destination table kept in memory, recording only its `date` column.
#[derive(Default)]
pub(crate) struct InMemoryStore {
    state: Mutex<StoreState>,
}

impl InMemoryStore {
    /// A store whose table has not been created yet.
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// A store whose table exists and already holds `dates`.
    pub(crate) fn with_dates(dates: &[&str]) -> Self {
        let store = Self::default();
        {
            let mut state = store.state.lock().unwrap();
            state.table_exists = true;
            state.dates = dates.iter().map(|d| d.to_string()).collect();
        }
        store
    }

    pub(crate) fn set_unreachable(&self, unreachable: bool) {
        self.state.lock().unwrap().unreachable = unreachable;
    }

    pub(crate) fn fail_next_appends(&self, count: usize) {
        self.state.lock().unwrap().failing_appends = count;
    }

    pub(crate) fn dates(&self) -> Vec<String> {
        self.state.lock().unwrap().dates.clone()
    }

    pub(crate) fn append_calls(&self) -> usize {
        self.state.lock().unwrap().append_calls
    }

    pub(crate) fn chunk_queries(&self) -> usize {
        self.state.lock().unwrap().chunk_queries
    }

    pub(crate) fn schema_creations(&self) -> usize {
        self.state.lock().unwrap().schema_creations
    }
}

fn unreachable_error() -> StoreError {
    StoreError::Connect(sqlx::Error::PoolTimedOut)
}

#[async_trait]
impl RecordStore for InMemoryStore {
    async fn table_exists(&self) -> Result<bool, StoreError> {
        let state = self.state.lock().unwrap();
        if state.unreachable {
            return Err(unreachable_error());
        }
        Ok(state.table_exists)
    }

    async fn date_chunk(&self, offset: usize, limit: usize) -> Result<Vec<String>, StoreError> {
        let mut state = self.state.lock().unwrap();
        if state.unreachable {
            return Err(unreachable_error());
        }
        state.chunk_queries += 1;
        Ok(state.dates.iter().skip(offset).take(limit).cloned().collect())
    }

    async fn append(&self, frame: &DataFrame) -> Result<(), StoreError> {
        let mut state = self.state.lock().unwrap();
        state.append_calls += 1;
        if state.unreachable {
            return Err(unreachable_error());
        }
        if state.failing_appends > 0 {
            state.failing_appends -= 1;
            return Err(unreachable_error());
        }
        if !state.table_exists {
            state.schema_creations += 1;
            state.table_exists = true;
        }
        let date = frame
            .column(DATE_FIELD)?
            .str()?
            .get(0)
            .unwrap_or_default()
            .to_string();
        state.dates.push(date);
        Ok(())
    }
}
