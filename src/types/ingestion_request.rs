//! Defines the `IngestionRequest`, the validated input of one ingestion run.

use crate::types::secret::Secret;
use crate::validate::{validate_date, ValidationError, DATE_FORMAT};
use chrono::NaiveDate;

/// What to ingest: one calendar day of weather for one location.
///
/// Construction goes through [`IngestionRequest::new`], which validates the date, so a
/// value of this type always carries a real `YYYY-MM-DD` date. The location is passed
/// through to the weather API as-is.
#[derive(Debug, Clone, PartialEq)]
pub struct IngestionRequest {
    api_key: Secret,
    location: String,
    date: NaiveDate,
}

impl IngestionRequest {
    /// Builds a request, rejecting any `date` that is not strictly `YYYY-MM-DD`.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::MalformedDate`] when the date fails validation.
    pub fn new(
        api_key: Secret,
        location: impl Into<String>,
        date: &str,
    ) -> Result<Self, ValidationError> {
        let date = validate_date(date)?;
        Ok(Self {
            api_key,
            location: location.into(),
            date,
        })
    }

    pub fn api_key(&self) -> &Secret {
        &self.api_key
    }

    pub fn location(&self) -> &str {
        &self.location
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    /// The date rendered the way it is sent to the API and stored in the `date` column.
    pub fn date_string(&self) -> String {
        self.date.format(DATE_FORMAT).to_string()
    }
}
