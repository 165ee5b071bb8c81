//! Validation of the requested ingestion date.

use chrono::NaiveDate;
use thiserror::Error;

/// The only date layout accepted on input.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Incorrect forecast date format, should be YYYY-MM-DD (got '{0}')")]
    MalformedDate(String),
}

/// Checks that `date` is a real calendar date written exactly as `YYYY-MM-DD`.
///
/// chrono alone would also accept unpadded fields such as `2023-1-5` or a signed year,
/// so the shape is checked first: ten ASCII characters, dashes at positions 4 and 7,
/// digits everywhere else. The calendar check (month range, day-of-month, leap years)
/// is then left to chrono.
///
/// # Errors
///
/// Returns [`ValidationError::MalformedDate`] for anything else, including valid dates
/// written in another format.
///
/// # Examples
///
/// ```
/// use weather_ingest::validate_date;
///
/// assert!(validate_date("2024-02-29").is_ok());
/// assert!(validate_date("2023-02-29").is_err());
/// assert!(validate_date("29/02/2024").is_err());
/// ```
pub fn validate_date(date: &str) -> Result<NaiveDate, ValidationError> {
    let malformed = || ValidationError::MalformedDate(date.to_string());

    let bytes = date.as_bytes();
    if bytes.len() != 10 {
        return Err(malformed());
    }
    let shape_ok = bytes.iter().enumerate().all(|(i, b)| match i {
        4 | 7 => *b == b'-',
        _ => b.is_ascii_digit(),
    });
    if !shape_ok {
        return Err(malformed());
    }

    NaiveDate::parse_from_str(date, DATE_FORMAT).map_err(|_| malformed())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_well_formed_dates() {
        for date in ["2023-07-15", "2024-02-29", "1999-12-31", "2000-01-01"] {
            let parsed = validate_date(date).unwrap();
            assert_eq!(parsed.format(DATE_FORMAT).to_string(), date);
        }
    }

    #[test]
    fn test_rejects_wrong_separators() {
        for date in ["2023/07/15", "2023.07.15", "2023_07_15", "20230715"] {
            assert!(validate_date(date).is_err(), "{date} should be rejected");
        }
    }

    #[test]
    fn test_rejects_impossible_calendar_dates() {
        for date in ["2023-13-01", "2023-00-10", "2023-02-29", "2023-04-31", "2023-01-00"] {
            assert!(validate_date(date).is_err(), "{date} should be rejected");
        }
    }

    #[test]
    fn test_rejects_other_layouts_of_valid_dates() {
        for date in ["2023-7-15", "15-07-2023", "07/15/2023", " 2023-07-15", "2023-07-15T00:00"] {
            assert!(validate_date(date).is_err(), "{date} should be rejected");
        }
    }

    #[test]
    fn test_rejects_non_date_text() {
        assert_eq!(
            validate_date("yesterday"),
            Err(ValidationError::MalformedDate("yesterday".to_string()))
        );
        assert!(validate_date("").is_err());
        assert!(validate_date("abcd-ef-gh").is_err());
    }
}
