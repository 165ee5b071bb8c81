//! A string wrapper for credentials that must never end up in logs.

use serde::Deserialize;
use std::fmt;

/// An opaque credential (API key, database password).
///
/// `Debug` and `Display` both print a fixed placeholder, so a `Secret` can sit inside
/// structs that derive `Debug` and be logged with them without leaking its value.
/// The inner value is only reachable through [`Secret::expose`].
///
/// # Examples
///
/// ```
/// use weather_ingest::Secret;
///
/// let key = Secret::new("abc123");
/// assert_eq!(format!("{key:?}"), "Secret(***)");
/// assert_eq!(key.expose(), "abc123");
/// ```
#[derive(Clone, PartialEq, Eq, Deserialize)]
#[serde(transparent)]
pub struct Secret(String);

impl Secret {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Returns the underlying credential. Only call this at the point of use.
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Secret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Secret(***)")
    }
}

impl fmt::Display for Secret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("***")
    }
}
