//! Contains `WeatherRecord`, the flattened day-aggregate observation that gets persisted.

use std::collections::btree_map::{self, BTreeMap};
use std::fmt;

/// Column holding the ISO date string; the natural key of the destination table.
pub const DATE_FIELD: &str = "date";
/// Column holding the Unix timestamp (seconds) of the observation day.
pub const DATE_EPOCH_FIELD: &str = "date_epoch";
/// Column holding the flattened condition description.
pub const CONDITION_FIELD: &str = "condition";

/// A single scalar value of a [`WeatherRecord`] field.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Int(i64),
    Float(f64),
    Bool(bool),
    Text(String),
    /// The API reported the field but without a value.
    Null,
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Int(v) => write!(f, "{v}"),
            FieldValue::Float(v) => write!(f, "{v}"),
            FieldValue::Bool(v) => write!(f, "{v}"),
            FieldValue::Text(v) => write!(f, "{v}"),
            FieldValue::Null => f.write_str("null"),
        }
    }
}

/// One day of weather for one location, as a flat field-name → scalar mapping.
///
/// Built once per run by the fetcher (see [`crate::weather_api::extractor`]), which
/// guarantees that `date`, `date_epoch` and `condition` are present. Fields iterate in
/// name order so the derived table layout is stable between runs.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct WeatherRecord {
    fields: BTreeMap<String, FieldValue>,
}

impl WeatherRecord {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets a field, replacing any previous value under the same name.
    pub fn insert(&mut self, name: impl Into<String>, value: FieldValue) {
        self.fields.insert(name.into(), value);
    }

    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.fields.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.fields.contains_key(name)
    }

    /// The ISO date this record belongs to, if the `date` field is set.
    pub fn date(&self) -> Option<&str> {
        match self.fields.get(DATE_FIELD) {
            Some(FieldValue::Text(date)) => Some(date),
            _ => None,
        }
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    pub fn iter(&self) -> btree_map::Iter<'_, String, FieldValue> {
        self.fields.iter()
    }
}

impl<'a> IntoIterator for &'a WeatherRecord {
    type Item = (&'a String, &'a FieldValue);
    type IntoIter = btree_map::Iter<'a, String, FieldValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl FromIterator<(String, FieldValue)> for WeatherRecord {
    fn from_iter<I: IntoIterator<Item = (String, FieldValue)>>(iter: I) -> Self {
        Self {
            fields: iter.into_iter().collect(),
        }
    }
}
