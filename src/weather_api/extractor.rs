//! Turns a weatherapi.com history response into a flat [`WeatherRecord`].

use crate::types::weather_record::{
    FieldValue, WeatherRecord, CONDITION_FIELD, DATE_EPOCH_FIELD, DATE_FIELD,
};
use crate::weather_api::error::ExtractError;
use log::debug;
use serde_json::{Map, Value};

/// Day-aggregate fields that only repeat another field in imperial units.
///
/// They are removed from the record entirely, whether or not the API sent them.
pub const PRUNED_FIELDS: [&str; 6] = [
    "maxtemp_f",
    "mintemp_f",
    "avgtemp_f",
    "maxwind_mph",
    "totalprecip_in",
    "avgvis_miles",
];

/// Parses `body` and extracts the day aggregate of the first forecast day.
///
/// The result contains every field of `forecast.forecastday[0].day` except
/// [`PRUNED_FIELDS`], with `condition` flattened to its `text`, plus `date` (the requested
/// date, as given) and `date_epoch` (taken from the forecast day).
///
/// # Errors
///
/// Returns an [`ExtractError`] when the body is not JSON or lacks any of the pieces above.
pub fn extract_day_record(body: &str, date: &str) -> Result<WeatherRecord, ExtractError> {
    let payload: Value =
        serde_json::from_str(body).map_err(|e| ExtractError::InvalidJson(e.to_string()))?;

    let forecast_day = payload
        .get("forecast")
        .and_then(|f| f.get("forecastday"))
        .and_then(Value::as_array)
        .and_then(|days| days.first())
        .ok_or(ExtractError::MissingForecastDay)?;

    let day = match forecast_day.get("day") {
        Some(Value::Object(day)) => day,
        Some(_) => {
            return Err(ExtractError::UnexpectedType {
                field: "day",
                expected: "object",
            })
        }
        None => return Err(ExtractError::MissingField("day")),
    };

    let date_epoch = match forecast_day.get("date_epoch") {
        Some(value) => value.as_i64().ok_or(ExtractError::UnexpectedType {
            field: DATE_EPOCH_FIELD,
            expected: "integer",
        })?,
        None => return Err(ExtractError::MissingField(DATE_EPOCH_FIELD)),
    };

    let mut record = flatten_day(day)?;
    record.insert(DATE_FIELD, FieldValue::Text(date.to_string()));
    record.insert(DATE_EPOCH_FIELD, FieldValue::Int(date_epoch));

    debug!("Extracted {} fields for {}", record.len(), date);
    Ok(record)
}

fn flatten_day(day: &Map<String, Value>) -> Result<WeatherRecord, ExtractError> {
    let mut record = WeatherRecord::new();

    for (name, value) in day {
        if PRUNED_FIELDS.contains(&name.as_str()) {
            continue;
        }
        if name == CONDITION_FIELD {
            continue;
        }
        record.insert(name.clone(), to_field_value(value));
    }

    let condition = day
        .get(CONDITION_FIELD)
        .ok_or(ExtractError::MissingField(CONDITION_FIELD))?;
    let text = condition
        .get("text")
        .and_then(Value::as_str)
        .ok_or(ExtractError::UnexpectedType {
            field: CONDITION_FIELD,
            expected: "object with a 'text' string",
        })?;
    record.insert(CONDITION_FIELD, FieldValue::Text(text.to_string()));

    Ok(record)
}

fn to_field_value(value: &Value) -> FieldValue {
    match value {
        Value::Null => FieldValue::Null,
        Value::Bool(b) => FieldValue::Bool(*b),
        // Metrics are floats whatever the JSON spelling, so `55` on one day and `55.5`
        // on the next land in the same column type.
        Value::Number(n) => FieldValue::Float(n.as_f64().unwrap_or(f64::NAN)),
        Value::String(s) => FieldValue::Text(s.clone()),
        // Nested values other than `condition` are kept as their JSON text.
        other => FieldValue::Text(other.to_string()),
    }
}
