//! Reshapes a [`WeatherRecord`] into the one-row table the persister writes.

use crate::types::weather_record::{FieldValue, WeatherRecord};
use polars::prelude::*;

/// Converts `record` into a single-row `DataFrame`, one column per field.
///
/// Column names and values are taken verbatim; nothing is added, renamed or dropped.
/// Column dtypes follow the value: `Int64`, `Float64`, `Boolean` or `String`.
/// A null value becomes a null `Float64` cell: every metric of the day aggregate is
/// numeric, and the text fields the record carries are never null.
///
/// # Errors
///
/// Returns a [`PolarsError`] if the frame cannot be assembled.
pub fn record_to_frame(record: &WeatherRecord) -> PolarsResult<DataFrame> {
    let columns: Vec<Column> = record
        .iter()
        .map(|(name, value)| field_column(name, value))
        .collect();
    DataFrame::new(columns)
}

fn field_column(name: &str, value: &FieldValue) -> Column {
    let name: PlSmallStr = name.into();
    match value {
        FieldValue::Int(v) => Column::new(name, &[*v]),
        FieldValue::Float(v) => Column::new(name, &[*v]),
        FieldValue::Bool(v) => Column::new(name, &[*v]),
        FieldValue::Text(v) => Column::new(name, &[v.as_str()]),
        FieldValue::Null => Column::new(name, &[None::<f64>]),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::weather_api::extractor::extract_day_record;
    use crate::weather_api::extractor::tests::sample_body;

    #[test]
    fn test_frame_has_one_row_and_exactly_the_record_columns() -> PolarsResult<()> {
        let record = extract_day_record(&sample_body(), "2023-07-15").unwrap();
        let frame = record_to_frame(&record)?;

        assert_eq!(frame.height(), 1);
        let columns: Vec<&str> = frame
            .get_column_names()
            .into_iter()
            .map(|name| name.as_str())
            .collect();
        let fields: Vec<&str> = record.field_names().collect();
        assert_eq!(columns, fields);
        Ok(())
    }

    #[test]
    fn test_values_are_preserved() -> PolarsResult<()> {
        let record: WeatherRecord = [
            ("avghumidity".to_string(), FieldValue::Int(55)),
            ("condition".to_string(), FieldValue::Text("Sunny".into())),
            ("date".to_string(), FieldValue::Text("2023-07-15".into())),
            ("date_epoch".to_string(), FieldValue::Int(1689379200)),
            ("is_sunny".to_string(), FieldValue::Bool(true)),
            ("totalsnow_cm".to_string(), FieldValue::Null),
            ("uv".to_string(), FieldValue::Float(8.5)),
        ]
        .into_iter()
        .collect();

        let frame = record_to_frame(&record)?;

        assert_eq!(frame.width(), 7);
        assert_eq!(frame.column("avghumidity")?.i64()?.get(0), Some(55));
        assert_eq!(frame.column("condition")?.str()?.get(0), Some("Sunny"));
        assert_eq!(frame.column("date")?.str()?.get(0), Some("2023-07-15"));
        assert_eq!(frame.column("date_epoch")?.i64()?.get(0), Some(1689379200));
        assert_eq!(frame.column("is_sunny")?.bool()?.get(0), Some(true));
        assert_eq!(frame.column("totalsnow_cm")?.dtype(), &DataType::Float64);
        assert_eq!(frame.column("totalsnow_cm")?.f64()?.get(0), None);
        assert_eq!(frame.column("uv")?.f64()?.get(0), Some(8.5));
        Ok(())
    }

    #[test]
    fn test_empty_record_gives_empty_frame() -> PolarsResult<()> {
        let frame = record_to_frame(&WeatherRecord::new())?;
        assert_eq!(frame.width(), 0);
        Ok(())
    }
}
