//! Scalar functions used by the aggregation queries.
//!
//! The two pieces of row-level logic in the pipeline live here as DataFusion
//! scalar UDFs so they run inside the engine, against whole Arrow columns.

use chrono::NaiveDateTime;
use datafusion::arrow::array::{ArrayRef, StringArray};
use datafusion::arrow::datatypes::DataType;
use datafusion::common::cast::as_string_array;
use datafusion::error::Result as DfResult;
use datafusion::logical_expr::{create_udf, ColumnarValue, ScalarUDF, Volatility};
use regex::Regex;
use std::sync::{Arc, OnceLock};

/// Timestamp layouts accepted by [`hour_of_day`]. The `T`-separated form
/// appears when the CSV reader infers a timestamp column and the dataset
/// projection casts it back to text.
const TIMESTAMP_FORMATS: &[&str] = &["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f"];

fn hashtag_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"#(\w+)").expect("hashtag pattern is valid"))
}

/// First `#token` capture in the text, or the empty string when the text
/// contains no hashtag. Later hashtags in the same post are not counted.
fn extract_first_hashtag(text: &str) -> String {
    hashtag_pattern()
        .captures(text)
        .and_then(|captures| captures.get(1))
        .map(|token| token.as_str().to_string())
        .unwrap_or_default()
}

/// Zero-padded hour of day ("00".."23") parsed from a timestamp string, or
/// `None` when no accepted layout matches.
fn extract_hour(raw: &str) -> Option<String> {
    let raw = raw.trim();
    TIMESTAMP_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(raw, format).ok())
        .map(|timestamp| timestamp.format("%H").to_string())
}

/// `first_hashtag(text)` scalar UDF: first hashtag token of the input, empty
/// string when there is none, null in / null out. Callers lowercase the text
/// first so hashtag counting is case-insensitive.
pub fn first_hashtag() -> ScalarUDF {
    create_udf(
        "first_hashtag",
        vec![DataType::Utf8],
        DataType::Utf8,
        Volatility::Immutable,
        Arc::new(first_hashtag_impl),
    )
}

fn first_hashtag_impl(args: &[ColumnarValue]) -> DfResult<ColumnarValue> {
    let arrays = ColumnarValue::values_to_arrays(args)?;
    let texts = as_string_array(&arrays[0])?;

    let hashtags: StringArray = texts
        .iter()
        .map(|text| text.map(extract_first_hashtag))
        .collect();

    Ok(ColumnarValue::Array(Arc::new(hashtags) as ArrayRef))
}

/// `hour_of_day(created_at)` scalar UDF: zero-padded hour of the timestamp
/// string, null when the timestamp does not parse.
pub fn hour_of_day() -> ScalarUDF {
    create_udf(
        "hour_of_day",
        vec![DataType::Utf8],
        DataType::Utf8,
        Volatility::Immutable,
        Arc::new(hour_of_day_impl),
    )
}

fn hour_of_day_impl(args: &[ColumnarValue]) -> DfResult<ColumnarValue> {
    let arrays = ColumnarValue::values_to_arrays(args)?;
    let timestamps = as_string_array(&arrays[0])?;

    let hours: StringArray = timestamps
        .iter()
        .map(|timestamp| timestamp.and_then(extract_hour))
        .collect();

    Ok(ColumnarValue::Array(Arc::new(hours) as ArrayRef))
}

#[cfg(test)]
mod tests {
    use super::*;
    use datafusion::arrow::array::Array;

    #[test]
    fn test_extract_first_hashtag_only_first_counts() {
        assert_eq!(extract_first_hashtag("loving #sun today"), "sun");
        assert_eq!(extract_first_hashtag("#sun is great"), "sun");
        assert_eq!(extract_first_hashtag("#first then #second"), "first");
    }

    #[test]
    fn test_extract_first_hashtag_no_match_is_empty() {
        assert_eq!(extract_first_hashtag("no hashtags here"), "");
        assert_eq!(extract_first_hashtag(""), "");
        // A bare '#' with no word characters is not a hashtag
        assert_eq!(extract_first_hashtag("just a # sign"), "");
    }

    #[test]
    fn test_extract_first_hashtag_stops_at_non_word() {
        assert_eq!(extract_first_hashtag("ready for #summer2009!"), "summer2009");
        assert_eq!(extract_first_hashtag("#semi-final tonight"), "semi");
    }

    #[test]
    fn test_extract_hour_space_separated() {
        assert_eq!(extract_hour("2009-01-01 00:00:00").as_deref(), Some("00"));
        assert_eq!(extract_hour("2009-01-01 13:05:00").as_deref(), Some("13"));
    }

    #[test]
    fn test_extract_hour_t_separated() {
        assert_eq!(extract_hour("2009-01-01T23:59:59").as_deref(), Some("23"));
        assert_eq!(
            extract_hour("2009-01-01T07:00:00.123").as_deref(),
            Some("07")
        );
    }

    #[test]
    fn test_extract_hour_malformed_is_none() {
        assert_eq!(extract_hour("not a timestamp"), None);
        assert_eq!(extract_hour(""), None);
        assert_eq!(extract_hour("2009-13-45 99:00:00"), None);
    }

    #[test]
    fn test_first_hashtag_impl_preserves_nulls() {
        let texts = StringArray::from(vec![Some("go #rust"), None, Some("plain text")]);
        let args = [ColumnarValue::Array(Arc::new(texts) as ArrayRef)];

        let result = first_hashtag_impl(&args).unwrap();
        let ColumnarValue::Array(array) = result else {
            panic!("expected an array result");
        };
        let hashtags = array.as_any().downcast_ref::<StringArray>().unwrap();

        assert_eq!(hashtags.value(0), "rust");
        assert!(hashtags.is_null(1));
        assert_eq!(hashtags.value(2), "");
    }

    #[test]
    fn test_hour_of_day_impl_nulls_malformed_rows() {
        let timestamps = StringArray::from(vec![
            Some("2009-01-01 13:00:00"),
            Some("garbage"),
            None,
        ]);
        let args = [ColumnarValue::Array(Arc::new(timestamps) as ArrayRef)];

        let result = hour_of_day_impl(&args).unwrap();
        let ColumnarValue::Array(array) = result else {
            panic!("expected an array result");
        };
        let hours = array.as_any().downcast_ref::<StringArray>().unwrap();

        assert_eq!(hours.value(0), "13");
        assert!(hours.is_null(1));
        assert!(hours.is_null(2));
    }
}
