//! Total conversions from loosely typed filter input into filter values.
//!
//! # Invariants
//! - Absent, `null` and empty-string input always yield `None`.
//! - Conversions never panic.

use chrono::{DateTime, NaiveDate};
use serde_json::Value;

/// Switches for [`cast`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CastOptions {
    /// Keep `"true"`/`"false"` strings as strings instead of booleans.
    pub dont_parse_boolean_string: bool,
}

impl CastOptions {
    pub const KEEP_STRINGS: Self = Self {
        dont_parse_boolean_string: true,
    };
}

/// Converts a raw value with `converter`, propagating absence.
///
/// Boolean strings are matched case-insensitively and handed to the
/// converter as JSON booleans unless `options` says otherwise.
pub fn cast<K, F>(raw: Option<&Value>, converter: F, options: CastOptions) -> Option<K>
where
    F: FnOnce(Value) -> K,
{
    let value = raw?;
    match value {
        Value::Null => return None,
        Value::String(text) if text.is_empty() => return None,
        _ => {}
    }

    if !options.dont_parse_boolean_string {
        if let Value::String(text) = value {
            if text.eq_ignore_ascii_case("true") {
                return Some(converter(Value::Bool(true)));
            }
            if text.eq_ignore_ascii_case("false") {
                return Some(converter(Value::Bool(false)));
            }
        }
    }

    Some(converter(value.clone()))
}

/// Identity converter for [`cast`].
pub fn identity(value: Value) -> Value {
    value
}

/// Reads `"1"` and `"true"` as true; everything else, including absence, is false.
pub fn boolean_string(value: Option<&str>) -> bool {
    matches!(value, Some("1") | Some("true"))
}

/// Normalizes a timestamp filter value into epoch milliseconds.
///
/// Accepts integers, numeric strings, RFC 3339 timestamps and plain
/// `YYYY-MM-DD` dates (UTC midnight). Anything else yields `None` so the
/// filter entry is dropped instead of matching nothing.
pub fn to_epoch_millis(value: Value) -> Option<Value> {
    match value {
        Value::Number(number) => number.as_i64().map(Value::from),
        Value::String(text) => parse_timestamp(text.trim()).map(Value::from),
        _ => None,
    }
}

fn parse_timestamp(text: &str) -> Option<i64> {
    if let Ok(millis) = text.parse::<i64>() {
        return Some(millis);
    }
    if let Ok(moment) = DateTime::parse_from_rfc3339(text) {
        return Some(moment.timestamp_millis());
    }
    NaiveDate::parse_from_str(text, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|midnight| midnight.and_utc().timestamp_millis())
}

#[cfg(test)]
mod tests {
    use super::{boolean_string, cast, identity, to_epoch_millis, CastOptions};
    use serde_json::{json, Value};

    #[test]
    fn absent_null_and_empty_string_propagate_absence() {
        let null = Value::Null;
        let empty = json!("");
        for raw in [None, Some(&null), Some(&empty)] {
            let converted: Option<Value> = cast(raw, |_| json!("called"), CastOptions::default());
            assert_eq!(converted, None);
        }
    }

    #[test]
    fn boolean_strings_become_booleans_case_insensitively() {
        let upper = json!("FALSE");
        let lower = json!("true");

        assert_eq!(
            cast(Some(&lower), identity, CastOptions::default()),
            Some(json!(true))
        );
        assert_eq!(
            cast(Some(&upper), identity, CastOptions::default()),
            Some(json!(false))
        );
    }

    #[test]
    fn boolean_parsing_can_be_disabled() {
        let raw = json!("True");
        assert_eq!(
            cast(Some(&raw), identity, CastOptions::KEEP_STRINGS),
            Some(json!("True"))
        );
    }

    #[test]
    fn other_values_go_straight_to_converter() {
        let raw = json!(41);
        let converted = cast(
            Some(&raw),
            |value| value.as_i64().unwrap_or_default() + 1,
            CastOptions::default(),
        );
        assert_eq!(converted, Some(42));
    }

    #[test]
    fn boolean_string_accepts_one_and_true_only() {
        assert!(boolean_string(Some("1")));
        assert!(boolean_string(Some("true")));
        assert!(!boolean_string(Some("TRUE")));
        assert!(!boolean_string(Some("0")));
        assert!(!boolean_string(None));
    }

    #[test]
    fn epoch_millis_parses_numbers_and_numeric_strings() {
        assert_eq!(
            to_epoch_millis(json!(1_700_000_000_000_i64)),
            Some(json!(1_700_000_000_000_i64))
        );
        assert_eq!(to_epoch_millis(json!(" 1700 ")), Some(json!(1700)));
        assert_eq!(
            to_epoch_millis(json!("2024-01-16")),
            Some(json!(1_705_363_200_000_i64))
        );
        assert_eq!(
            to_epoch_millis(json!("2024-01-16T00:00:01.500Z")),
            Some(json!(1_705_363_201_500_i64))
        );
        assert_eq!(to_epoch_millis(json!("yesterday")), None);
        assert_eq!(to_epoch_millis(json!(true)), None);
    }
}
