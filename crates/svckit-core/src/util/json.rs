//! JSON (de)serialization helpers with a fixed configuration.
//!
//! Chrono types serialize as formatted strings (chrono's serde default),
//! never as numeric timestamps, and unknown fields are ignored on
//! deserialization. Fallible operations return a system error; the validity
//! check never raises.

use crate::SvcResult;
use serde::de::DeserializeOwned;
use serde::Serialize;

/// Serializes a value to a compact JSON string.
pub fn to_json<T: Serialize>(value: &T) -> SvcResult<String> {
    Ok(serde_json::to_string(value)?)
}

/// Serializes a value to a pretty-printed JSON string.
pub fn to_pretty_json<T: Serialize>(value: &T) -> SvcResult<String> {
    Ok(serde_json::to_string_pretty(value)?)
}

/// Deserializes a value from a JSON string. Unknown fields are ignored.
pub fn from_json<T: DeserializeOwned>(json: &str) -> SvcResult<T> {
    Ok(serde_json::from_str(json)?)
}

/// Converts between two structurally compatible shapes via the JSON data
/// model, without producing an intermediate string.
pub fn convert<T, U>(value: &T) -> SvcResult<U>
where
    T: Serialize,
    U: DeserializeOwned,
{
    let intermediate = serde_json::to_value(value)?;
    Ok(serde_json::from_value(intermediate)?)
}

/// Whether the input is well-formed JSON. Returns `false`, never an error,
/// for malformed input.
#[must_use]
pub fn is_valid_json(json: &str) -> bool {
    serde_json::from_str::<serde_json::Value>(json).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use serde::Deserialize;

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Event {
        name: String,
        day: NaiveDate,
    }

    #[derive(Debug, PartialEq, Deserialize)]
    struct EventName {
        name: String,
    }

    #[test]
    fn serializes_dates_as_formatted_strings() {
        let event = Event {
            name: "launch".to_string(),
            day: NaiveDate::from_ymd_opt(2024, 5, 1).unwrap(),
        };
        let json = to_json(&event).unwrap();
        assert!(json.contains("\"2024-05-01\""));
    }

    #[test]
    fn round_trips_typed_values() {
        let event = Event {
            name: "launch".to_string(),
            day: NaiveDate::from_ymd_opt(2024, 5, 1).unwrap(),
        };
        let parsed: Event = from_json(&to_json(&event).unwrap()).unwrap();
        assert_eq!(parsed, event);
    }

    #[test]
    fn unknown_fields_are_ignored() {
        let parsed: EventName =
            from_json(r#"{"name":"launch","extra":true,"more":[1,2]}"#).unwrap();
        assert_eq!(parsed.name, "launch");
    }

    #[test]
    fn pretty_printing_emits_newlines() {
        let json = to_pretty_json(&serde_json::json!({"a": 1, "b": 2})).unwrap();
        assert!(json.contains('\n'));
    }

    #[test]
    fn converts_between_compatible_shapes() {
        let event = Event {
            name: "launch".to_string(),
            day: NaiveDate::from_ymd_opt(2024, 5, 1).unwrap(),
        };
        let narrowed: EventName = convert(&event).unwrap();
        assert_eq!(narrowed.name, "launch");
    }

    #[test]
    fn validity_check_never_raises() {
        assert!(is_valid_json(r#"{"a": 1}"#));
        assert!(is_valid_json("[1, 2, 3]"));
        assert!(!is_valid_json(r#"{"a":"#));
        assert!(!is_valid_json(""));
        assert!(!is_valid_json("{invalid}"));
    }
}
