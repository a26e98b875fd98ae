//! `deserialize_with` helpers for numeric fields.
//!
//! Numbers may arrive as numeric strings (the logs encode `userId` that way).
//! JSON `null` counts as a missing field. A value that does not coerce is
//! reported with the field's name.

use serde::de::Error;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

fn describe(value: &Value) -> String {
    match value {
        Value::Null => "null".to_string(),
        Value::Bool(b) => format!("boolean {}", b),
        Value::Number(n) => format!("number {}", n),
        Value::String(s) => format!("string {:?}", s),
        Value::Array(_) => "array".to_string(),
        Value::Object(_) => "object".to_string(),
    }
}

fn to_integer(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64().or_else(|| {
            n.as_f64()
                .filter(|f| f.fract() == 0.0 && f.abs() < i64::MAX as f64)
                .map(|f| f as i64)
        }),
        Value::String(s) => s.trim().parse::<i64>().ok(),
        _ => None,
    }
}

fn to_number(value: &Value) -> Option<f64> {
    let parsed = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    parsed.filter(|f| f.is_finite())
}

fn integer<'de, D>(deserializer: D, field: &'static str) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    if value.is_null() {
        return Err(D::Error::missing_field(field));
    }
    to_integer(&value).ok_or_else(|| {
        D::Error::custom(format!(
            "field `{}` expected an integer, got {}",
            field,
            describe(&value)
        ))
    })
}

fn number<'de, D>(deserializer: D, field: &'static str) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    optional_number(deserializer, field)?.ok_or_else(|| D::Error::missing_field(field))
}

fn optional_number<'de, D>(deserializer: D, field: &'static str) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    if value.is_null() {
        return Ok(None);
    }
    to_number(&value).map(Some).ok_or_else(|| {
        D::Error::custom(format!(
            "field `{}` expected a number, got {}",
            field,
            describe(&value)
        ))
    })
}

macro_rules! named_field {
    ($name:ident, $parse:ident, $ty:ty, $field:literal) => {
        pub(super) fn $name<'de, D>(deserializer: D) -> Result<$ty, D::Error>
        where
            D: Deserializer<'de>,
        {
            $parse(deserializer, $field)
        }
    };
}

// Song files
named_field!(year, integer, i64, "year");
named_field!(duration, number, f64, "duration");
named_field!(artist_latitude, optional_number, Option<f64>, "artist_latitude");
named_field!(artist_longitude, optional_number, Option<f64>, "artist_longitude");

// Log files
named_field!(ts, integer, i64, "ts");
named_field!(user_id, integer, i64, "userId");
named_field!(length, number, f64, "length");
named_field!(session_id, integer, i64, "sessionId");
