//! Field decoders for the quirks of the AREDN `sysinfo.json` format
//!
//! Node firmware encodes some booleans and integers as strings, and omits or
//! nulls out whole sections depending on version. These helpers are used at
//! the deserialization boundary so the rest of the crate sees plain types.

use serde::de::{self, Deserializer};
use serde::{Deserialize, Serializer};
use serde_json::Value;

/// Decodes `mesh_gateway`: only the string `"1"` (or the bare number 1) is true
///
/// Anything else, including `"0"`, `""`, `"true"`, `true` or `null`, is false.
pub fn bool_string<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::String(s) => s == "1",
        Value::Number(n) => n.as_u64() == Some(1),
        _ => false,
    })
}

/// Decodes an integer that firmware may send as a JSON number or a numeric string
///
/// An empty string or `null` decodes to 0.
pub fn string_int<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::Null => Ok(0),
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().map(|f| f as i64))
            .ok_or_else(|| de::Error::custom(format!("integer out of range: {}", n))),
        Value::String(s) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                return Ok(0);
            }
            trimmed
                .parse::<i64>()
                .map_err(|_| de::Error::custom(format!("expected numeric string, got '{}'", s)))
        }
        other => Err(de::Error::custom(format!(
            "expected number or numeric string, got {}",
            other
        ))),
    }
}

/// Encodes an integer as a numeric string, the inverse of [`string_int`]
pub fn int_string<S>(value: &i64, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.collect_str(value)
}

/// Treats an explicit `null` the same as a missing field
pub fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
