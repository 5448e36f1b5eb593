//! Lenient parsing of non-negative whole amounts (beneficiaries, budget).
//!
//! Form clients send these fields as numbers, numeric strings, empty strings
//! or not at all. Anything that is not a non-negative number collapses to 0
//! so that no negative or non-numeric value is ever persisted or summed.

use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Coerce an arbitrary JSON value into a non-negative whole amount.
///
/// - non-negative integers are kept as is
/// - non-negative fractions are truncated
/// - numeric strings are parsed with the same rules
/// - negative, non-finite, non-numeric and `null` values become 0
pub fn coerce_amount(value: &Value) -> u64 {
    match value {
        Value::Number(n) => {
            if let Some(u) = n.as_u64() {
                u
            } else if n.is_i64() {
                0
            } else {
                n.as_f64().map_or(0, coerce_float)
            }
        }
        Value::String(s) => {
            let trimmed = s.trim();
            trimmed
                .parse::<u64>()
                .ok()
                .or_else(|| trimmed.parse::<f64>().ok().map(coerce_float))
                .unwrap_or(0)
        }
        _ => 0,
    }
}

fn coerce_float(f: f64) -> u64 {
    if f.is_finite() && f >= 0.0 {
        // `as` saturates at u64::MAX.
        f.trunc() as u64
    } else {
        0
    }
}

/// Serde adapter for amount fields that must always have a value.
///
/// Use together with `#[serde(default)]` so a missing field also reads as 0.
pub fn deserialize_amount<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(coerce_amount(&value))
}

/// Serde adapter for amount fields of partial updates.
///
/// A missing field stays `None` (via `#[serde(default)]`); a present field,
/// including `null`, is coerced.
pub fn deserialize_optional_amount<'de, D>(deserializer: D) -> Result<Option<u64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(Some(coerce_amount(&value)))
}
