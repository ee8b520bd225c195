//! Tolerant field extraction from loosely-typed remote records.
//!
//! Every remote reply element is a string-keyed map. Entities are built field by
//! field: a missing or mistyped field falls back to a default instead of
//! rejecting the element.

use serde_json::{Map, Value};

/// A single remote record as received from the engine.
pub type FieldMap = Map<String, Value>;

/// Placeholder used for text fields that carry a user-visible label.
pub const UNKNOWN: &str = "Unknown";

/// Returns the string at `key`, or `default` when absent or not a string.
pub fn text(fields: &FieldMap, key: &str, default: &str) -> String {
    fields
        .get(key)
        .and_then(Value::as_str)
        .map_or_else(|| default.to_string(), ToString::to_string)
}

/// Returns the string at `key` when present and non-empty.
pub fn optional_text(fields: &FieldMap, key: &str) -> Option<String> {
    fields
        .get(key)
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .map(ToString::to_string)
}

/// Returns the string at `key`, or `default` when absent, mistyped or empty.
pub fn label(fields: &FieldMap, key: &str, default: &str) -> String {
    optional_text(fields, key).unwrap_or_else(|| default.to_string())
}

/// Returns the number at `key`; integers are widened to `f64`.
pub fn number(fields: &FieldMap, key: &str) -> Option<f64> {
    fields.get(key).and_then(Value::as_f64).filter(|n| n.is_finite())
}

/// Returns the number at `key`, or `0.0`.
pub fn number_or_zero(fields: &FieldMap, key: &str) -> f64 {
    number(fields, key).unwrap_or(0.0)
}

/// Returns the number at `key` clamped to be non-negative, or `0.0`.
pub fn amount(fields: &FieldMap, key: &str) -> f64 {
    number_or_zero(fields, key).max(0.0)
}

/// Returns the non-negative integer at `key`, or `0`.
///
/// Floating point values are truncated, matching how the remote side encodes
/// whole numbers that passed through a double.
pub fn whole(fields: &FieldMap, key: &str) -> u32 {
    match fields.get(key) {
        Some(Value::Number(n)) => n
            .as_u64()
            .map(|v| u32::try_from(v).unwrap_or(u32::MAX))
            .or_else(|| n.as_f64().filter(|f| *f >= 0.0).map(|f| f as u32))
            .unwrap_or(0),
        _ => 0,
    }
}
