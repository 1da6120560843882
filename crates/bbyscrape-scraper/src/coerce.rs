//! Total conversions from loosely-typed JSON values.
//!
//! Raw field maps mix strings, numbers, and worse from different extraction
//! strategies. These helpers never fail: unconvertible input yields `None`.

use serde_json::Value;

/// Coerces a JSON value to `f64`. Accepts numbers and numeric strings
/// (thousands separators stripped, whitespace trimmed).
pub(crate) fn as_float(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.replace(',', "").trim().parse::<f64>().ok(),
        _ => None,
    }
}

/// Coerces a JSON value to an owned string. Accepts strings and numbers;
/// anything else (objects, arrays, booleans, null) yields `None`.
pub(crate) fn as_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Like [`as_string`], but treats the empty string as absent.
pub(crate) fn as_nonempty_string(value: &Value) -> Option<String> {
    as_string(value).filter(|s| !s.is_empty())
}

/// Formats a price as a fixed two-decimal string, e.g. `199.99`.
pub(crate) fn format_price(value: f64) -> String {
    format!("{value:.2}")
}
