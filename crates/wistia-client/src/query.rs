//! Query string encoding for request parameters
//!
//! Nested objects and arrays are flattened with bracket keys, the layout
//! the Wistia API expects for filters such as `sort_by` and `project_id`.

use crate::Params;
use serde_json::Value;

/// Flatten parameters into ordered `(key, value)` pairs.
///
/// `{"a": {"b": 1}, "ids": [7, 8]}` becomes
/// `[("a[b]", "1"), ("ids[0]", "7"), ("ids[1]", "8")]`.
/// `null` entries are dropped and booleans are sent as `1` / `0`.
pub fn flatten(params: &Params) -> Vec<(String, String)> {
    let mut pairs = Vec::with_capacity(params.len());
    for (key, value) in params {
        push_value(&mut pairs, key.clone(), value);
    }
    pairs
}

fn push_value(pairs: &mut Vec<(String, String)>, key: String, value: &Value) {
    match value {
        Value::Null => {}
        Value::Bool(b) => pairs.push((key, if *b { "1" } else { "0" }.to_string())),
        Value::Number(n) => pairs.push((key, n.to_string())),
        Value::String(s) => pairs.push((key, s.clone())),
        Value::Array(items) => {
            for (index, item) in items.iter().enumerate() {
                push_value(pairs, format!("{key}[{index}]"), item);
            }
        }
        Value::Object(map) => {
            for (child, item) in map {
                push_value(pairs, format!("{key}[{child}]"), item);
            }
        }
    }
}
