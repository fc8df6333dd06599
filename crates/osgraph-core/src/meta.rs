//! Open attribute bag shared by nodes, edges and raw records.

use serde_json::Value;

/// String-keyed map of arbitrary JSON values.
///
/// Provider attributes land here untouched, next to enrichment fields such
/// as `flavor_name`. Consumers read it by ad hoc key with per-field defaults.
pub type Meta = serde_json::Map<String, Value>;

/// Lookup helpers over [`Meta`]. A `null` value is treated as absent.
pub trait MetaExt {
    /// Non-null value for `key`.
    fn value(&self, key: &str) -> Option<&Value>;

    /// Display text for `key`, if present and non-null.
    fn text(&self, key: &str) -> Option<String> {
        self.value(key).map(display_value)
    }

    /// Display text for `key`, or `default` when absent or null.
    fn text_or(&self, key: &str, default: &str) -> String {
        self.text(key).unwrap_or_else(|| default.to_string())
    }

    /// Display text for `key` only when the value is truthy
    /// (not `false`, `0`, `""`, `[]` or `{}`).
    fn truthy_text(&self, key: &str) -> Option<String> {
        self.value(key).filter(|v| is_truthy(v)).map(display_value)
    }

    /// Array stored under `key`; empty when absent, null or not an array.
    fn list(&self, key: &str) -> &[Value];
}

impl MetaExt for Meta {
    fn value(&self, key: &str) -> Option<&Value> {
        self.get(key).filter(|v| !v.is_null())
    }

    fn list(&self, key: &str) -> &[Value] {
        match self.get(key) {
            Some(Value::Array(items)) => items.as_slice(),
            _ => &[],
        }
    }
}

/// Render a JSON value the way a human reads it: strings without quotes,
/// numbers and booleans as-is, containers as compact JSON.
pub fn display_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        other => other.to_string(),
    }
}

pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(items) => !items.is_empty(),
        Value::Object(map) => !map.is_empty(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn meta(value: Value) -> Meta {
        match value {
            Value::Object(map) => map,
            _ => unreachable!(),
        }
    }

    #[test]
    fn test_null_is_absent() {
        let m = meta(json!({"status": null, "size": 20}));
        assert_eq!(m.text("status"), None);
        assert_eq!(m.text_or("status", "UNKNOWN"), "UNKNOWN");
        assert_eq!(m.text_or("size", "?"), "20");
    }

    #[test]
    fn test_truthy_text() {
        let m = meta(json!({"key_name": "", "port_range_min": 0, "remote": "10.0.0.0/8"}));
        assert_eq!(m.truthy_text("key_name"), None);
        assert_eq!(m.truthy_text("port_range_min"), None);
        assert_eq!(m.truthy_text("remote").as_deref(), Some("10.0.0.0/8"));
    }

    #[test]
    fn test_list_defaults_to_empty() {
        let m = meta(json!({"fixed_ips": null, "rules": [1, 2]}));
        assert!(m.list("fixed_ips").is_empty());
        assert!(m.list("missing").is_empty());
        assert_eq!(m.list("rules").len(), 2);
    }
}
