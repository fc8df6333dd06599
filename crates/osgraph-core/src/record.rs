//! Raw resource records as delivered by a discovery provider.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::meta::{Meta, MetaExt};

/// One semi-structured provider record for a single resource.
///
/// Only `id` is trusted to be present. Relationship fields may be missing,
/// null, empty or of an unexpected shape; every accessor here degrades to
/// "nothing" rather than failing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Record(Meta);

impl Record {
    pub fn new(fields: Meta) -> Self {
        Self(fields)
    }

    /// Wrap a JSON value, which must be an object.
    pub fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Object(fields) => Some(Self(fields)),
            _ => None,
        }
    }

    pub fn id(&self) -> Option<&str> {
        self.str_field("id")
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.value(key)
    }

    /// Non-empty string stored under `key`.
    pub fn str_field(&self, key: &str) -> Option<&str> {
        non_empty_str(self.0.get(key))
    }

    /// Array stored under `key`; empty for absent, null or non-array values.
    pub fn list_field(&self, key: &str) -> &[Value] {
        self.0.list(key)
    }

    /// Ids referenced by the list under `key`.
    ///
    /// Elements may be bare id strings (`["sg-1"]`) or reference objects
    /// (`[{"id": "lb-1"}]`); anything else is skipped.
    pub fn ref_ids<'a>(&'a self, key: &str) -> impl Iterator<Item = &'a str> + 'a {
        self.list_field(key).iter().filter_map(ref_id)
    }

    pub fn fields(&self) -> &Meta {
        &self.0
    }

    pub fn into_fields(self) -> Meta {
        self.0
    }

    pub fn set(&mut self, key: impl Into<String>, value: Value) {
        self.0.insert(key.into(), value);
    }
}

impl From<Meta> for Record {
    fn from(fields: Meta) -> Self {
        Self(fields)
    }
}

/// Non-empty string behind an optional JSON value.
pub fn non_empty_str(value: Option<&Value>) -> Option<&str> {
    value.and_then(Value::as_str).filter(|s| !s.is_empty())
}

/// Non-empty string field of a nested JSON object (e.g. one attachment).
pub fn field_str<'a>(value: &'a Value, key: &str) -> Option<&'a str> {
    non_empty_str(value.get(key))
}

/// Id named by a reference: either the string itself or the object's `id`.
pub fn ref_id(value: &Value) -> Option<&str> {
    match value {
        Value::String(s) if !s.is_empty() => Some(s.as_str()),
        Value::Object(_) => field_str(value, "id"),
        _ => None,
    }
}
