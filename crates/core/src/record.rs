//! Character records as received from the upstream catalog.
//!
//! A [`Record`] keeps the raw JSON object untouched so every upstream field
//! survives filtering and caching. Typed accessors read the handful of fields
//! the pipeline needs and report [`Error::MissingField`] when one is absent or
//! has an unexpected JSON type.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::Error;

/// One character entity exactly as the upstream API returned it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Record(Map<String, Value>);

impl Record {
    /// Raw field access.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn id(&self) -> Result<i64, Error> {
        self.0
            .get("id")
            .and_then(Value::as_i64)
            .ok_or_else(|| self.missing("id"))
    }

    pub fn name(&self) -> Result<&str, Error> {
        self.str_field("name")
    }

    pub fn status(&self) -> Result<&str, Error> {
        self.str_field("status")
    }

    pub fn species(&self) -> Result<&str, Error> {
        self.str_field("species")
    }

    pub fn gender(&self) -> Result<&str, Error> {
        self.str_field("gender")
    }

    pub fn image(&self) -> Result<&str, Error> {
        self.str_field("image")
    }

    pub fn url(&self) -> Result<&str, Error> {
        self.str_field("url")
    }

    /// `origin.name`, the field the origin filter matches against.
    pub fn origin_name(&self) -> Result<&str, Error> {
        self.nested_name("origin", "origin.name")
    }

    /// `location.name`, the character's last known location.
    pub fn location_name(&self) -> Result<&str, Error> {
        self.nested_name("location", "location.name")
    }

    /// Number of entries in the `episode` array.
    pub fn episode_count(&self) -> Result<usize, Error> {
        self.0
            .get("episode")
            .and_then(Value::as_array)
            .map(Vec::len)
            .ok_or_else(|| self.missing("episode"))
    }

    /// Human readable identity used in error messages: `#id`, else the name, else `?`.
    pub fn label(&self) -> String {
        if let Some(id) = self.0.get("id").and_then(Value::as_i64) {
            return format!("#{id}");
        }
        match self.0.get("name").and_then(Value::as_str) {
            Some(name) => format!("{name:?}"),
            None => "?".to_string(),
        }
    }

    fn str_field(&self, key: &'static str) -> Result<&str, Error> {
        self.0
            .get(key)
            .and_then(Value::as_str)
            .ok_or_else(|| self.missing(key))
    }

    fn nested_name(&self, key: &str, path: &'static str) -> Result<&str, Error> {
        self.0
            .get(key)
            .and_then(Value::as_object)
            .and_then(|obj| obj.get("name"))
            .and_then(Value::as_str)
            .ok_or_else(|| self.missing(path))
    }

    fn missing(&self, field: &'static str) -> Error {
        Error::MissingField { record: self.label(), field }
    }
}

impl TryFrom<Value> for Record {
    type Error = Value;

    /// Accepts JSON objects only; any other value is handed back.
    fn try_from(value: Value) -> Result<Self, Self::Error> {
        match value {
            Value::Object(fields) => Ok(Self(fields)),
            other => Err(other),
        }
    }
}
