//! Statistics published by the monitored site.
//!
//! The document is consumed untyped: top-level keys are measurement names
//! mapped to integers. A missing key means the site has that measurement
//! disabled, which is different from a count of zero.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::CoreError;

/// Key holding the human-readable site name
pub const SITE_NAME_KEY: &str = "site_name";

/// Untyped key/value statistics document
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SiteStats(Map<String, Value>);

impl SiteStats {
    pub fn new(values: Map<String, Value>) -> Self {
        Self(values)
    }

    /// Parse a response body; anything other than a JSON object is rejected
    pub fn from_json(body: &str) -> Result<Self, CoreError> {
        match serde_json::from_str::<Value>(body)? {
            Value::Object(values) => Ok(Self(values)),
            other => Err(CoreError::Source(format!(
                "expected a JSON object, got {}",
                json_kind(&other)
            ))),
        }
    }

    /// Integer value of a measurement, `None` when absent or not an integer.
    ///
    /// Integer-valued strings are accepted since some sites render counts
    /// as strings.
    pub fn count(&self, key: &str) -> Option<i64> {
        match self.0.get(key)? {
            Value::Number(n) => n.as_i64(),
            Value::String(s) => s.trim().parse().ok(),
            _ => None,
        }
    }

    pub fn site_name(&self) -> Option<&str> {
        self.0
            .get(SITE_NAME_KEY)
            .and_then(Value::as_str)
            .filter(|name| !name.trim().is_empty())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// One entry of the measurement table: which key to read and how to report it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Measurement {
    /// Key in the site statistics document, also used as the metric name
    pub key: String,
    /// Human-readable label
    pub label: String,
    /// Unit label
    pub units: String,
    #[serde(default)]
    pub category: Option<String>,
}

impl Measurement {
    pub fn new(key: &str, label: &str, units: &str) -> Self {
        Self {
            key: key.to_string(),
            label: label.to_string(),
            units: units.to_string(),
            category: None,
        }
    }
}

/// Measurements collected when the configuration does not list any
pub const DEFAULT_MEASUREMENTS: [(&str, &str, &str); 3] = [
    ("total_users", "Total Users", "users"),
    ("total_nodes", "Total Nodes", "nodes"),
    ("total_comments", "Total Comments", "comments"),
];

/// [`DEFAULT_MEASUREMENTS`] as owned entries
pub fn default_measurements() -> Vec<Measurement> {
    DEFAULT_MEASUREMENTS
        .iter()
        .map(|(key, label, units)| Measurement::new(key, label, units))
        .collect()
}
