//! Log entry structure
//!
//! One `LogEntry` is built per emission, serialized to a single JSON line and
//! dropped. Field names and omission rules are the wire contract consumed by
//! downstream log processors.

use super::caller::Caller;
use super::log_context::Fields;
use super::log_level::LogLevel;
use serde::{Deserialize, Serialize, Serializer};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogEntry {
    pub pid: String,
    pub level: String,
    pub package: String,
    pub func: String,
    pub message: String,
    pub timestamp: String,
    #[serde(default, skip_serializing_if = "is_zero_code")]
    pub code: u16,
    #[serde(
        default,
        skip_serializing_if = "is_zero_duration",
        serialize_with = "serialize_finite"
    )]
    pub duration: f64,
    #[serde(default, skip_serializing_if = "Fields::is_empty")]
    pub attributes: Fields,
}

fn is_zero_code(code: &u16) -> bool {
    *code == 0
}

fn is_zero_duration(duration: &f64) -> bool {
    *duration == 0.0
}

/// JSON has no NaN or infinity; refuse them instead of emitting `null`
fn serialize_finite<S: Serializer>(value: &f64, serializer: S) -> Result<S::Ok, S::Error> {
    if !value.is_finite() {
        return Err(serde::ser::Error::custom(format!(
            "duration {} is not a finite number",
            value
        )));
    }
    serializer.serialize_f64(*value)
}

impl LogEntry {
    /// Entry without HTTP details
    ///
    /// The message is stored verbatim; JSON string escaping keeps embedded
    /// newlines from splitting the line.
    pub fn new(
        pid: impl Into<String>,
        level: LogLevel,
        caller: Caller,
        message: impl Into<String>,
        timestamp: impl Into<String>,
    ) -> Self {
        Self {
            pid: pid.into(),
            level: level.to_str().to_string(),
            package: caller.component,
            func: caller.operation,
            message: message.into(),
            timestamp: timestamp.into(),
            code: 0,
            duration: 0.0,
            attributes: Fields::new(),
        }
    }

    /// Attach an HTTP status code and request duration in seconds
    pub fn with_http(mut self, code: u16, duration_secs: f64) -> Self {
        self.code = code;
        self.duration = duration_secs;
        self
    }

    pub fn with_attributes(mut self, attributes: Fields) -> Self {
        self.attributes = attributes;
        self
    }

    /// Serialize to one JSON line, without the terminator
    ///
    /// Fails when `duration` is NaN or infinite.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Parse a previously emitted line
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}
