//! Response definitions
//!
//! A decoded response line: a JSON object with no fixed schema.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One decoded response mapping
///
/// Keys and values are exactly what the agent sent; nothing is added,
/// removed, or coerced. Conventional keys (`ok`, `status_code`, `error`)
/// have helpers, but every key is optional.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Response {
    fields: Map<String, Value>,
}

impl Response {
    pub fn new(fields: Map<String, Value>) -> Self {
        Self { fields }
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.fields.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.fields.iter()
    }

    pub fn keys(&self) -> impl Iterator<Item = &String> {
        self.fields.keys()
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.fields
    }

    pub fn into_map(self) -> Map<String, Value> {
        self.fields
    }

    // =========================================================================
    // Typed getters (absent or wrong-typed reads as None)
    // =========================================================================

    pub fn get_bool(&self, key: &str) -> Option<bool> {
        self.get(key).and_then(Value::as_bool)
    }

    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(Value::as_str)
    }

    pub fn get_u64(&self, key: &str) -> Option<u64> {
        self.get(key).and_then(Value::as_u64)
    }

    pub fn get_i64(&self, key: &str) -> Option<i64> {
        self.get(key).and_then(Value::as_i64)
    }

    pub fn get_f64(&self, key: &str) -> Option<f64> {
        self.get(key).and_then(Value::as_f64)
    }

    // =========================================================================
    // Conventional fields
    // =========================================================================

    /// The `ok` field, if present and boolean
    pub fn ok(&self) -> Option<bool> {
        self.get_bool("ok")
    }

    /// Whether the agent reported success
    ///
    /// A response without an `ok` field counts as success.
    pub fn is_ok(&self) -> bool {
        self.ok().unwrap_or(true)
    }

    pub fn status_code(&self) -> Option<i64> {
        self.get_i64("status_code")
    }

    /// The `error` field, present when the agent reports a failure
    pub fn error(&self) -> Option<&str> {
        self.get_str("error")
    }

    /// Typed view over the telemetry fields
    pub fn telemetry(&self) -> Telemetry {
        Telemetry::from_response(self)
    }
}

impl From<Map<String, Value>> for Response {
    fn from(fields: Map<String, Value>) -> Self {
        Self::new(fields)
    }
}

/// Well-known telemetry fields of a GET response, all optional
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Telemetry {
    pub platform: Option<String>,
    pub temperature_best_effort: Option<bool>,
    /// Snapshot timestamp, milliseconds since the Unix epoch
    pub ts_ms: Option<u64>,
    pub cpu_usage_pct: Option<f64>,
    pub mem_total_kb: Option<u64>,
    pub mem_available_kb: Option<u64>,
    pub temperature_c: Option<f64>,
    pub uptime_s: Option<u64>,
    pub throttle_ms: Option<u64>,
}

impl Telemetry {
    pub fn from_response(response: &Response) -> Self {
        Self {
            platform: response.get_str("platform").map(str::to_string),
            temperature_best_effort: response.get_bool("temperature_best_effort"),
            ts_ms: response.get_u64("ts_ms"),
            cpu_usage_pct: response.get_f64("cpu_usage_pct"),
            mem_total_kb: response.get_u64("mem_total_kb"),
            mem_available_kb: response.get_u64("mem_available_kb"),
            temperature_c: response.get_f64("temperature_c"),
            uptime_s: response.get_u64("uptime_s"),
            throttle_ms: response.get_u64("throttle_ms"),
        }
    }

    /// Memory in use, when both totals are known
    pub fn mem_used_kb(&self) -> Option<u64> {
        match (self.mem_total_kb, self.mem_available_kb) {
            (Some(total), Some(available)) => Some(total.saturating_sub(available)),
            _ => None,
        }
    }
}
