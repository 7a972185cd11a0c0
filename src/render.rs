//! Render Module
//!
//! Plain-text presentation of response mappings for the CLI.

use serde_json::Value;

use crate::protocol::Response;

/// Rows shown by the metrics table, in display order
pub const METRIC_KEYS: &[&str] = &[
    "ok",
    "status_code",
    "platform",
    "temperature_best_effort",
    "ts_ms",
    "cpu_usage_pct",
    "mem_total_kb",
    "mem_available_kb",
    "temperature_c",
    "uptime_s",
    "throttle_ms",
];

/// Shown for keys the response does not carry
pub const MISSING: &str = "-";

const TITLE: &str = "Telemetry";

/// Render a GET response as a two-column table
///
/// The `error` row is appended only when the agent reports failure.
pub fn metrics_table(response: &Response) -> String {
    let mut rows: Vec<(&str, String)> = METRIC_KEYS
        .iter()
        .map(|&key| (key, cell(response.get(key))))
        .collect();
    if !response.is_ok() {
        rows.push(("error", cell(response.get("error"))));
    }

    let key_width = rows.iter().map(|(k, _)| k.len()).max().unwrap_or(0).max("Key".len());
    let value_width = rows
        .iter()
        .map(|(_, v)| v.chars().count())
        .max()
        .unwrap_or(0)
        .max("Value".len());
    let rule = format!("+-{}-+-{}-+", "-".repeat(key_width), "-".repeat(value_width));

    let mut out = String::new();
    out.push_str(TITLE);
    out.push('\n');
    out.push_str(&rule);
    out.push('\n');
    out.push_str(&format!("| {:<key_width$} | {:<value_width$} |\n", "Key", "Value"));
    out.push_str(&rule);
    out.push('\n');
    for (key, value) in &rows {
        out.push_str(&format!("| {key:<key_width$} | {value:<value_width$} |\n"));
    }
    out.push_str(&rule);
    out.push('\n');
    out
}

/// Pretty-printed JSON of the whole mapping
pub fn response_summary(response: &Response) -> String {
    serde_json::to_string_pretty(response.as_map()).unwrap_or_else(|_| format!("{:?}", response))
}

/// Process exit status for a successfully exchanged response
pub fn exit_code(response: &Response) -> i32 {
    if response.is_ok() {
        0
    } else {
        1
    }
}

fn cell(value: Option<&Value>) -> String {
    match value {
        None => MISSING.to_string(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}
