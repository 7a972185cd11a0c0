//! Error types for the telemetry client
//!
//! Every failure of the request/response exchange itself surfaces as one of
//! these variants. A remote failure reported inside a well-formed response
//! (`"ok": false`) is not an error at this level.

use std::fmt;
use std::io;
use std::time::Duration;

use thiserror::Error;

/// Result type alias using TelemetryError
pub type Result<T> = std::result::Result<T, TelemetryError>;

/// Longest raw-line preview carried by `MalformedResponse`
const RAW_PREVIEW_CHARS: usize = 200;

/// Phase of an exchange that a timeout applies to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Connect,
    Send,
    Receive,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Phase::Connect => "connect",
            Phase::Send => "send",
            Phase::Receive => "receive",
        };
        f.write_str(name)
    }
}

/// Unified error type for client operations
#[derive(Debug, Error)]
pub enum TelemetryError {
    // -------------------------------------------------------------------------
    // Transport Errors
    // -------------------------------------------------------------------------
    #[error("Connection error ({addr}): {source}")]
    Connection {
        addr: String,
        #[source]
        source: io::Error,
    },

    #[error("Timed out in {phase} phase after {timeout:?}")]
    Timeout { phase: Phase, timeout: Duration },

    // -------------------------------------------------------------------------
    // Framing / Decoding Errors
    // -------------------------------------------------------------------------
    #[error("Response too large: no line terminator within {limit} bytes")]
    ResponseTooLarge { limit: usize },

    #[error("Malformed response: {detail}: {raw}")]
    MalformedResponse { detail: String, raw: String },

    // -------------------------------------------------------------------------
    // Caller Errors
    // -------------------------------------------------------------------------
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}

impl TelemetryError {
    /// Classify an I/O failure that happened during `phase`
    ///
    /// `WouldBlock` and `TimedOut` both mean an expired socket timeout
    /// (platforms disagree on which one they report).
    pub fn from_io(err: io::Error, phase: Phase, addr: &str, timeout: Duration) -> Self {
        match err.kind() {
            io::ErrorKind::WouldBlock | io::ErrorKind::TimedOut => {
                TelemetryError::Timeout { phase, timeout }
            }
            _ => TelemetryError::Connection {
                addr: addr.to_string(),
                source: err,
            },
        }
    }

    /// Build a `MalformedResponse` carrying an escaped, truncated preview of `raw`
    pub fn malformed(detail: impl fmt::Display, raw: &str) -> Self {
        TelemetryError::MalformedResponse {
            detail: detail.to_string(),
            raw: preview(raw),
        }
    }

    /// True for `Timeout`
    pub fn is_timeout(&self) -> bool {
        matches!(self, TelemetryError::Timeout { .. })
    }
}

fn preview(raw: &str) -> String {
    let mut shown: String = raw.chars().take(RAW_PREVIEW_CHARS).collect();
    let truncated = shown.len() < raw.len();
    shown = format!("{:?}", shown);
    if truncated {
        shown.push_str("...");
    }
    shown
}
