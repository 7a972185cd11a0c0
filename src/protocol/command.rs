//! Command definitions
//!
//! The closed set of request lines the client can send.

use std::fmt;
use std::str::FromStr;

use crate::error::{Result, TelemetryError};

/// A request to the agent
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Fetch a telemetry snapshot
    Get,

    /// Liveness check
    Ping,

    /// Ask the agent to restart its service
    Restart,

    /// Set the agent's sampling throttle
    Throttle { ms: u64 },
}

impl Command {
    /// Build a THROTTLE command, rejecting negative values
    pub fn throttle(ms: i64) -> Result<Self> {
        u64::try_from(ms)
            .map(|ms| Command::Throttle { ms })
            .map_err(|_| TelemetryError::InvalidArgument(format!("ms must be >= 0, got {ms}")))
    }

    /// The request line without its terminator
    pub fn to_line(&self) -> String {
        match self {
            Command::Get => "GET".to_string(),
            Command::Ping => "PING".to_string(),
            Command::Restart => "RESTART".to_string(),
            Command::Throttle { ms } => format!("THROTTLE {ms}"),
        }
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_line())
    }
}

impl FromStr for Command {
    type Err = TelemetryError;

    fn from_str(s: &str) -> Result<Self> {
        let line = s.trim_end_matches(['\r', '\n']);

        match line {
            "GET" => return Ok(Command::Get),
            "PING" => return Ok(Command::Ping),
            "RESTART" => return Ok(Command::Restart),
            _ => {}
        }

        let Some(arg) = line.strip_prefix("THROTTLE ") else {
            return Err(TelemetryError::InvalidArgument(format!(
                "unknown command: {line:?}"
            )));
        };

        // Digits only: no sign, no whitespace
        if arg.is_empty() || !arg.bytes().all(|b| b.is_ascii_digit()) {
            return Err(TelemetryError::InvalidArgument(format!(
                "THROTTLE expects a non-negative integer, got {arg:?}"
            )));
        }

        arg.parse::<u64>()
            .map(|ms| Command::Throttle { ms })
            .map_err(|e| TelemetryError::InvalidArgument(format!("THROTTLE value {arg:?}: {e}")))
    }
}
