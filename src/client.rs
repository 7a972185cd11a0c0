//! Client Module
//!
//! The protocol client: one full connect, send, receive, parse, disconnect
//! cycle per call.
//!
//! ## Guarantees
//! - No I/O at construction
//! - Exactly one connection opened and closed per call
//! - No retries, backoff, or queueing; failures go straight to the caller
//! - The decoded mapping is returned unmodified

use std::time::Instant;

use crate::config::ClientConfig;
use crate::error::Result;
use crate::network::Connection;
use crate::protocol::{decode_response, terminate_line, Command, Response};

/// Synchronous client for the telemetry agent
#[derive(Debug, Clone)]
pub struct TelemetryClient {
    config: ClientConfig,
}

impl TelemetryClient {
    pub fn new(config: ClientConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Fetch a telemetry snapshot (`GET`)
    pub fn get_metrics(&self) -> Result<Response> {
        self.send(&Command::Get)
    }

    /// Liveness check (`PING`)
    pub fn ping(&self) -> Result<Response> {
        self.send(&Command::Ping)
    }

    /// Ask the agent to restart its service (`RESTART`)
    pub fn restart(&self) -> Result<Response> {
        self.send(&Command::Restart)
    }

    /// Set the agent throttle (`THROTTLE <ms>`)
    ///
    /// A negative `ms` fails with `InvalidArgument` before any connection is
    /// attempted.
    pub fn throttle(&self, ms: i64) -> Result<Response> {
        let command = Command::throttle(ms)?;
        self.send(&command)
    }

    /// Send a typed command
    pub fn send(&self, command: &Command) -> Result<Response> {
        self.request(&command.to_line())
    }

    /// Perform one raw exchange
    ///
    /// A terminator is appended to `line` if missing. The connection is
    /// dropped (and closed) before the response is parsed.
    pub fn request(&self, line: &str) -> Result<Response> {
        let line = terminate_line(line);
        let started = Instant::now();

        let raw = {
            let mut conn = Connection::open(&self.config)?;
            tracing::debug!(
                addr = %self.config.addr(),
                peer = %conn.peer_addr(),
                command = line.trim_end(),
                "sending request"
            );
            conn.send_line(line.as_bytes())?;
            conn.read_line()?
        };

        tracing::debug!(
            command = line.trim_end(),
            bytes = raw.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "received response"
        );

        decode_response(&raw)
    }
}
