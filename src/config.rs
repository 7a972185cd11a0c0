//! Configuration for the telemetry client
//!
//! Centralized configuration with sensible defaults.

use std::time::Duration;

use crate::error::{Result, TelemetryError};

/// Connection settings for a [`TelemetryClient`](crate::TelemetryClient)
///
/// Immutable once built; the client owns its copy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    // -------------------------------------------------------------------------
    // Endpoint
    // -------------------------------------------------------------------------
    /// Agent host name or IP address
    host: String,

    /// Agent TCP port (1-65535)
    port: u16,

    // -------------------------------------------------------------------------
    // Limits
    // -------------------------------------------------------------------------
    /// Bound for the connect phase, and separately for the send/receive phase
    timeout: Duration,

    /// Largest accepted response line, excluding the terminator
    max_line_bytes: usize,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 9000,
            timeout: Duration::from_secs(1),
            max_line_bytes: 8192,
        }
    }
}

impl ClientConfig {
    /// Create a new config builder
    pub fn builder() -> ClientConfigBuilder {
        ClientConfigBuilder::default()
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn max_line_bytes(&self) -> usize {
        self.max_line_bytes
    }

    /// `host:port`, for logs and error messages
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Builder for ClientConfig
#[derive(Default)]
pub struct ClientConfigBuilder {
    config: ClientConfig,
}

impl ClientConfigBuilder {
    /// Set the agent host
    pub fn host(mut self, host: impl Into<String>) -> Self {
        self.config.host = host.into();
        self
    }

    /// Set the agent port
    pub fn port(mut self, port: u16) -> Self {
        self.config.port = port;
        self
    }

    /// Set the per-phase timeout
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout = timeout;
        self
    }

    /// Set the per-phase timeout (in milliseconds)
    pub fn timeout_ms(self, ms: u64) -> Self {
        self.timeout(Duration::from_millis(ms))
    }

    /// Set the maximum response line size (in bytes)
    pub fn max_line_bytes(mut self, bytes: usize) -> Self {
        self.config.max_line_bytes = bytes;
        self
    }

    /// Validate and produce the config
    pub fn build(self) -> Result<ClientConfig> {
        let config = self.config;

        if config.host.is_empty() {
            return Err(TelemetryError::InvalidArgument(
                "host must not be empty".to_string(),
            ));
        }
        if config.port == 0 {
            return Err(TelemetryError::InvalidArgument(
                "port must be in 1-65535".to_string(),
            ));
        }
        // std rejects a zero socket timeout
        if config.timeout.is_zero() {
            return Err(TelemetryError::InvalidArgument(
                "timeout must be greater than zero".to_string(),
            ));
        }
        if config.max_line_bytes == 0 {
            return Err(TelemetryError::InvalidArgument(
                "max_line_bytes must be greater than zero".to_string(),
            ));
        }

        Ok(config)
    }
}
