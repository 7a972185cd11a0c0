//! # telemetry-client
//!
//! Client for a line-oriented, JSON-over-TCP telemetry and control agent:
//! - One connection per request, closed on every exit path
//! - Newline framing with a bounded response size
//! - Timeouts on connect and on the send/receive exchange
//! - Schema-free JSON object responses
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                  telemetry-cli (front end)                   │
//! │           once / watch / ping / restart / throttle           │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │
//! ┌─────────────────────▼───────────────────────────────────────┐
//! │                    TelemetryClient                           │
//! │        get_metrics / ping / restart / throttle → request      │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │
//!          ┌────────────┴────────────┐
//!          │                         │
//!          ▼                         ▼
//!   ┌─────────────┐          ┌─────────────┐
//!   │ Connection  │          │  Protocol   │
//!   │ (one-shot)  │          │ (framing +  │
//!   └─────────────┘          │    JSON)    │
//!                            └─────────────┘
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod config;

pub mod protocol;
pub mod network;
pub mod client;
pub mod render;
pub mod watch;

// =============================================================================
// Public API Re-exports
// =============================================================================

pub use error::{Phase, Result, TelemetryError};
pub use config::{ClientConfig, ClientConfigBuilder};
pub use client::TelemetryClient;
pub use protocol::{Command, Response, Telemetry};

// =============================================================================
// Version Info
// =============================================================================

/// Current version of telemetry-client
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
