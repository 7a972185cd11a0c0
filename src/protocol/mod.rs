//! Protocol Module
//!
//! Defines the line-oriented wire protocol spoken with the agent.
//!
//! ## Request Format
//! One UTF-8 text line terminated by `\n`:
//! - `GET`           - fetch a telemetry snapshot
//! - `PING`          - liveness check
//! - `RESTART`       - request a service restart
//! - `THROTTLE <ms>` - set the sampling throttle; `<ms>` is unsigned base-10
//!
//! ## Response Format
//! One UTF-8 text line terminated by `\n`, holding one JSON object.
//! Conventional keys: `ok`, `status_code`, `error`, plus telemetry fields.
//!
//! One request and one response per connection.

mod command;
mod response;
mod codec;

pub use command::Command;
pub use response::{Response, Telemetry};
pub use codec::{
    decode_response, encode_command, read_line, terminate_line, LineBuffer, READ_CHUNK_SIZE,
    TERMINATOR,
};
