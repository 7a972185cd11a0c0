//! Protocol codec
//!
//! Line framing and JSON decoding for the wire protocol.
//!
//! ## Wire Format
//!
//! ```text
//! request:  GET\n | PING\n | RESTART\n | THROTTLE <ms>\n
//! response: <one JSON object>\n
//! ```
//!
//! ### Framing rules
//! - The response line is everything before the first `\n`; anything after
//!   it is discarded.
//! - A peer close before any `\n` ends the line implicitly.
//! - The line may not exceed `max_line_bytes`. The limit is checked after
//!   every chunk, so an oversized response fails without reading further.
//! - Invalid UTF-8 is replaced with U+FFFD, never rejected.

use std::io::{self, Read};

use bytes::BytesMut;

use super::{Command, Response};
use crate::error::{Result, TelemetryError};

/// Line terminator byte
pub const TERMINATOR: u8 = b'\n';

/// Bytes requested per read
pub const READ_CHUNK_SIZE: usize = 1024;

// =============================================================================
// Request Encoding
// =============================================================================

/// Encode a command as a terminated request line
pub fn encode_command(command: &Command) -> Vec<u8> {
    let mut line = command.to_line().into_bytes();
    line.push(TERMINATOR);
    line
}

/// Append a terminator unless the line already ends with one
pub fn terminate_line(line: &str) -> String {
    if line.ends_with('\n') {
        line.to_string()
    } else {
        format!("{line}\n")
    }
}

// =============================================================================
// Response Framing
// =============================================================================

/// Accumulates response chunks until one full line is available
#[derive(Debug)]
pub struct LineBuffer {
    buf: BytesMut,
    max_line_bytes: usize,
}

impl LineBuffer {
    pub fn new(max_line_bytes: usize) -> Self {
        Self {
            buf: BytesMut::with_capacity(max_line_bytes.min(READ_CHUNK_SIZE)),
            max_line_bytes,
        }
    }

    /// Append one chunk
    ///
    /// Returns the decoded line once the chunk carries a terminator, `None`
    /// if more input is needed.
    pub fn push(&mut self, chunk: &[u8]) -> Result<Option<String>> {
        let searched = self.buf.len();
        self.buf.extend_from_slice(chunk);

        // Earlier chunks held no terminator, so only the new bytes are scanned
        let terminator = chunk
            .iter()
            .position(|&b| b == TERMINATOR)
            .map(|pos| searched + pos);

        let line_len = terminator.unwrap_or(self.buf.len());
        if line_len > self.max_line_bytes {
            tracing::trace!(
                buffered = self.buf.len(),
                limit = self.max_line_bytes,
                "response line over limit"
            );
            return Err(TelemetryError::ResponseTooLarge {
                limit: self.max_line_bytes,
            });
        }

        Ok(terminator.map(|end| decode_line(&self.buf[..end])))
    }

    /// The line implied by a peer close: every byte buffered so far
    pub fn finish(self) -> String {
        decode_line(&self.buf)
    }

    /// Bytes buffered so far
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }
}

fn decode_line(bytes: &[u8]) -> String {
    String::from_utf8_lossy(bytes).into_owned()
}

/// Read one response line from any reader
///
/// Stops at the first chunk containing a terminator or at end of stream.
/// `map_io` classifies read failures (timeout vs. connection error).
pub fn read_line<R, F>(reader: &mut R, max_line_bytes: usize, map_io: F) -> Result<String>
where
    R: Read,
    F: Fn(io::Error) -> TelemetryError,
{
    let mut framer = LineBuffer::new(max_line_bytes);
    let mut chunk = [0u8; READ_CHUNK_SIZE];

    loop {
        let n = match reader.read(&mut chunk) {
            Ok(n) => n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(map_io(e)),
        };
        if n == 0 {
            tracing::trace!(bytes = framer.len(), "peer closed before terminator");
            return Ok(framer.finish());
        }
        if let Some(line) = framer.push(&chunk[..n])? {
            return Ok(line);
        }
    }
}

// =============================================================================
// Response Decoding
// =============================================================================

/// Decode a response line into a mapping
pub fn decode_response(line: &str) -> Result<Response> {
    let value: serde_json::Value =
        serde_json::from_str(line).map_err(|e| TelemetryError::malformed(e, line))?;

    match value {
        serde_json::Value::Object(fields) => Ok(Response::new(fields)),
        other => Err(TelemetryError::malformed(
            format!("expected a JSON object, got {}", json_kind(&other)),
            line,
        )),
    }
}

fn json_kind(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "a boolean",
        serde_json::Value::Number(_) => "a number",
        serde_json::Value::String(_) => "a string",
        serde_json::Value::Array(_) => "an array",
        serde_json::Value::Object(_) => "an object",
    }
}
