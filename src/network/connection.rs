//! Connection
//!
//! One TCP connection for exactly one request/response exchange.

use std::io::{self, Read, Write};
use std::net::{Shutdown, SocketAddr, TcpStream, ToSocketAddrs};
use std::time::{Duration, Instant};

use crate::config::ClientConfig;
use crate::error::{Phase, Result, TelemetryError};
use crate::protocol::read_line;

/// A connected stream to the agent
///
/// Closed on drop, so every exit path of an exchange releases the socket.
pub struct Connection {
    /// TCP stream (unbuffered: one write, then chunked reads)
    stream: TcpStream,

    /// `host:port` as configured, for errors and logging
    addr: String,

    /// Resolved peer address actually connected to
    peer: SocketAddr,

    /// Bound for the connect phase and for send+receive together
    timeout: Duration,

    /// End of the send/receive phase, fixed when the connect completes
    deadline: Instant,

    max_line_bytes: usize,
}

impl Connection {
    /// Connect to the configured agent
    ///
    /// Every resolved address is tried in turn with `connect_timeout`; the
    /// last failure is reported when none succeeds.
    pub fn open(config: &ClientConfig) -> Result<Self> {
        let addr = config.addr();
        let timeout = config.timeout();

        let candidates: Vec<SocketAddr> = (config.host(), config.port())
            .to_socket_addrs()
            .map_err(|source| TelemetryError::Connection {
                addr: addr.clone(),
                source,
            })?
            .collect();

        let mut last_err = io::Error::new(io::ErrorKind::NotFound, "host resolved to no addresses");
        for candidate in candidates {
            match TcpStream::connect_timeout(&candidate, timeout) {
                Ok(stream) => {
                    // Disable Nagle's algorithm; the request is a single small write
                    stream.set_nodelay(true).map_err(|source| TelemetryError::Connection {
                        addr: addr.clone(),
                        source,
                    })?;

                    tracing::trace!(%addr, peer = %candidate, "connected");
                    return Ok(Self {
                        stream,
                        addr,
                        peer: candidate,
                        timeout,
                        deadline: Instant::now() + timeout,
                        max_line_bytes: config.max_line_bytes(),
                    });
                }
                Err(e) => {
                    tracing::trace!(%addr, peer = %candidate, error = %e, "connect attempt failed");
                    last_err = e;
                }
            }
        }

        Err(TelemetryError::from_io(last_err, Phase::Connect, &addr, timeout))
    }

    /// Write one full request line
    pub fn send_line(&mut self, line: &[u8]) -> Result<()> {
        let remaining = self.remaining(Phase::Send)?;
        let map_io = |e: io::Error| TelemetryError::from_io(e, Phase::Send, &self.addr, self.timeout);

        self.stream.set_write_timeout(Some(remaining)).map_err(map_io)?;
        (&self.stream).write_all(line).map_err(map_io)?;
        (&self.stream).flush().map_err(map_io)?;
        Ok(())
    }

    /// Read one response line before the deadline
    pub fn read_line(&mut self) -> Result<String> {
        let mut reader = DeadlineReader {
            stream: &self.stream,
            deadline: self.deadline,
        };
        read_line(&mut reader, self.max_line_bytes, |e| {
            TelemetryError::from_io(e, Phase::Receive, &self.addr, self.timeout)
        })
    }

    /// Peer address actually connected to
    pub fn peer_addr(&self) -> SocketAddr {
        self.peer
    }

    fn remaining(&self, phase: Phase) -> Result<Duration> {
        let remaining = self.deadline.saturating_duration_since(Instant::now());
        if remaining.is_zero() {
            return Err(TelemetryError::Timeout {
                phase,
                timeout: self.timeout,
            });
        }
        Ok(remaining)
    }
}

impl Drop for Connection {
    fn drop(&mut self) {
        // The peer may already have closed; nothing useful to do with the error
        let _ = self.stream.shutdown(Shutdown::Both);
        tracing::trace!(addr = %self.addr, peer = %self.peer, "connection closed");
    }
}

/// Reader that shrinks the socket read timeout to whatever is left of the deadline
struct DeadlineReader<'a> {
    stream: &'a TcpStream,
    deadline: Instant,
}

impl Read for DeadlineReader<'_> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let remaining = self.deadline.saturating_duration_since(Instant::now());
        if remaining.is_zero() {
            return Err(io::Error::from(io::ErrorKind::TimedOut));
        }
        self.stream.set_read_timeout(Some(remaining))?;
        Read::read(&mut self.stream, buf)
    }
}
