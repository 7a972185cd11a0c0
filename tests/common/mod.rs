//! Shared test helpers: an in-process mock agent.

#![allow(dead_code)]

use std::io::{BufRead, BufReader, Write};
use std::net::{SocketAddr, TcpListener, TcpStream};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use parking_lot::Mutex;
use telemetry_client::{ClientConfig, TelemetryClient};

/// A scripted agent that serves a fixed number of connections
///
/// For each connection it reads one request line, records it, and calls the
/// reply script with the raw stream. The stream is closed when the script
/// returns.
pub struct MockAgent {
    addr: SocketAddr,
    received: Arc<Mutex<Vec<String>>>,
    handle: Option<JoinHandle<()>>,
}

impl MockAgent {
    pub fn spawn<F>(connections: usize, reply: F) -> Self
    where
        F: Fn(&str, &mut TcpStream) + Send + 'static,
    {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        let received = Arc::new(Mutex::new(Vec::new()));
        let log = Arc::clone(&received);

        let handle = thread::spawn(move || {
            for _ in 0..connections {
                let (mut stream, _) = match listener.accept() {
                    Ok(conn) => conn,
                    Err(_) => return,
                };
                let mut line = String::new();
                {
                    let mut reader = BufReader::new(&stream);
                    if reader.read_line(&mut line).is_err() {
                        continue;
                    }
                }
                log.lock().push(line.clone());
                reply(&line, &mut stream);
            }
        });

        Self {
            addr,
            received,
            handle: Some(handle),
        }
    }

    /// Agent that answers every request with `body` verbatim
    pub fn replying(connections: usize, body: &'static [u8]) -> Self {
        Self::spawn(connections, move |_, stream| {
            let _ = stream.write_all(body);
        })
    }

    pub fn port(&self) -> u16 {
        self.addr.port()
    }

    /// Client pointed at this agent
    pub fn client(&self) -> TelemetryClient {
        self.client_with(Duration::from_secs(2), 8192)
    }

    pub fn client_with(&self, timeout: Duration, max_line_bytes: usize) -> TelemetryClient {
        let config = ClientConfig::builder()
            .host("127.0.0.1")
            .port(self.port())
            .timeout(timeout)
            .max_line_bytes(max_line_bytes)
            .build()
            .unwrap();
        TelemetryClient::new(config)
    }

    /// Wait for the agent to serve all its connections; returns the raw
    /// request lines it received, terminators included
    pub fn finish(mut self) -> Vec<String> {
        if let Some(handle) = self.handle.take() {
            handle.join().unwrap();
        }
        self.received.lock().clone()
    }
}

/// A port with nothing listening on it
pub fn closed_port() -> u16 {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    listener.local_addr().unwrap().port()
}
