//! Network Module
//!
//! TCP connection handling for the client.
//!
//! ## Model
//! - One connection per request, never pooled or reused
//! - Connect bounded by the configured timeout
//! - Send and receive share a second timeout window
//! - Socket released on drop

mod connection;

pub use connection::Connection;
