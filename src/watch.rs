//! Watch Module
//!
//! Repeated polling with a stop signal checked between iterations.
//! A poll already in flight always runs to completion.

use std::time::Duration;

use crossbeam::channel::{Receiver, RecvTimeoutError, TryRecvError};

use crate::error::Result;
use crate::protocol::Response;

/// Shortest allowed pause between polls
pub const MIN_INTERVAL: Duration = Duration::from_millis(50);

/// Poll until stopped
///
/// Each iteration calls `poll`, hands the response to `render`, then waits
/// up to `interval` on `stop`. A message on `stop`, or every sender being
/// dropped, ends the loop. A poll error ends the loop and is returned.
///
/// Returns the number of completed polls.
pub fn watch<P, R>(interval: Duration, stop: &Receiver<()>, mut poll: P, mut render: R) -> Result<usize>
where
    P: FnMut() -> Result<Response>,
    R: FnMut(&Response),
{
    let interval = interval.max(MIN_INTERVAL);
    let mut polls = 0;

    loop {
        match stop.try_recv() {
            Ok(()) | Err(TryRecvError::Disconnected) => break,
            Err(TryRecvError::Empty) => {}
        }

        let response = poll()?;
        render(&response);
        polls += 1;

        match stop.recv_timeout(interval) {
            Ok(()) | Err(RecvTimeoutError::Disconnected) => break,
            Err(RecvTimeoutError::Timeout) => {}
        }
    }

    tracing::debug!(polls, "watch stopped");
    Ok(polls)
}
