use std::time::Duration;

use crate::streams::error::SourceError;

/// Outcome of a single poll on a [`ReadingSource`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Poll {
    /// A raw message payload, not yet decoded.
    Message(Vec<u8>),
    /// Nothing arrived within the timeout. Not an error.
    Empty,
    /// The source is exhausted or has been closed.
    Closed,
}

/// Pull-based interface for transports that deliver reading payloads.
///
/// Implementations may represent finite inputs (files, fixtures) or unbounded
/// feeds. Payloads are delivered in arrival order and are decoded by the
/// caller, so a source never judges whether a payload is well formed.
pub trait ReadingSource {
    /// Waits at most `timeout` for the next payload.
    ///
    /// Returns [`Poll::Empty`] when nothing is ready and [`Poll::Closed`] once
    /// the source can produce nothing more. An `Err` means the transport is
    /// unusable and polling again will not help.
    fn poll(&mut self, timeout: Duration) -> Result<Poll, SourceError>;

    /// Releases the underlying transport.
    ///
    /// Must be idempotent. After closing, [`poll`] returns [`Poll::Closed`].
    fn close(&mut self) -> Result<(), SourceError>;
}
