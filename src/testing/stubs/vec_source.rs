use std::collections::VecDeque;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use crate::streams::{Poll, ReadingSource, SourceError};

/// Scripted source: replays a fixed list of poll outcomes, then closes (or
/// fails, when a terminal error is configured).
pub struct VecSource {
    script: VecDeque<Poll>,
    terminal_error: Option<String>,
    closes: Arc<AtomicUsize>,
    polls: Arc<AtomicUsize>,
}

impl VecSource {
    pub fn new<S: AsRef<str>>(payloads: &[S]) -> Self {
        Self::scripted(
            payloads
                .iter()
                .map(|p| Poll::Message(p.as_ref().as_bytes().to_vec()))
                .collect(),
        )
    }

    pub fn readings(values: &[f64]) -> Self {
        let payloads: Vec<String> = values
            .iter()
            .map(|v| format!("{{\"reading\": {v:?}}}"))
            .collect();
        Self::new(&payloads)
    }

    pub fn scripted(script: Vec<Poll>) -> Self {
        Self {
            script: script.into(),
            terminal_error: None,
            closes: Arc::new(AtomicUsize::new(0)),
            polls: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Ends the script with a disconnect instead of a clean close.
    pub fn with_terminal_error(mut self, message: impl Into<String>) -> Self {
        self.terminal_error = Some(message.into());
        self
    }

    pub fn probe(&self) -> SourceProbe {
        SourceProbe {
            closes: Arc::clone(&self.closes),
            polls: Arc::clone(&self.polls),
        }
    }
}

impl ReadingSource for VecSource {
    fn poll(&mut self, _timeout: Duration) -> Result<Poll, SourceError> {
        self.polls.fetch_add(1, Ordering::Relaxed);
        if self.closes.load(Ordering::Relaxed) > 0 {
            return Ok(Poll::Closed);
        }
        match self.script.pop_front() {
            Some(next) => Ok(next),
            None => match self.terminal_error.take() {
                Some(message) => Err(SourceError::Disconnected(message)),
                None => Ok(Poll::Closed),
            },
        }
    }

    fn close(&mut self) -> Result<(), SourceError> {
        self.closes.fetch_add(1, Ordering::Relaxed);
        Ok(())
    }
}

/// Observes a [`VecSource`] after it has been moved into a loop.
#[derive(Clone)]
pub struct SourceProbe {
    closes: Arc<AtomicUsize>,
    polls: Arc<AtomicUsize>,
}

impl SourceProbe {
    pub fn closes(&self) -> usize {
        self.closes.load(Ordering::Relaxed)
    }

    pub fn polls(&self) -> usize {
        self.polls.load(Ordering::Relaxed)
    }
}
