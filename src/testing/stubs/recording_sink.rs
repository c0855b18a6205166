use std::sync::{Arc, Mutex};

use crate::core::Finding;
use crate::sinks::{FindingSink, SinkError};

/// In-memory sink; optionally fails its first `n` calls.
#[derive(Default)]
pub struct RecordingSink {
    recorded: Arc<Mutex<Vec<Finding>>>,
    attempts: Arc<Mutex<usize>>,
    fail_first: usize,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing_first(n: usize) -> Self {
        Self {
            fail_first: n,
            ..Self::default()
        }
    }

    pub fn handle(&self) -> RecordedFindings {
        RecordedFindings {
            recorded: Arc::clone(&self.recorded),
            attempts: Arc::clone(&self.attempts),
        }
    }
}

impl FindingSink for RecordingSink {
    fn record(&mut self, finding: &Finding) -> Result<(), SinkError> {
        let attempt = {
            let mut attempts = self.attempts.lock().unwrap();
            *attempts += 1;
            *attempts
        };
        if attempt <= self.fail_first {
            return Err(SinkError::Unavailable(format!("scripted failure #{attempt}")));
        }
        self.recorded.lock().unwrap().push(*finding);
        Ok(())
    }
}

#[derive(Clone)]
pub struct RecordedFindings {
    recorded: Arc<Mutex<Vec<Finding>>>,
    attempts: Arc<Mutex<usize>>,
}

impl RecordedFindings {
    pub fn findings(&self) -> Vec<Finding> {
        self.recorded.lock().unwrap().clone()
    }

    pub fn attempts(&self) -> usize {
        *self.attempts.lock().unwrap()
    }
}
