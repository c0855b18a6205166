use std::io::{Error, ErrorKind};
use std::thread;
use std::time::{Duration, Instant};

use chrono::Utc;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::Normal;
use serde::Serialize;

use crate::streams::error::SourceError;
use crate::streams::source::{Poll, ReadingSource};

/// Synthetic sensor feed: normally distributed readings with occasional
/// multiplicative spikes.
///
/// Each reading is drawn from `N(mean, std_dev²)`; with probability
/// `spike_probability` it is then multiplied by `spike_factor`. Payloads have
/// the same shape a real producer sends: `{"timestamp": <unix secs>,
/// "reading": <value>}`.
#[derive(Debug)]
pub struct SensorGenerator {
    seed: u64,
    rng: StdRng,
    noise: Normal<f64>,
    spike_probability: f64,
    spike_factor: f64,
    max_readings: Option<usize>,
    interval: Duration,
    produced: usize,
    next_due: Option<Instant>,
    closed: bool,
}

#[derive(Serialize)]
struct SensorPayload {
    timestamp: f64,
    reading: f64,
}

impl SensorGenerator {
    pub fn new(
        mean: f64,
        std_dev: f64,
        spike_probability: f64,
        spike_factor: f64,
        max_readings: Option<usize>,
        seed: u64,
    ) -> Result<Self, Error> {
        if !mean.is_finite() || !spike_factor.is_finite() {
            return Err(Error::new(
                ErrorKind::InvalidInput,
                "mean and spike factor must be finite",
            ));
        }
        if !std_dev.is_finite() {
            return Err(Error::new(
                ErrorKind::InvalidInput,
                "Standard deviation must be finite",
            ));
        }
        let noise = Normal::new(mean, std_dev).map_err(|e| {
            Error::new(
                ErrorKind::InvalidInput,
                format!("Invalid sensor noise N({mean}, {std_dev}²): {e}"),
            )
        })?;
        if !(0.0..=1.0).contains(&spike_probability) {
            return Err(Error::new(
                ErrorKind::InvalidInput,
                "Spike probability must be in [0, 1]",
            ));
        }

        Ok(Self {
            seed,
            rng: StdRng::seed_from_u64(seed),
            noise,
            spike_probability,
            spike_factor,
            max_readings,
            interval: Duration::ZERO,
            produced: 0,
            next_due: None,
            closed: false,
        })
    }

    /// Spaces readings `interval` apart instead of producing them on demand.
    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    /// Draws the next value without wrapping it in a payload.
    pub fn next_value(&mut self) -> f64 {
        let mut value = self.rng.sample(self.noise);
        if self.rng.random_bool(self.spike_probability) {
            value *= self.spike_factor;
        }
        self.produced += 1;
        value
    }

    /// Re-seeds the generator and clears counters; the sequence starts over.
    pub fn restart(&mut self) {
        self.rng = StdRng::seed_from_u64(self.seed);
        self.produced = 0;
        self.next_due = None;
        self.closed = false;
    }

    pub fn produced(&self) -> usize {
        self.produced
    }

    fn has_more_readings(&self) -> bool {
        !self.closed && self.max_readings.is_none_or(|max| self.produced < max)
    }

    /// Sleeps until the next reading is due. Returns `false` when it will not
    /// be due within `timeout`.
    fn wait_for_slot(&mut self, timeout: Duration) -> bool {
        if self.interval.is_zero() {
            return true;
        }

        let now = Instant::now();
        let due = self.next_due.unwrap_or(now);
        if due > now {
            let wait = due - now;
            if wait > timeout {
                thread::sleep(timeout);
                return false;
            }
            thread::sleep(wait);
        }
        self.next_due = Some(due.max(now) + self.interval);
        true
    }
}

impl ReadingSource for SensorGenerator {
    fn poll(&mut self, timeout: Duration) -> Result<Poll, SourceError> {
        if !self.has_more_readings() {
            return Ok(Poll::Closed);
        }
        if !self.wait_for_slot(timeout) {
            return Ok(Poll::Empty);
        }

        let reading = self.next_value();
        let payload = SensorPayload {
            timestamp: Utc::now().timestamp_micros() as f64 / 1e6,
            reading,
        };
        Ok(Poll::Message(serde_json::to_vec(&payload)?))
    }

    fn close(&mut self) -> Result<(), SourceError> {
        self.closed = true;
        Ok(())
    }
}
