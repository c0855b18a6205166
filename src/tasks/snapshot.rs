use serde::Serialize;
use std::fmt::{Display, Formatter, Result};

use crate::statistics::BaselineStats;

/// Periodic progress sample emitted while a monitor runs.
#[derive(Debug, Copy, Clone, PartialEq, Serialize)]
pub struct MonitorSnapshot {
    pub readings: u64,
    pub findings: u64,
    pub mean: f64,
    pub std_dev: f64,
    pub seconds: f64,
}

impl Display for MonitorSnapshot {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        write!(
            f,
            "seen={}, anomalies={}, mean={:.6}, std={:.6}, t={:.3}s",
            self.readings, self.findings, self.mean, self.std_dev, self.seconds
        )
    }
}

/// Counters accumulated over one [`MonitorLoop::run`](crate::tasks::MonitorLoop::run).
#[derive(Debug, Default, Clone, Copy, PartialEq, Serialize)]
pub struct MonitorReport {
    /// Poll calls made on the source.
    pub polls: u64,
    /// Polls that returned nothing within the poll interval.
    pub idle_polls: u64,
    /// Readings accepted and evaluated.
    pub readings: u64,
    /// Payloads that could not be decoded.
    pub malformed: u64,
    /// Decoded readings with a non-finite value.
    pub rejected: u64,
    pub findings: u64,
    pub sink_failures: u64,
    pub final_baseline: BaselineStats,
}

impl Display for MonitorReport {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        write!(
            f,
            "readings={}, anomalies={}, malformed={}, rejected={}, sink_failures={}, idle_polls={}, mean={:.6}, std={:.6}",
            self.readings,
            self.findings,
            self.malformed,
            self.rejected,
            self.sink_failures,
            self.idle_polls,
            self.final_baseline.mean,
            self.final_baseline.std_dev
        )
    }
}
