use std::sync::mpsc::Sender;
use std::time::{Duration, Instant};

use chrono::Utc;
use tracing::{debug, error, info, info_span, warn};

use crate::core::{Finding, Reading};
use crate::detection::Detector;
use crate::sinks::FindingSink;
use crate::statistics::Estimator;
use crate::streams::{Poll, ReadingSource};
use crate::tasks::error::MonitorError;
use crate::tasks::shutdown::ShutdownSignal;
use crate::tasks::snapshot::{MonitorReport, MonitorSnapshot};

pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(1);
pub const DEFAULT_PROGRESS_EVERY: u64 = 1000;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MonitorOptions {
    /// Upper bound on a single wait for the next payload.
    pub poll_interval: Duration,
    /// Stop after this many accepted readings (None = until the source closes).
    pub max_readings: Option<u64>,
    /// Emit a progress snapshot every N accepted readings.
    pub progress_every: u64,
}

impl Default for MonitorOptions {
    fn default() -> Self {
        Self {
            poll_interval: DEFAULT_POLL_INTERVAL,
            max_readings: None,
            progress_every: DEFAULT_PROGRESS_EVERY,
        }
    }
}

/// Pulls readings from a source, judges them and archives the anomalies.
///
/// A malformed payload, a non-finite reading or a failed sink write is
/// logged, counted in the [`MonitorReport`] and skipped; none of them stops
/// the loop. Only a source error ends a run early. The source is closed
/// before [`run`](Self::run) returns, whatever the outcome.
pub struct MonitorLoop<E: Estimator = crate::statistics::WelfordEstimator> {
    source: Box<dyn ReadingSource>,
    detector: Detector<E>,
    sink: Box<dyn FindingSink>,
    options: MonitorOptions,
    topic: String,

    shutdown: ShutdownSignal,
    progress_tx: Option<Sender<MonitorSnapshot>>,

    report: MonitorReport,
    start_time: Instant,
}

impl<E: Estimator> MonitorLoop<E> {
    pub fn new(
        source: Box<dyn ReadingSource>,
        detector: Detector<E>,
        sink: Box<dyn FindingSink>,
        options: MonitorOptions,
    ) -> Result<Self, MonitorError> {
        if options.poll_interval.is_zero() {
            return Err(MonitorError::InvalidOptions("poll_interval must be > 0"));
        }
        if options.progress_every == 0 {
            return Err(MonitorError::InvalidOptions("progress_every must be > 0"));
        }

        Ok(Self {
            source,
            detector,
            sink,
            options,
            topic: String::from("readings"),
            shutdown: ShutdownSignal::default(),
            progress_tx: None,
            report: MonitorReport::default(),
            start_time: Instant::now(),
        })
    }

    pub fn with_shutdown(mut self, shutdown: ShutdownSignal) -> Self {
        self.shutdown = shutdown;
        self
    }

    pub fn with_progress(mut self, tx: Sender<MonitorSnapshot>) -> Self {
        self.progress_tx = Some(tx);
        self
    }

    /// Label used in log records for the stream being monitored.
    pub fn with_topic(mut self, topic: impl Into<String>) -> Self {
        self.topic = topic.into();
        self
    }

    pub fn detector(&self) -> &Detector<E> {
        &self.detector
    }

    pub fn report(&self) -> &MonitorReport {
        &self.report
    }

    /// Runs until the source closes, the shutdown signal is raised or
    /// `max_readings` is reached.
    pub fn run(&mut self) -> Result<MonitorReport, MonitorError> {
        let span = info_span!("monitor", topic = %self.topic);
        let _entered = span.enter();

        self.start_time = Instant::now();
        info!(
            threshold = self.detector.threshold().value(),
            policy = %self.detector.policy(),
            "monitoring started"
        );

        let outcome = self.drive();
        let released = self.source.close();

        self.report.final_baseline = self.detector.baseline();
        self.push_snapshot();

        match (outcome, released) {
            (Err(e), released) => {
                if let Err(close_err) = released {
                    warn!(error = %close_err, "failed to close source after error");
                }
                error!(error = %e, "monitoring aborted");
                Err(e)
            }
            (Ok(()), Err(close_err)) => Err(close_err.into()),
            (Ok(()), Ok(())) => {
                info!(report = %self.report, "monitoring stopped");
                Ok(self.report)
            }
        }
    }

    fn drive(&mut self) -> Result<(), MonitorError> {
        loop {
            if self.shutdown.is_requested() {
                info!("shutdown requested");
                return Ok(());
            }
            if let Some(max) = self.options.max_readings {
                if self.report.readings >= max {
                    debug!(max, "reading limit reached");
                    return Ok(());
                }
            }

            self.report.polls += 1;
            match self.source.poll(self.options.poll_interval)? {
                Poll::Empty => self.report.idle_polls += 1,
                Poll::Closed => {
                    info!("source closed");
                    return Ok(());
                }
                Poll::Message(payload) => self.handle_payload(&payload),
            }
        }
    }

    fn handle_payload(&mut self, payload: &[u8]) {
        let reading = match Reading::from_payload(payload, Utc::now()) {
            Ok(r) => r,
            Err(e) => {
                self.report.malformed += 1;
                warn!(error = %e, bytes = payload.len(), "discarding malformed payload");
                return;
            }
        };

        let finding = match self.detector.evaluate_reading(&reading) {
            Ok(f) => f,
            Err(e) => {
                self.report.rejected += 1;
                warn!(error = %e, "discarding reading");
                return;
            }
        };

        self.report.readings += 1;
        if let Some(finding) = finding {
            self.report.findings += 1;
            self.persist(&finding);
        }

        if self.report.readings % self.options.progress_every == 0 {
            self.push_snapshot();
        }
    }

    fn persist(&mut self, finding: &Finding) {
        warn!(
            value = finding.value,
            z_score = finding.z_score,
            mean = finding.baseline_mean,
            std_dev = finding.baseline_std_dev,
            tail_probability = finding.tail_probability(),
            "anomaly detected"
        );

        // Not retried: losing one archived anomaly is preferable to stalling
        // detection of the next one.
        if let Err(e) = self.sink.record(finding) {
            self.report.sink_failures += 1;
            error!(error = %e, value = finding.value, "failed to archive anomaly");
        }
    }

    fn push_snapshot(&mut self) {
        let baseline = self.detector.baseline();
        let snapshot = MonitorSnapshot {
            readings: self.report.readings,
            findings: self.report.findings,
            mean: baseline.mean,
            std_dev: baseline.std_dev,
            seconds: self.start_time.elapsed().as_secs_f64(),
        };

        debug!(%snapshot, "progress");
        if let Some(tx) = &self.progress_tx {
            let _ = tx.send(snapshot);
        }
    }
}
