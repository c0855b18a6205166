use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::config::choices::{SinkChoice, SourceChoice};
use crate::config::logging::LoggingConfig;
use crate::detection::{BaselinePolicy, DEFAULT_THRESHOLD};
use crate::tasks::{DEFAULT_PROGRESS_EVERY, MonitorOptions};
use std::time::Duration;

fn default_threshold() -> f64 {
    DEFAULT_THRESHOLD
}

fn default_topic() -> String {
    "sensor-data".to_string()
}

fn default_poll_interval_ms() -> u64 {
    1000
}

fn default_progress_every() -> u64 {
    DEFAULT_PROGRESS_EVERY
}

/// Everything needed to assemble and run a monitor.
///
/// Every field has a default, so an empty JSON object is a valid config:
/// stdin in, `alerts.sqlite3` out, 3-sigma threshold.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct MonitorConfig {
    #[serde(default = "default_threshold")]
    #[schemars(
        title = "Threshold",
        description = "z-score a reading must strictly exceed to be reported"
    )]
    pub threshold: f64,

    #[serde(default)]
    #[schemars(
        title = "Baseline Policy",
        description = "Whether anomalous readings are folded into the baseline"
    )]
    pub baseline_policy: BaselinePolicy,

    #[serde(default = "default_topic")]
    #[schemars(title = "Topic", description = "Name of the monitored stream, used in logs")]
    pub topic: String,

    #[serde(default = "default_poll_interval_ms")]
    #[schemars(
        title = "Poll Interval (ms)",
        description = "Longest single wait for the next reading",
        range(min = 1)
    )]
    pub poll_interval_ms: u64,

    #[serde(default)]
    #[schemars(
        title = "Max Readings",
        description = "Stop after this many readings (None = until the source closes)"
    )]
    pub max_readings: Option<u64>,

    #[serde(default = "default_progress_every")]
    #[schemars(
        title = "Progress Frequency",
        description = "Log a progress snapshot every N readings",
        range(min = 1)
    )]
    pub progress_every: u64,

    #[serde(default)]
    pub source: SourceChoice,

    #[serde(default)]
    pub sink: SinkChoice,

    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            threshold: default_threshold(),
            baseline_policy: BaselinePolicy::default(),
            topic: default_topic(),
            poll_interval_ms: default_poll_interval_ms(),
            max_readings: None,
            progress_every: default_progress_every(),
            source: SourceChoice::default(),
            sink: SinkChoice::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl MonitorConfig {
    pub fn options(&self) -> MonitorOptions {
        MonitorOptions {
            poll_interval: Duration::from_millis(self.poll_interval_ms),
            max_readings: self.max_readings,
            progress_every: self.progress_every,
        }
    }
}
