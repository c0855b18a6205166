use tracing::info;

use crate::config::build::{BuildError, build_sink, build_source};
use crate::config::choices::MonitorConfig;
use crate::detection::{Detector, Threshold};
use crate::statistics::WelfordEstimator;
use crate::tasks::MonitorLoop;

pub fn build_detector(config: &MonitorConfig) -> Result<Detector, BuildError> {
    let threshold = Threshold::new(config.threshold)?;
    Ok(Detector::with_estimator(
        WelfordEstimator::new(),
        threshold,
        config.baseline_policy,
    ))
}

/// Assembles detector, source and sink into a ready-to-run loop.
pub fn build_monitor(config: MonitorConfig) -> Result<MonitorLoop, BuildError> {
    let detector = build_detector(&config)?;
    let options = config.options();

    info!(
        source = %config.source.kind(),
        sink = %config.sink.kind(),
        threshold = config.threshold,
        "assembling monitor"
    );
    let source = build_source(config.source)?;
    let sink = build_sink(config.sink)?;

    let monitor = MonitorLoop::new(source, detector, sink, options)?.with_topic(config.topic);
    Ok(monitor)
}
