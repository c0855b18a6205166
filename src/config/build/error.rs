use thiserror::Error;

use crate::detection::DetectionError;
use crate::sinks::SinkError;
use crate::streams::SourceError;
use crate::tasks::MonitorError;

#[derive(Debug, Error)]
pub enum BuildError {
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Detection(#[from] DetectionError),

    #[error(transparent)]
    Source(#[from] SourceError),

    #[error(transparent)]
    Sink(#[from] SinkError),

    #[error(transparent)]
    Monitor(#[from] MonitorError),
}
