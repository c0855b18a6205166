use thiserror::Error;

use crate::streams::SourceError;

#[derive(Debug, Error)]
pub enum MonitorError {
    #[error("invalid monitor options: {0}")]
    InvalidOptions(&'static str),

    #[error("source failed: {0}")]
    Source(#[from] SourceError),
}
