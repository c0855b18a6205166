use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum DetectionError {
    #[error("invalid threshold: {0} (must be finite and > 0)")]
    InvalidThreshold(f64),
}
