use thiserror::Error;

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("source disconnected: {0}")]
    Disconnected(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("failed to encode payload: {0}")]
    Encode(#[from] serde_json::Error),
}
