use thiserror::Error;

#[derive(Debug, Error)]
pub enum SinkError {
    #[error("sqlite: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("failed to encode finding: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("corrupt stored finding: {0}")]
    Corrupt(String),

    #[error("sink unavailable: {0}")]
    Unavailable(String),
}
