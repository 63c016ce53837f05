use thiserror::Error;

/// Result alias for store and persistence operations.
pub type HopResult<T> = Result<T, HopError>;

#[derive(Error, Debug)]
pub enum HopError {
    /// A record must carry a non-empty key.
    #[error("empty key")]
    EmptyKey,

    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    #[error("snapshot encode error: {0}")]
    Encode(#[source] serde_json::Error),

    #[error("snapshot decode error: {0}")]
    Decode(#[source] serde_json::Error),

    /// The persistence worker is gone; no more writes can be accepted.
    #[error("write queue closed")]
    QueueClosed,
}
