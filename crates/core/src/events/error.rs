use thiserror::Error;

/// Errors returned to callers of `Publisher::publish`.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PublishError {
    #[error("Publish queue is full (capacity {capacity})")]
    QueueFull { capacity: usize },
    #[error("Publisher is closed")]
    Closed,
    #[error("Failed to encode payload: {0}")]
    Encode(String),
}

/// Errors raised by a transport while delivering a queued event.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TransportError {
    #[error("Transport unavailable: {0}")]
    Unavailable(String),
    #[error("Send failed: {0}")]
    SendFailed(String),
}

/// Result type for publish operations.
pub type Result<T> = std::result::Result<T, PublishError>;
