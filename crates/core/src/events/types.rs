use std::fmt;

use serde::Serialize;

use super::{PublishError, Result};

/// An event waiting in the publisher queue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueuedEvent {
    /// Logical destination, e.g. an exchange or channel prefix.
    pub destination: String,
    /// Routing classifier within the destination.
    pub classifier: String,
    pub payload: Vec<u8>,
}

impl QueuedEvent {
    pub fn new(
        destination: impl Into<String>,
        classifier: impl Into<String>,
        payload: Vec<u8>,
    ) -> Self {
        Self {
            destination: destination.into(),
            classifier: classifier.into(),
            payload,
        }
    }

    /// Returns `{destination}.{classifier}`.
    pub fn routing_key(&self) -> String {
        format!("{}.{}", self.destination, self.classifier)
    }
}

/// Lifecycle of a publisher: `Open -> Closing -> Closed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PublisherState {
    Open,
    Closing,
    Closed,
}

impl fmt::Display for PublisherState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            PublisherState::Open => "open",
            PublisherState::Closing => "closing",
            PublisherState::Closed => "closed",
        };
        f.write_str(s)
    }
}

/// Encodes an event payload as JSON.
pub fn encode_payload<T: Serialize + ?Sized>(payload: &T) -> Result<Vec<u8>> {
    serde_json::to_vec(payload).map_err(|e| PublishError::Encode(e.to_string()))
}
