use async_trait::async_trait;

use super::{PublisherState, QueuedEvent, Result, TransportError};

/// Fire-and-forget event publisher.
#[async_trait]
pub trait Publisher: Send + Sync {
    /// Enqueues an event without waiting.
    ///
    /// Fails with `QueueFull` when the buffer is exhausted and with `Closed`
    /// once `close` has been called.
    fn publish(&self, destination: &str, classifier: &str, payload: Vec<u8>) -> Result<()>;

    /// Stops accepting events, drains the queue and waits for delivery to finish.
    async fn close(&self);

    fn state(&self) -> PublisherState;
}

/// Delivers queued events to a message broker.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, event: &QueuedEvent) -> std::result::Result<(), TransportError>;
}
