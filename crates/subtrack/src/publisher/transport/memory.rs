//! In-process transport using a tokio broadcast channel.

use async_trait::async_trait;
use tokio::sync::broadcast;
use tracing::trace;

use subtrack_core::events::{QueuedEvent, Transport, TransportError};

/// Default channel capacity for in-process subscribers.
const DEFAULT_CHANNEL_CAPACITY: usize = 256;

/// Fans events out to in-process subscribers.
///
/// Events sent while nobody is subscribed are discarded.
#[derive(Debug, Clone)]
pub struct MemoryTransport {
    sender: broadcast::Sender<QueuedEvent>,
}

impl Default for MemoryTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryTransport {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CHANNEL_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self { sender }
    }

    /// Receives every event sent after this call.
    pub fn subscribe(&self) -> broadcast::Receiver<QueuedEvent> {
        self.sender.subscribe()
    }
}

#[async_trait]
impl Transport for MemoryTransport {
    async fn send(&self, event: &QueuedEvent) -> Result<(), TransportError> {
        match self.sender.send(event.clone()) {
            Ok(receivers) => trace!(routing_key = %event.routing_key(), receivers, "Event broadcast"),
            Err(_) => trace!(routing_key = %event.routing_key(), "No subscribers for event"),
        }
        Ok(())
    }
}
