//! Bounded, non-blocking publisher backed by a tokio mpsc channel.

use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TrySendError;
use tokio::task::JoinHandle;
use tracing::{debug, error, warn};

use subtrack_core::events::{PublishError, Publisher, PublisherState, QueuedEvent, Result, Transport};

struct Inner {
    state: PublisherState,
    sender: Option<mpsc::Sender<QueuedEvent>>,
    worker: Option<JoinHandle<()>>,
}

/// Fire-and-forget publisher with a fixed-size buffer.
///
/// `publish` never waits: it enqueues or fails immediately. One worker task
/// delivers events in FIFO order; delivery failures are logged and dropped.
pub struct QueuedPublisher {
    inner: Mutex<Inner>,
    capacity: usize,
}

impl QueuedPublisher {
    /// Creates the publisher and spawns its worker on the current runtime.
    ///
    /// A `capacity` of 0 is raised to 1.
    pub fn new(transport: Arc<dyn Transport>, capacity: usize) -> Self {
        let capacity = capacity.max(1);
        let (sender, receiver) = mpsc::channel(capacity);
        let worker = tokio::spawn(run_worker(transport, receiver));

        Self {
            inner: Mutex::new(Inner {
                state: PublisherState::Open,
                sender: Some(sender),
                worker: Some(worker),
            }),
            capacity,
        }
    }

    #[cfg(test)]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        // The guarded data stays consistent even if a holder panicked
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

async fn run_worker(transport: Arc<dyn Transport>, mut receiver: mpsc::Receiver<QueuedEvent>) {
    debug!("Publisher worker started");

    while let Some(event) = receiver.recv().await {
        match transport.send(&event).await {
            Ok(()) => debug!(
                destination = %event.destination,
                classifier = %event.classifier,
                "Event delivered"
            ),
            Err(e) => error!(
                destination = %event.destination,
                classifier = %event.classifier,
                error = %e,
                "Failed to deliver event"
            ),
        }
    }

    debug!("Publisher worker shutting down");
}

#[async_trait]
impl Publisher for QueuedPublisher {
    fn publish(&self, destination: &str, classifier: &str, payload: Vec<u8>) -> Result<()> {
        let inner = self.lock();
        let sender = match (&inner.state, &inner.sender) {
            (PublisherState::Open, Some(sender)) => sender,
            _ => return Err(PublishError::Closed),
        };

        sender
            .try_send(QueuedEvent::new(destination, classifier, payload))
            .map_err(|e| match e {
                TrySendError::Full(_) => PublishError::QueueFull {
                    capacity: self.capacity,
                },
                TrySendError::Closed(_) => PublishError::Closed,
            })
    }

    async fn close(&self) {
        let (sender, worker) = {
            let mut inner = self.lock();
            if inner.state != PublisherState::Open {
                return;
            }
            inner.state = PublisherState::Closing;
            (inner.sender.take(), inner.worker.take())
        };

        // Dropping the last sender lets the worker drain and exit
        drop(sender);
        if let Some(worker) = worker {
            if let Err(e) = worker.await {
                warn!(error = %e, "Publisher worker ended abnormally");
            }
        }

        self.lock().state = PublisherState::Closed;
        debug!("Publisher closed");
    }

    fn state(&self) -> PublisherState {
        self.lock().state
    }
}
