//! Asynchronous event publishing.
//!
//! `QueuedPublisher` buffers events in a bounded queue drained by a single
//! background task, which hands each event to a `Transport`.

mod queued;
pub mod transport;

pub use queued::QueuedPublisher;
pub use transport::MemoryTransport;
#[cfg(feature = "redis")]
pub use transport::RedisTransport;
