//! Transports that deliver queued events.

mod memory;
#[cfg(feature = "redis")]
mod redis_pubsub;

pub use memory::MemoryTransport;
#[cfg(feature = "redis")]
pub use redis_pubsub::RedisTransport;
