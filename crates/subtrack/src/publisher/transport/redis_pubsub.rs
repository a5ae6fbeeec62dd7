//! Redis pub/sub transport.

use async_trait::async_trait;
use redis::AsyncCommands;

use subtrack_core::events::{QueuedEvent, Transport, TransportError};

fn map_redis_error(err: redis::RedisError) -> TransportError {
    if err.is_connection_refusal() || err.is_timeout() || err.is_connection_dropped() {
        TransportError::Unavailable(err.to_string())
    } else {
        TransportError::SendFailed(err.to_string())
    }
}

/// Publishes each event on the channel `{destination}.{classifier}`.
pub struct RedisTransport {
    conn: redis::aio::ConnectionManager,
}

impl RedisTransport {
    /// Connects to Redis.
    ///
    /// # Errors
    ///
    /// Returns `TransportError::Unavailable` if the connection cannot be established.
    pub async fn new(url: &str) -> Result<Self, TransportError> {
        let client = redis::Client::open(url).map_err(map_redis_error)?;
        let conn = redis::aio::ConnectionManager::new(client)
            .await
            .map_err(|e| TransportError::Unavailable(e.to_string()))?;
        Ok(Self { conn })
    }
}

#[async_trait]
impl Transport for RedisTransport {
    async fn send(&self, event: &QueuedEvent) -> Result<(), TransportError> {
        let mut conn = self.conn.clone();
        conn.publish::<_, _, ()>(event.routing_key(), event.payload.as_slice())
            .await
            .map_err(map_redis_error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures_util::StreamExt;

    fn redis_url() -> String {
        std::env::var("REDIS_URL").unwrap_or_else(|_| "redis://localhost:6379".to_string())
    }

    #[tokio::test]
    async fn test_redis_publish_reaches_subscriber() {
        let Ok(transport) = RedisTransport::new(&redis_url()).await else {
            eprintln!("Skipping test: Redis not available");
            return;
        };

        let destination = format!("test-{}", uuid::Uuid::new_v4());
        let event = QueuedEvent::new(destination, "created", br#"{"id":1}"#.to_vec());

        let client = redis::Client::open(redis_url()).unwrap();
        let mut pubsub = client.get_async_pubsub().await.unwrap();
        pubsub.subscribe(event.routing_key()).await.unwrap();

        transport.send(&event).await.unwrap();

        let msg = pubsub.on_message().next().await.unwrap();
        let payload: Vec<u8> = msg.get_payload().unwrap();
        assert_eq!(msg.get_channel_name(), event.routing_key());
        assert_eq!(payload, event.payload);
    }
}
