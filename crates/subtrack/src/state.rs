//! Application wiring.
//!
//! Builds the storage, cache and publisher backends from `Config` and hands
//! them to the subscription service as trait objects.

use std::sync::Arc;

use anyhow::Result;
use tokio::sync::broadcast;
use tracing::{debug, info};

use subtrack_core::cache::Cache;
use subtrack_core::events::{Publisher, QueuedEvent, Transport};
use subtrack_core::storage::SubscriptionRepository;

use crate::cache::{MemoryCache, SummaryCache};
use crate::config::Config;
use crate::publisher::{MemoryTransport, QueuedPublisher};
use crate::service::{CallContext, SubscriptionService};

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub service: SubscriptionService,
    /// Kept separately so it can be drained on shutdown.
    pub publisher: Arc<dyn Publisher>,
}

impl AppState {
    /// Connects every backend described by `config`.
    ///
    /// Must be called inside a tokio runtime; the publisher spawns its worker.
    pub async fn from_config(config: Config) -> Result<Self> {
        let repository = build_repository(&config).await?;
        let cache = build_cache(&config).await?;
        let transport = build_transport(&config).await?;
        let publisher: Arc<dyn Publisher> = Arc::new(QueuedPublisher::new(
            transport,
            config.publisher_queue_capacity,
        ));

        let service = SubscriptionService::new(
            repository,
            SummaryCache::new(cache, config.cache_ttl()),
            publisher.clone(),
        );

        Ok(Self {
            config,
            service,
            publisher,
        })
    }

    /// A fresh context carrying the configured per-operation timeout.
    pub fn call_context(&self) -> CallContext {
        CallContext::with_timeout(self.config.operation_timeout())
    }

    /// Drains pending events.
    pub async fn shutdown(&self) {
        self.publisher.close().await;
    }
}

#[cfg(not(feature = "inmemory"))]
async fn build_repository(config: &Config) -> Result<Arc<dyn SubscriptionRepository>> {
    use anyhow::Context;

    let repository = crate::storage::SqliteRepository::new(&config.sqlite_path)
        .await
        .with_context(|| format!("failed to open database {}", config.sqlite_path))?;
    info!(path = %config.sqlite_path, "Using SQLite storage");
    Ok(Arc::new(repository))
}

/// Non-persistent storage, for trying the CLI out without a database file.
#[cfg(feature = "inmemory")]
async fn build_repository(_config: &Config) -> Result<Arc<dyn SubscriptionRepository>> {
    info!("Using in-memory storage");
    Ok(Arc::new(crate::storage::InMemoryRepository::new()))
}

#[cfg(feature = "redis")]
async fn build_cache(config: &Config) -> Result<Arc<dyn Cache>> {
    use anyhow::Context;

    if let Some(url) = &config.redis_url {
        let cache = crate::cache::RedisCache::new(url)
            .await
            .context("failed to connect to Redis cache")?;
        info!("Using Redis cache");
        return Ok(Arc::new(cache));
    }
    Ok(memory_cache(config))
}

#[cfg(not(feature = "redis"))]
async fn build_cache(config: &Config) -> Result<Arc<dyn Cache>> {
    Ok(memory_cache(config))
}

fn memory_cache(config: &Config) -> Arc<dyn Cache> {
    info!(max_entries = config.cache_max_entries, "Using in-memory cache");
    Arc::new(MemoryCache::new(config.cache_max_entries.max(1)))
}

#[cfg(feature = "redis")]
async fn build_transport(config: &Config) -> Result<Arc<dyn Transport>> {
    use anyhow::Context;

    if let Some(url) = &config.redis_url {
        let transport = crate::publisher::RedisTransport::new(url)
            .await
            .context("failed to connect to Redis transport")?;
        info!("Publishing events to Redis");
        return Ok(Arc::new(transport));
    }
    Ok(memory_transport())
}

#[cfg(not(feature = "redis"))]
async fn build_transport(_config: &Config) -> Result<Arc<dyn Transport>> {
    Ok(memory_transport())
}

fn memory_transport() -> Arc<dyn Transport> {
    let transport = MemoryTransport::new();
    tokio::spawn(log_events(transport.subscribe()));
    Arc::new(transport)
}

/// Logs every event delivered in-process until the transport is dropped.
async fn log_events(mut events: broadcast::Receiver<QueuedEvent>) {
    loop {
        match events.recv().await {
            Ok(event) => debug!(
                routing_key = %event.routing_key(),
                payload = %String::from_utf8_lossy(&event.payload),
                "Subscription event"
            ),
            Err(broadcast::error::RecvError::Lagged(skipped)) => {
                debug!(skipped, "Event log fell behind")
            }
            Err(broadcast::error::RecvError::Closed) => break,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use subtrack_core::events::PublisherState;
    use subtrack_core::subscription::{MonthYear, NewSubscription};

    fn test_config() -> Config {
        Config {
            sqlite_path: ":memory:".to_string(),
            redis_url: None,
            ..Config::default()
        }
    }

    #[tokio::test]
    async fn test_state_wires_working_service() {
        let state = AppState::from_config(test_config()).await.unwrap();
        let ctx = state.call_context();

        let created = state
            .service
            .create(
                &ctx,
                NewSubscription::new("Netflix", 999, "u1", MonthYear::new(2025, 1).unwrap()),
            )
            .await
            .unwrap();
        assert_eq!(state.service.get(&ctx, created.id).await.unwrap(), created);

        state.shutdown().await;
        assert_eq!(state.publisher.state(), PublisherState::Closed);
    }

    #[tokio::test]
    async fn test_call_context_uses_configured_timeout() {
        let config = Config {
            operation_timeout_ms: 20,
            ..test_config()
        };
        let state = AppState::from_config(config).await.unwrap();

        let result = state
            .call_context()
            .run(std::future::pending::<()>())
            .await;

        assert_eq!(result, Err(crate::service::Interrupted::TimedOut));
        state.shutdown().await;
    }

    #[tokio::test]
    async fn test_event_log_stops_when_transport_dropped() {
        let transport = MemoryTransport::new();
        let handle = tokio::spawn(log_events(transport.subscribe()));

        transport
            .send(&QueuedEvent::new("subscriptions", "created", b"{}".to_vec()))
            .await
            .unwrap();
        drop(transport);

        tokio::time::timeout(std::time::Duration::from_secs(1), handle)
            .await
            .unwrap()
            .unwrap();
    }
}
