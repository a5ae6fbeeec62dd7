//! Redis cache backend implementation.
//!
//! Provides a shared cache for multi-instance deployments. Pattern
//! invalidation goes through `SCAN`, so no tracking sets are kept.

mod cache;
mod error;

pub use cache::RedisCache;
pub(crate) use error::map_redis_error;
