//! Cache backend implementations.
//!
//! This module provides concrete implementations of the `Cache` trait
//! defined in `subtrack_core::cache`, plus the cache-aside summary
//! component built on top of it.
//!
//! # Feature Flags
//!
//! - default: in-memory LRU cache
//! - `redis`: Redis cache using the redis crate, selected at runtime when
//!   `REDIS_URL` is set

mod memory;
#[cfg(feature = "redis")]
mod redis_impl;
mod summary;

pub use memory::MemoryCache;
#[cfg(feature = "redis")]
pub use redis_impl::RedisCache;
pub use summary::SummaryCache;
