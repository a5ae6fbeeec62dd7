//! Storage backend implementations.
//!
//! This module provides concrete implementations of `SubscriptionRepository`
//! from `subtrack_core::storage`.
//!
//! - `SqliteRepository`: the production backend (`rusqlite` + `tokio-rusqlite`)
//! - `InMemoryRepository`: a `HashMap` backend for tests, selected instead of
//!   SQLite by the `inmemory` feature

#[cfg(any(test, feature = "inmemory"))]
pub mod inmemory;
#[cfg(any(test, not(feature = "inmemory")))]
pub mod sqlite;

#[cfg(any(test, feature = "inmemory"))]
pub use inmemory::InMemoryRepository;
#[cfg(any(test, not(feature = "inmemory")))]
pub use sqlite::SqliteRepository;
