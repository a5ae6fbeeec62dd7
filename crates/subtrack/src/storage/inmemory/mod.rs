//! In-memory storage backend for testing.
//!
//! Stores subscriptions in a `HashMap` wrapped in `Arc<RwLock<_>>`. Useful
//! for tests and local runs where persistence is not required.
//!
//! # Example
//!
//! ```rust,ignore
//! use subtrack::storage::inmemory::InMemoryRepository;
//!
//! let repo = InMemoryRepository::new();
//! // Use repo for testing...
//! ```

mod repository;

pub use repository::InMemoryRepository;
