use std::time::Duration;

use async_trait::async_trait;

use super::Result;

/// One page of a cursor-based key scan.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScanPage {
    /// Cursor for the next call; `0` means the iteration is complete.
    pub cursor: u64,
    pub keys: Vec<String>,
}

impl ScanPage {
    pub fn new(cursor: u64, keys: Vec<String>) -> Self {
        Self { cursor, keys }
    }

    /// Returns true if this is the final page.
    pub fn is_last(&self) -> bool {
        self.cursor == 0
    }
}

/// Trait for basic cache operations.
#[async_trait]
pub trait Cache: Send + Sync {
    /// Gets a value from the cache by key.
    async fn get(&self, key: &str) -> Result<Option<String>>;

    /// Sets a value in the cache with a TTL.
    async fn set(&self, key: &str, value: &str, ttl: Duration) -> Result<()>;

    /// Deletes a value from the cache by key. Missing keys are not an error.
    async fn delete(&self, key: &str) -> Result<()>;

    /// Returns one page of keys matching `pattern`.
    ///
    /// Start with cursor `0` and keep calling with the returned cursor until it
    /// is `0` again. `count` is a hint for the page size.
    async fn scan(&self, cursor: u64, pattern: &str, count: Option<usize>) -> Result<ScanPage>;
}
