//! Pure functions for encoding summary totals as cache values.
//!
//! Values are plain decimal text so entries stay readable with `redis-cli`.

use super::{CacheError, Result};

/// Encodes a summary total.
pub fn encode_total(total: i64) -> String {
    total.to_string()
}

/// Decodes a summary total previously written with [`encode_total`].
pub fn decode_total(value: &str) -> Result<i64> {
    value
        .trim()
        .parse::<i64>()
        .map_err(|e| CacheError::Serialization(format!("invalid summary value {value:?}: {e}")))
}
