use std::{env, time::Duration};

const DEFAULT_CACHE_TTL_SECONDS: u64 = 600;
const DEFAULT_CACHE_MAX_ENTRIES: usize = 10_000;
const DEFAULT_PUBLISHER_QUEUE_CAPACITY: usize = 100;
const DEFAULT_OPERATION_TIMEOUT_MS: u64 = 5_000;
const DEFAULT_SQLITE_PATH: &str = "subtrack.db";

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Summary cache TTL in seconds (default: 600)
    pub cache_ttl_seconds: u64,
    /// Maximum number of in-memory cache entries (default: 10,000)
    pub cache_max_entries: usize,
    /// Capacity of the event publisher queue (default: 100)
    pub publisher_queue_capacity: usize,
    /// Per-operation timeout in milliseconds (default: 5,000)
    pub operation_timeout_ms: u64,
    /// Path to SQLite database file (default: "subtrack.db")
    pub sqlite_path: String,
    /// Redis connection URL, e.g. "redis://localhost:6379".
    /// Note: Only used when the `redis` feature is enabled.
    pub redis_url: Option<String>,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Environment variables:
    /// - `CACHE_TTL_SECONDS` - Summary cache TTL, must be > 0 (default: 600)
    /// - `CACHE_MAX_ENTRIES` - Maximum cache entries, must be > 0 (default: 10,000)
    /// - `PUBLISHER_QUEUE_CAPACITY` - Event queue size, must be > 0 (default: 100)
    /// - `OPERATION_TIMEOUT_MS` - Per-operation timeout (default: 5,000)
    /// - `SQLITE_PATH` - SQLite database path, `:memory:` for a throwaway database
    ///   (default: "subtrack.db")
    /// - `REDIS_URL` - Redis connection URL (unset by default)
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary variable source.
    ///
    /// Unparsable and out-of-range values fall back to the defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        fn positive<T>(value: Option<String>, default: T) -> T
        where
            T: std::str::FromStr + PartialOrd + Default,
        {
            value
                .and_then(|v| v.trim().parse::<T>().ok())
                .filter(|v| *v > T::default())
                .unwrap_or(default)
        }

        Self {
            cache_ttl_seconds: positive(lookup("CACHE_TTL_SECONDS"), DEFAULT_CACHE_TTL_SECONDS),
            cache_max_entries: positive(lookup("CACHE_MAX_ENTRIES"), DEFAULT_CACHE_MAX_ENTRIES),
            publisher_queue_capacity: positive(
                lookup("PUBLISHER_QUEUE_CAPACITY"),
                DEFAULT_PUBLISHER_QUEUE_CAPACITY,
            ),
            operation_timeout_ms: positive(
                lookup("OPERATION_TIMEOUT_MS"),
                DEFAULT_OPERATION_TIMEOUT_MS,
            ),
            sqlite_path: lookup("SQLITE_PATH")
                .filter(|v| !v.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_SQLITE_PATH.to_string()),
            redis_url: lookup("REDIS_URL").filter(|v| !v.trim().is_empty()),
        }
    }

    /// Get cache TTL as a Duration.
    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_seconds)
    }

    /// Get the per-operation timeout as a Duration.
    pub fn operation_timeout(&self) -> Duration {
        Duration::from_millis(self.operation_timeout_ms)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_lookup(|_| None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(vars: &[(&str, &str)]) -> Config {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_default_values() {
        let config = Config::default();

        assert_eq!(config.cache_ttl_seconds, 600);
        assert_eq!(config.cache_max_entries, 10_000);
        assert_eq!(config.publisher_queue_capacity, 100);
        assert_eq!(config.operation_timeout_ms, 5_000);
        assert_eq!(config.sqlite_path, "subtrack.db");
        assert_eq!(config.redis_url, None);
    }

    #[test]
    fn test_values_from_lookup() {
        let config = config_from(&[
            ("CACHE_TTL_SECONDS", "60"),
            ("CACHE_MAX_ENTRIES", "50"),
            ("PUBLISHER_QUEUE_CAPACITY", "8"),
            ("OPERATION_TIMEOUT_MS", "250"),
            ("SQLITE_PATH", ":memory:"),
            ("REDIS_URL", "redis://cache:6379"),
        ]);

        assert_eq!(config.cache_ttl(), Duration::from_secs(60));
        assert_eq!(config.cache_max_entries, 50);
        assert_eq!(config.publisher_queue_capacity, 8);
        assert_eq!(config.operation_timeout(), Duration::from_millis(250));
        assert_eq!(config.sqlite_path, ":memory:");
        assert_eq!(config.redis_url.as_deref(), Some("redis://cache:6379"));
    }

    #[test]
    fn test_invalid_values_fall_back() {
        let config = config_from(&[
            ("CACHE_TTL_SECONDS", "0"),
            ("CACHE_MAX_ENTRIES", "-3"),
            ("PUBLISHER_QUEUE_CAPACITY", "lots"),
            ("OPERATION_TIMEOUT_MS", ""),
            ("SQLITE_PATH", "  "),
        ]);

        assert_eq!(config, Config::default());
    }
}
