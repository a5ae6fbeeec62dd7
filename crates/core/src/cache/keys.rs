use super::escape_glob;

/// Namespace prefix shared by every summary entry.
pub const SUMMARY_NAMESPACE: &str = "summary";

/// Returns the cache key for a summary query.
///
/// The range bounds are the raw request text, so `""` and `"01-0001"` produce
/// different keys even though they normalize to the same timestamp.
pub fn summary_key(user_id: &str, service_name: &str, from: &str, to: &str) -> String {
    format!("{SUMMARY_NAMESPACE}:{user_id}:{service_name}:{from}-{to}")
}

/// Returns the pattern matching every summary key of a user.
pub fn summary_pattern(user_id: &str) -> String {
    format!("{SUMMARY_NAMESPACE}:{}:*", escape_glob(user_id))
}
