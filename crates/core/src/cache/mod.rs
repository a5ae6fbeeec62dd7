mod error;
mod keys;
mod patterns;
mod serialization;
mod traits;

pub use error::{CacheError, Result};
pub use keys::{summary_key, summary_pattern, SUMMARY_NAMESPACE};
pub use patterns::{escape_glob, pattern_matches};
pub use serialization::{decode_total, encode_total};
pub use traits::{Cache, ScanPage};
