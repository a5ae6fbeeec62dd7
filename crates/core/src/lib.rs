//! Functional core of subtrack: domain types, pure operations and the
//! capability traits implemented by the application crate.

pub mod cache;
pub mod events;
pub mod serde;
pub mod storage;
pub mod subscription;
