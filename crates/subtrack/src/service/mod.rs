//! Subscription orchestration.

mod context;
mod error;
mod subscription;

pub use context::{CallContext, Interrupted};
pub use error::{Result, ServiceError};
pub use subscription::SubscriptionService;
