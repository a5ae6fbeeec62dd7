mod error;
mod traits;
mod types;

pub use error::{PublishError, Result, TransportError};
pub use traits::{Publisher, Transport};
pub use types::{encode_payload, PublisherState, QueuedEvent};
