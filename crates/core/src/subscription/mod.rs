mod error;
mod events;
mod month_year;
mod operations;
mod range;
mod requests;
mod types;

pub use error::{FormatError, RangeError, ValidationError};
pub use events::{DeletedPayload, SubscriptionEventKind, SUBSCRIPTIONS_DESTINATION};
pub use month_year::MonthYear;
pub use operations::{overlaps_range, summarize, validate_new_subscription, validate_subscription};
pub use range::{normalize_range, SummaryRange};
pub use requests::{CreateSubscriptionRequest, SummaryQuery, UpdateSubscriptionRequest};
pub use types::{NewSubscription, Subscription};
