//! Command-line surface.
//!
//! Each subcommand maps to one service operation and yields a JSON value
//! for `main` to print.

use clap::{Parser, Subcommand};
use serde_json::{json, Value};

use subtrack_core::subscription::{
    validate_new_subscription, validate_subscription, CreateSubscriptionRequest, SummaryQuery,
    UpdateSubscriptionRequest,
};

use crate::service::{CallContext, Result, ServiceError, SubscriptionService};

/// Subtrack - Track subscription spend per user
#[derive(Parser, Debug)]
#[command(name = "subtrack")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Per-operation timeout in milliseconds, overriding `OPERATION_TIMEOUT_MS`
    #[arg(long)]
    pub timeout_ms: Option<u64>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Create a subscription
    Create {
        #[arg(long)]
        service: String,
        /// Monthly price in whole currency units
        #[arg(long)]
        price: i64,
        #[arg(long)]
        user: String,
        /// First billed month, as MM-YYYY
        #[arg(long)]
        start: String,
        /// Last billed month, as MM-YYYY
        #[arg(long)]
        end: Option<String>,
    },
    /// Show one subscription
    Get { id: i64 },
    /// List a user's subscriptions, newest first
    List {
        #[arg(long)]
        user: String,
    },
    /// Change the mutable fields of a subscription
    Update {
        id: i64,
        #[arg(long)]
        service: Option<String>,
        #[arg(long)]
        price: Option<i64>,
        #[arg(long)]
        start: Option<String>,
        /// Pass an empty value to clear the end date
        #[arg(long)]
        end: Option<String>,
    },
    /// Delete a subscription
    Delete {
        id: i64,
        /// Owner of the subscription, looked up when omitted
        #[arg(long)]
        user: Option<String>,
    },
    /// Total monthly price of subscriptions overlapping a range
    Summary {
        #[arg(long)]
        user: String,
        #[arg(long, default_value = "")]
        service: String,
        /// Range start, as MM-YYYY
        #[arg(long, default_value = "")]
        from: String,
        /// Range end, as MM-YYYY
        #[arg(long, default_value = "")]
        to: String,
    },
}

/// Runs `command` against `service`.
pub async fn execute(
    command: Command,
    service: &SubscriptionService,
    ctx: &CallContext,
) -> Result<Value> {
    match command {
        Command::Create {
            service: service_name,
            price,
            user,
            start,
            end,
        } => {
            let mut request = CreateSubscriptionRequest::new(service_name, price, user, start);
            if let Some(end) = end {
                request = request.with_end_date(end);
            }
            let new = request.into_new_subscription()?;
            validate_new_subscription(&new)?;
            to_json(&service.create(ctx, new).await?)
        }
        Command::Get { id } => to_json(&service.get(ctx, id).await?),
        Command::List { user } => to_json(&service.list(ctx, &user).await?),
        Command::Update {
            id,
            service: service_name,
            price,
            start,
            end,
        } => {
            let request = UpdateSubscriptionRequest {
                service_name,
                price,
                start_date: start,
                end_date: end,
            };
            let existing = service.get(ctx, id).await?;
            let updated = request.apply_to(&existing)?;
            validate_subscription(&updated)?;
            to_json(&service.update(ctx, &updated).await?)
        }
        Command::Delete { id, user } => {
            service.delete(ctx, id, user.as_deref()).await?;
            Ok(json!({ "deleted": id }))
        }
        Command::Summary {
            user,
            service: service_name,
            from,
            to,
        } => {
            let query = SummaryQuery::new(user)
                .with_service_name(service_name)
                .with_from(from)
                .with_to(to);
            let total = service.summary(ctx, &query).await?;
            Ok(json!({ "total": total }))
        }
    }
}

/// Process exit status for a failed command: 2 for bad input or a missing
/// record, 1 for everything else.
pub fn exit_status(err: &ServiceError) -> u8 {
    if err.is_client_error() {
        2
    } else {
        1
    }
}

fn to_json<T: serde::Serialize>(value: &T) -> Result<Value> {
    serde_json::to_value(value).map_err(|e| {
        ServiceError::Storage(subtrack_core::storage::RepositoryError::Serialization(
            e.to_string(),
        ))
    })
}
