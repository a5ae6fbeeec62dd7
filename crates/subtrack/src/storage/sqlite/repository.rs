//! SQLite repository implementation.
//!
//! Implements `SubscriptionRepository` from `subtrack_core::storage`.

use async_trait::async_trait;
use chrono::{DateTime, SubsecRound, Utc};
use tokio_rusqlite::Connection;

use subtrack_core::storage::{RepositoryError, Result, SubscriptionRepository};
use subtrack_core::subscription::{NewSubscription, Subscription, SummaryRange};

use super::conversions::{
    format_datetime, format_month, format_timestamp_date, row_to_subscription,
};
use super::error::map_tokio_rusqlite_error;
use super::schema;

/// Helper to wrap rusqlite errors for tokio_rusqlite closures.
fn wrap_err(e: rusqlite::Error) -> tokio_rusqlite::Error {
    tokio_rusqlite::Error::Rusqlite(e)
}

/// Current time at the precision stored in the database.
fn now() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(6)
}

/// SQLite-based repository implementation.
pub struct SqliteRepository {
    conn: Connection,
}

impl SqliteRepository {
    /// Opens (or creates) a file-based database and ensures the schema exists.
    ///
    /// The special path `:memory:` opens a private in-memory database.
    pub async fn new(path: &str) -> Result<Self> {
        if path == ":memory:" {
            return Self::new_in_memory().await;
        }

        let conn = Connection::open(path)
            .await
            .map_err(|e| RepositoryError::ConnectionFailed(e.to_string()))?;

        Self::init_schema(&conn).await?;

        Ok(Self { conn })
    }

    /// Creates a new repository with an in-memory database.
    ///
    /// Data is lost when the connection is dropped.
    pub async fn new_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()
            .await
            .map_err(|e| RepositoryError::ConnectionFailed(e.to_string()))?;

        Self::init_schema(&conn).await?;

        Ok(Self { conn })
    }

    async fn init_schema(conn: &Connection) -> Result<()> {
        conn.call(|conn| {
            conn.execute_batch(schema::CREATE_TABLES)
                .map_err(wrap_err)?;
            Ok(())
        })
        .await
        .map_err(|e| RepositoryError::QueryFailed(e.to_string()))
    }
}

#[async_trait]
impl SubscriptionRepository for SqliteRepository {
    async fn get_by_id(&self, id: i64) -> Result<Subscription> {
        self.conn
            .call(move |conn| {
                let mut stmt = conn
                    .prepare(schema::SELECT_SUBSCRIPTION_BY_ID)
                    .map_err(wrap_err)?;
                stmt.query_row([id], row_to_subscription).map_err(wrap_err)
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error(e, id.to_string()))
    }

    async fn create(&self, new: &NewSubscription) -> Result<Subscription> {
        let service_name = new.service_name.clone();
        let price = new.price;
        let user_id = new.user_id.clone();
        let start_date = format_month(new.start_date);
        let end_date = new.end_date.map(format_month);
        let timestamp = now();
        let created_at = format_datetime(&timestamp);

        let id = self
            .conn
            .call(move |conn| {
                conn.execute(
                    schema::INSERT_SUBSCRIPTION,
                    rusqlite::params![
                        service_name,
                        price,
                        user_id,
                        start_date,
                        end_date,
                        created_at,
                        created_at
                    ],
                )
                .map_err(wrap_err)?;
                Ok(conn.last_insert_rowid())
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error(e, ""))?;

        Ok(Subscription::from_new(id, new.clone(), timestamp))
    }

    async fn update(&self, subscription: &Subscription) -> Result<Subscription> {
        let id = subscription.id;
        let service_name = subscription.service_name.clone();
        let price = subscription.price;
        let start_date = format_month(subscription.start_date);
        let end_date = subscription.end_date.map(format_month);
        let updated_at = format_datetime(&now());

        self.conn
            .call(move |conn| {
                let tx = conn.transaction().map_err(wrap_err)?;
                let rows = tx
                    .execute(
                        schema::UPDATE_SUBSCRIPTION,
                        rusqlite::params![id, service_name, price, start_date, end_date, updated_at],
                    )
                    .map_err(wrap_err)?;
                if rows == 0 {
                    return Err(wrap_err(rusqlite::Error::QueryReturnedNoRows));
                }
                let updated = tx
                    .query_row(schema::SELECT_SUBSCRIPTION_BY_ID, [id], row_to_subscription)
                    .map_err(wrap_err)?;
                tx.commit().map_err(wrap_err)?;
                Ok(updated)
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error(e, id.to_string()))
    }

    async fn delete(&self, id: i64) -> Result<()> {
        self.conn
            .call(move |conn| {
                let rows = conn
                    .execute(schema::DELETE_SUBSCRIPTION, [id])
                    .map_err(wrap_err)?;
                if rows == 0 {
                    Err(wrap_err(rusqlite::Error::QueryReturnedNoRows))
                } else {
                    Ok(())
                }
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error(e, id.to_string()))
    }

    async fn list(&self, user_id: &str) -> Result<Vec<Subscription>> {
        let user_id = user_id.to_string();

        self.conn
            .call(move |conn| {
                let mut stmt = conn
                    .prepare(schema::SELECT_SUBSCRIPTIONS_BY_USER)
                    .map_err(wrap_err)?;
                let rows = stmt
                    .query_map([&user_id], row_to_subscription)
                    .map_err(wrap_err)?;

                let mut subscriptions = Vec::new();
                for row_result in rows {
                    subscriptions.push(row_result.map_err(wrap_err)?);
                }
                Ok(subscriptions)
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error(e, ""))
    }

    async fn summary(&self, user_id: &str, service_name: &str, range: SummaryRange) -> Result<i64> {
        let user_id = user_id.to_string();
        let service_name = service_name.to_string();
        let from = format_timestamp_date(&range.from);
        let to = format_timestamp_date(&range.to);

        self.conn
            .call(move |conn| {
                conn.query_row(
                    schema::SUM_SUBSCRIPTIONS,
                    rusqlite::params![user_id, service_name, from, to],
                    |row| row.get::<_, i64>(0),
                )
                .map_err(wrap_err)
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error(e, ""))
    }
}
