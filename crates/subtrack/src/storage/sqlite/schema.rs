//! SQLite schema definitions and SQL query constants.
//!
//! Month/year columns hold `YYYY-MM-DD` text pinned to day 1, so plain string
//! comparison orders them chronologically. Timestamps are fixed-width RFC 3339.

/// SQL statement to create all tables.
pub const CREATE_TABLES: &str = r#"
CREATE TABLE IF NOT EXISTS subscriptions (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    service_name TEXT NOT NULL,
    price INTEGER NOT NULL,
    user_id TEXT NOT NULL,
    start_date TEXT NOT NULL,
    end_date TEXT,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_subscriptions_user_id ON subscriptions(user_id);
CREATE INDEX IF NOT EXISTS idx_subscriptions_user_service ON subscriptions(user_id, service_name);
"#;

pub const INSERT_SUBSCRIPTION: &str = r#"
INSERT INTO subscriptions (service_name, price, user_id, start_date, end_date, created_at, updated_at)
VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
"#;

pub const SELECT_SUBSCRIPTION_BY_ID: &str = r#"
SELECT id, service_name, price, user_id, start_date, end_date, created_at, updated_at
FROM subscriptions
WHERE id = ?1
"#;

pub const SELECT_SUBSCRIPTIONS_BY_USER: &str = r#"
SELECT id, service_name, price, user_id, start_date, end_date, created_at, updated_at
FROM subscriptions
WHERE user_id = ?1
ORDER BY created_at DESC, id DESC
"#;

pub const UPDATE_SUBSCRIPTION: &str = r#"
UPDATE subscriptions
SET service_name = ?2, price = ?3, start_date = ?4, end_date = ?5, updated_at = ?6
WHERE id = ?1
"#;

pub const DELETE_SUBSCRIPTION: &str = r#"
DELETE FROM subscriptions WHERE id = ?1
"#;

/// Parameters: user_id, service filter ('' = any), range start, range end.
pub const SUM_SUBSCRIPTIONS: &str = r#"
SELECT COALESCE(SUM(price), 0)
FROM subscriptions
WHERE user_id = ?1
  AND (?2 = '' OR service_name = ?2)
  AND start_date <= ?4
  AND (end_date IS NULL OR end_date >= ?3)
"#;
