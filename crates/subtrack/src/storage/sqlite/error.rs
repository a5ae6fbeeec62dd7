//! SQLite error mapping.
//!
//! Maps `tokio_rusqlite::Error` and `rusqlite::Error` to `RepositoryError`
//! from `subtrack_core::storage`.

use subtrack_core::storage::RepositoryError;

/// Entity name reported in errors raised by this backend.
pub const SUBSCRIPTION: &str = "Subscription";

/// Maps a rusqlite error to a RepositoryError.
///
/// # Error Mapping
///
/// - `QueryReturnedNoRows` → `RepositoryError::NotFound`
/// - `SQLITE_CONSTRAINT_*` → `RepositoryError::InvalidData`
/// - `CannotOpen` → `RepositoryError::ConnectionFailed`
/// - Column conversion failures → `RepositoryError::Serialization`
/// - All other errors → `RepositoryError::QueryFailed`
fn map_rusqlite_error(err: &rusqlite::Error, id: &str) -> RepositoryError {
    match err {
        rusqlite::Error::QueryReturnedNoRows => RepositoryError::NotFound {
            entity_type: SUBSCRIPTION,
            id: id.to_string(),
        },

        rusqlite::Error::SqliteFailure(sqlite_err, _)
            if sqlite_err.code == rusqlite::ErrorCode::ConstraintViolation =>
        {
            RepositoryError::InvalidData(format!("Constraint violation for {SUBSCRIPTION}: {err}"))
        }

        rusqlite::Error::SqliteFailure(sqlite_err, _)
            if sqlite_err.code == rusqlite::ErrorCode::CannotOpen =>
        {
            RepositoryError::ConnectionFailed(format!("Cannot open database: {err}"))
        }

        rusqlite::Error::FromSqlConversionFailure(..)
        | rusqlite::Error::InvalidColumnType(..)
        | rusqlite::Error::IntegralValueOutOfRange(..) => {
            RepositoryError::Serialization(err.to_string())
        }

        _ => RepositoryError::QueryFailed(err.to_string()),
    }
}

/// Maps a tokio_rusqlite error to a RepositoryError.
///
/// `id` names the row involved, or is empty for multi-row queries.
pub fn map_tokio_rusqlite_error(err: tokio_rusqlite::Error, id: impl Into<String>) -> RepositoryError {
    let id = id.into();
    match &err {
        tokio_rusqlite::Error::Rusqlite(rusqlite_err) => map_rusqlite_error(rusqlite_err, &id),
        tokio_rusqlite::Error::ConnectionClosed | tokio_rusqlite::Error::Close(_) => {
            RepositoryError::ConnectionFailed("Connection closed unexpectedly".to_string())
        }
        _ => RepositoryError::QueryFailed(err.to_string()),
    }
}
