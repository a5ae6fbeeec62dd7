use thiserror::Error;

/// Errors that can occur during repository operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RepositoryError {
    #[error("{entity_type} not found: {id}")]
    NotFound {
        entity_type: &'static str,
        id: String,
    },
    #[error("{entity_type} already exists: {id}")]
    AlreadyExists {
        entity_type: &'static str,
        id: String,
    },
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),
    #[error("Query failed: {0}")]
    QueryFailed(String),
    #[error("Serialization error: {0}")]
    Serialization(String),
    #[error("Invalid data: {0}")]
    InvalidData(String),
}

impl RepositoryError {
    /// Shorthand for a missing subscription.
    pub fn subscription_not_found(id: i64) -> Self {
        RepositoryError::NotFound {
            entity_type: "Subscription",
            id: id.to_string(),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, RepositoryError::NotFound { .. })
    }
}

/// Result type for repository operations.
pub type Result<T> = std::result::Result<T, RepositoryError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_repository_error_not_found_display() {
        let error = RepositoryError::subscription_not_found(42);
        assert_eq!(error.to_string(), "Subscription not found: 42");
        assert!(error.is_not_found());
    }

    #[test]
    fn test_repository_error_already_exists_display() {
        let error = RepositoryError::AlreadyExists {
            entity_type: "Subscription",
            id: "7".to_string(),
        };
        assert_eq!(error.to_string(), "Subscription already exists: 7");
        assert!(!error.is_not_found());
    }

    #[test]
    fn test_repository_error_connection_failed_display() {
        let error = RepositoryError::ConnectionFailed("database is locked".to_string());
        assert_eq!(error.to_string(), "Connection failed: database is locked");
    }

    #[test]
    fn test_repository_error_query_failed_display() {
        let error = RepositoryError::QueryFailed("no such table".to_string());
        assert_eq!(error.to_string(), "Query failed: no such table");
    }

    #[test]
    fn test_repository_error_serialization_display() {
        let error = RepositoryError::Serialization("bad timestamp".to_string());
        assert_eq!(error.to_string(), "Serialization error: bad timestamp");
    }

    #[test]
    fn test_repository_error_invalid_data_display() {
        let error = RepositoryError::InvalidData("date out of range".to_string());
        assert_eq!(error.to_string(), "Invalid data: date out of range");
    }
}
