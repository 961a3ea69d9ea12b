//! # Store Errors
//!
//! ## Where They Come From and Where They Go
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  sqlx::Error / MigrateError        ValidationError (bakery-core)       │
//! │       │                                   │                             │
//! │       ▼                                   ▼                             │
//! │  DbError ◄── repositories add referential errors of their own          │
//! │       │                                                                 │
//! │       ├── recoverable (validation, referential, not found)             │
//! │       │      └─► shell prints the message, user keeps going            │
//! │       │                                                                 │
//! │       └── fatal (connection, migration, query)                         │
//! │              └─► CliError ─► logged, non-zero exit code                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use bakery_core::ValidationError;
use thiserror::Error;

/// Everything a repository call can fail with.
#[derive(Debug, Error)]
pub enum DbError {
    /// Lookups by id return `Ok(None)` instead; this only surfaces when sqlx
    /// itself reports a missing row.
    #[error("{entity} not found: {id}")]
    NotFound { entity: String, id: String },

    /// The entity failed its field rules and was not written.
    #[error("Invalid data: {0}")]
    Validation(#[from] ValidationError),

    /// A write names a customer or product that is not stored.
    ///
    /// ## When This Occurs
    /// - Order for a customer that does not exist
    /// - Order line for a product that does not exist
    #[error("Foreign key violation: {message}")]
    ForeignKeyViolation { message: String },

    /// Delete refused because other rows still point at the entity.
    ///
    /// ## When This Occurs
    /// - Deleting a customer who still has orders
    /// - Deleting a product that appears on an order line
    #[error("{entity} {id} is still referenced by {dependents} {dependent_kind}")]
    StillReferenced {
        entity: String,
        id: i64,
        dependents: i64,
        dependent_kind: String,
    },

    /// The store could not be opened or the pool is closed.
    ///
    /// ## When This Occurs
    /// - Database file can't be created (missing directory, permissions)
    /// - Disk full
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    #[error("Migration failed: {0}")]
    MigrationFailed(String),

    /// SQLite rejected a statement for a reason other than a reference.
    #[error("Query failed: {0}")]
    QueryFailed(String),

    /// Transaction could not be started or committed.
    #[error("Transaction failed: {0}")]
    TransactionFailed(String),

    /// No connection became free within the acquire timeout.
    #[error("Connection pool exhausted")]
    PoolExhausted,

    #[error("Internal database error: {0}")]
    Internal(String),
}

impl DbError {
    /// `NotFound` for `entity` with any displayable id.
    pub fn not_found(entity: impl Into<String>, id: impl ToString) -> Self {
        DbError::NotFound {
            entity: entity.into(),
            id: id.to_string(),
        }
    }

    /// `ForeignKeyViolation` with a message naming the missing row.
    pub fn missing_reference(message: impl Into<String>) -> Self {
        DbError::ForeignKeyViolation {
            message: message.into(),
        }
    }

    /// True for errors the user can correct and retry; the rest mean the
    /// store itself is unusable.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            DbError::NotFound { .. }
                | DbError::Validation(_)
                | DbError::ForeignKeyViolation { .. }
                | DbError::StillReferenced { .. }
        )
    }
}

/// ```text
/// RowNotFound                         → NotFound
/// Database("FOREIGN KEY ... failed")  → ForeignKeyViolation
/// Database(anything else)             → QueryFailed
/// PoolTimedOut                        → PoolExhausted
/// PoolClosed                          → ConnectionFailed
/// other                               → Internal
/// ```
impl From<sqlx::Error> for DbError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => DbError::not_found("Record", "unknown"),

            sqlx::Error::Database(db_err) => {
                let msg = db_err.message();

                // "FOREIGN KEY constraint failed" is all SQLite says; the
                // repositories check references first to give a better message.
                if msg.contains("FOREIGN KEY constraint failed") {
                    DbError::ForeignKeyViolation {
                        message: msg.to_string(),
                    }
                } else {
                    DbError::QueryFailed(msg.to_string())
                }
            }

            sqlx::Error::PoolTimedOut => DbError::PoolExhausted,

            sqlx::Error::PoolClosed => DbError::ConnectionFailed("Pool is closed".to_string()),

            _ => DbError::Internal(err.to_string()),
        }
    }
}

impl From<sqlx::migrate::MigrateError> for DbError {
    fn from(err: sqlx::migrate::MigrateError) -> Self {
        DbError::MigrationFailed(err.to_string())
    }
}

/// Result type for database operations.
pub type DbResult<T> = Result<T, DbError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_still_referenced_message() {
        let err = DbError::StillReferenced {
            entity: "Customer".to_string(),
            id: 3,
            dependents: 2,
            dependent_kind: "order(s)".to_string(),
        };
        assert_eq!(err.to_string(), "Customer 3 is still referenced by 2 order(s)");
        assert!(err.is_recoverable());
    }

    #[test]
    fn test_fatal_errors_are_not_recoverable() {
        assert!(!DbError::ConnectionFailed("disk".into()).is_recoverable());
        assert!(!DbError::from(sqlx::Error::PoolTimedOut).is_recoverable());
        assert!(DbError::missing_reference("customer 9 does not exist").is_recoverable());
    }
}
