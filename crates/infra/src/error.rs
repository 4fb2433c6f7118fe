//! Store operation errors (infrastructure, not domain).

use thiserror::Error;

/// Error raised by a store implementation.
#[derive(Debug, Error)]
pub enum StoreError {
    /// A database constraint rejected the write (unknown manager/restaurant
    /// id, non-positive amount, ...).
    #[error("constraint violation: {0}")]
    Constraint(String),

    /// The backend is unreachable or a query failed.
    #[error("storage failure: {0}")]
    Storage(String),
}

impl StoreError {
    pub fn constraint(msg: impl Into<String>) -> Self {
        Self::Constraint(msg.into())
    }

    pub fn storage(msg: impl Into<String>) -> Self {
        Self::Storage(msg.into())
    }
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        match &err {
            sqlx::Error::Database(db) => match db.kind() {
                sqlx::error::ErrorKind::ForeignKeyViolation
                | sqlx::error::ErrorKind::UniqueViolation
                | sqlx::error::ErrorKind::NotNullViolation
                | sqlx::error::ErrorKind::CheckViolation => {
                    StoreError::Constraint(db.message().to_string())
                }
                _ => StoreError::Storage(err.to_string()),
            },
            _ => StoreError::Storage(err.to_string()),
        }
    }
}
