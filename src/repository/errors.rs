use diesel::r2d2::PoolError;
use diesel::result::{DatabaseErrorKind, Error as DieselError};
use thiserror::Error;

/// Result type returned by every repository operation.
pub type RepositoryResult<T> = Result<T, RepositoryError>;

/// Failures surfaced by the repository. Constraint failures reported by
/// SQLite are classified so callers can tell bad input from broken plumbing.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// No row matched the requested key.
    #[error("record not found")]
    NotFound,
    /// A primary key or unique column already holds the value.
    #[error("unique constraint violated: {0}")]
    UniqueViolation(String),
    /// A foreign key points at a missing row, or a referenced row is still in use.
    #[error("foreign key constraint violated: {0}")]
    ForeignKeyViolation(String),
    /// A CHECK or NOT NULL constraint rejected the row.
    #[error("check constraint violated: {0}")]
    CheckViolation(String),
    /// The change was rejected before reaching the database.
    #[error("invalid change: {0}")]
    Validation(String),
    /// No connection could be checked out of the pool.
    #[error("connection pool error: {0}")]
    Pool(#[from] PoolError),
    #[error("database error: {0}")]
    Database(DieselError),
}

impl From<DieselError> for RepositoryError {
    fn from(value: DieselError) -> Self {
        match value {
            DieselError::NotFound => RepositoryError::NotFound,
            DieselError::DatabaseError(kind, info) => {
                let message = info.message().to_string();
                match kind {
                    DatabaseErrorKind::UniqueViolation => RepositoryError::UniqueViolation(message),
                    DatabaseErrorKind::ForeignKeyViolation => {
                        RepositoryError::ForeignKeyViolation(message)
                    }
                    DatabaseErrorKind::CheckViolation | DatabaseErrorKind::NotNullViolation => {
                        RepositoryError::CheckViolation(message)
                    }
                    other => RepositoryError::Database(DieselError::DatabaseError(other, info)),
                }
            }
            other => RepositoryError::Database(other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_is_classified() {
        let err = RepositoryError::from(DieselError::NotFound);
        assert!(matches!(err, RepositoryError::NotFound));
    }

    #[test]
    fn other_errors_are_wrapped() {
        let err = RepositoryError::from(DieselError::RollbackTransaction);
        assert!(matches!(err, RepositoryError::Database(_)));
    }
}
