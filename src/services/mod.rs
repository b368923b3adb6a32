//! Use cases behind the HTTP handlers.
//!
//! Services are generic over the repository traits they need so they can be
//! exercised with mocks. Each one turns request parameters into repository
//! queries and repository failures into [`ServiceError`]s.

use serde::Deserialize;
use thiserror::Error;

use crate::pagination::{DEFAULT_ITEMS_PER_PAGE, MAX_ITEMS_PER_PAGE, Pagination};
use crate::repository::RepositoryError;

pub mod catalog;
pub mod inventory;
pub mod maintenance;
pub mod orders;
pub mod people;
pub mod stores;

/// Result type returned by service functions.
pub type ServiceResult<T> = Result<T, ServiceError>;

/// Failures a service reports to its caller.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("not found")]
    NotFound,
    /// Submitted data failed validation.
    #[error("invalid form: {0}")]
    Form(String),
    /// The request is well formed but clashes with the stored data.
    #[error("conflict: {0}")]
    Conflict(String),
    #[error("internal error: {0}")]
    Internal(String),
}

impl From<RepositoryError> for ServiceError {
    fn from(value: RepositoryError) -> Self {
        match value {
            RepositoryError::NotFound => ServiceError::NotFound,
            RepositoryError::UniqueViolation(message)
            | RepositoryError::ForeignKeyViolation(message)
            | RepositoryError::CheckViolation(message)
            | RepositoryError::Validation(message) => ServiceError::Conflict(message),
            other => ServiceError::Internal(other.to_string()),
        }
    }
}

/// Paging parameters shared by the list endpoints.
#[derive(Debug, Default, Clone, Copy, Deserialize)]
pub struct PageQuery {
    /// Requested page (1-based).
    pub page: Option<usize>,
    pub per_page: Option<usize>,
}

impl PageQuery {
    /// Resolve the requested page, falling back to the first page of
    /// [`DEFAULT_ITEMS_PER_PAGE`] rows. Page sizes are capped at
    /// [`MAX_ITEMS_PER_PAGE`].
    pub fn pagination(&self) -> Pagination {
        let page = self.page.unwrap_or(1).max(1);
        let per_page = self
            .per_page
            .filter(|per_page| *per_page > 0)
            .unwrap_or(DEFAULT_ITEMS_PER_PAGE)
            .min(MAX_ITEMS_PER_PAGE);
        Pagination::new(page, per_page)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn constraint_failures_become_conflicts() {
        let err = ServiceError::from(RepositoryError::ForeignKeyViolation("fk".into()));
        assert!(matches!(err, ServiceError::Conflict(message) if message == "fk"));

        let err = ServiceError::from(RepositoryError::Validation("loop".into()));
        assert!(matches!(err, ServiceError::Conflict(_)));

        assert!(matches!(
            ServiceError::from(RepositoryError::NotFound),
            ServiceError::NotFound
        ));
    }

    #[test]
    fn page_query_defaults() {
        let pagination = PageQuery::default().pagination();
        assert_eq!(pagination, Pagination::new(1, DEFAULT_ITEMS_PER_PAGE));

        let pagination = PageQuery {
            page: Some(0),
            per_page: Some(0),
        }
        .pagination();
        assert_eq!(pagination, Pagination::new(1, DEFAULT_ITEMS_PER_PAGE));

        let pagination = PageQuery {
            page: Some(3),
            per_page: Some(5),
        }
        .pagination();
        assert_eq!(pagination, Pagination::new(3, 5));
    }

    #[test]
    fn page_size_is_capped() {
        let pagination = PageQuery {
            page: Some(usize::MAX),
            per_page: Some(usize::MAX),
        }
        .pagination();
        assert_eq!(pagination, Pagination::new(usize::MAX, MAX_ITEMS_PER_PAGE));
        assert_eq!(pagination.limit(), MAX_ITEMS_PER_PAGE as i64);
        assert_eq!(pagination.offset(), i64::MAX);
    }
}
