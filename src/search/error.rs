//! Error types for search operations

use crate::error::AppError;
use crate::models::EntityType;

/// Result type for search operations
pub type SearchResult<T> = std::result::Result<T, SearchError>;

/// Errors that can occur during search operations
#[derive(Debug, thiserror::Error)]
pub enum SearchError {
    /// The request itself is unusable
    #[error("Invalid search request: {0}")]
    InvalidRequest(String),

    /// Fetching candidates or previews for one entity type failed
    #[error("Repository failure for {entity_type}: {message}")]
    Repository {
        entity_type: EntityType,
        message: String,
    },

    /// The task searching one entity type did not finish
    #[error("Search task for {entity_type} failed: {message}")]
    TaskFailed {
        entity_type: EntityType,
        message: String,
    },
}

impl From<validator::ValidationErrors> for SearchError {
    fn from(err: validator::ValidationErrors) -> Self {
        SearchError::InvalidRequest(err.to_string())
    }
}

impl From<SearchError> for AppError {
    fn from(err: SearchError) -> Self {
        match err {
            SearchError::InvalidRequest(msg) => AppError::Validation(msg),
            SearchError::Repository { .. } => AppError::Repository(err.to_string()),
            SearchError::TaskFailed { .. } => AppError::Internal(err.to_string()),
        }
    }
}
