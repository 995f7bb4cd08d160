use crate::card::CardId;
use crate::reorder::ReorderRejection;
use thiserror::Error;

/// Result type for repository operations.
pub type Result<T> = std::result::Result<T, StorageError>;

/// Input validation failures for card title and URL.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CardError {
    #[error("title is required")]
    EmptyTitle,
    #[error("title must be at most {max} characters, got {actual}")]
    TitleTooLong { max: usize, actual: usize },
    #[error("URL must be an absolute http:// or https:// address: {0}")]
    InvalidUrl(String),
    #[error("URL must be at most {max} characters, got {actual}")]
    UrlTooLong { max: usize, actual: usize },
}

#[derive(Debug, Clone, Error)]
pub enum StorageError {
    #[error("card not found: {0}")]
    NotFound(CardId),
    #[error("reorder rejected: {0}")]
    Reorder(#[from] ReorderRejection),
    #[error("storage backend unavailable: {0}")]
    Unavailable(String),
    #[error("storage operation timed out: {0}")]
    Timeout(String),
    #[error("storage query failed: {0}")]
    Query(String),
    #[error("stored data is invalid: {0}")]
    InvalidData(String),
    #[error("storage operation failed: {0}")]
    Operation(String),
}

/// Errors surfaced by the [`Dashboard`](crate::Dashboard) service.
#[derive(Debug, Clone, Error)]
pub enum DashboardError {
    /// Client input is malformed; recoverable at the boundary.
    #[error("{0}")]
    Validation(String),
    /// The target card no longer exists.
    #[error("card not found: {0}")]
    NotFound(CardId),
    /// The proposed order is not a permutation of the current cards.
    #[error("invalid reorder payload: {0}")]
    Conflict(ReorderRejection),
    /// The storage engine failed; nothing local can fix this.
    #[error("storage error: {0}")]
    Storage(String),
}

impl From<CardError> for DashboardError {
    fn from(value: CardError) -> Self {
        Self::Validation(value.to_string())
    }
}

impl From<StorageError> for DashboardError {
    fn from(value: StorageError) -> Self {
        match value {
            StorageError::NotFound(id) => Self::NotFound(id),
            StorageError::Reorder(rejection) => Self::Conflict(rejection),
            other => Self::Storage(other.to_string()),
        }
    }
}
