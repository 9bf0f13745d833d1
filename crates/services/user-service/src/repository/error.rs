//! Errors returned by every `UserRepository` implementation.
//!
//! Callers match on [`ErrorKind`], never on message text. Backing-store
//! failures keep the underlying error as `source` for diagnostics.

use std::error::Error as StdError;

use thiserror::Error;

use common::AppError;

type BoxError = Box<dyn StdError + Send + Sync + 'static>;

/// Closed set of repository failure kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    AlreadyExists,
    NotFound,
    Unavailable,
    Internal,
    Cancelled,
    DeadlineExceeded,
}

/// Repository error with an optional underlying cause.
#[derive(Error, Debug)]
pub enum RepositoryError {
    /// Email (or a caller-supplied id) already belongs to a live user
    #[error("user already exists")]
    AlreadyExists,

    /// Update/delete target has no live record
    #[error("user not found")]
    NotFound,

    /// Backing store could not be reached
    #[error("store unavailable")]
    Unavailable(#[source] BoxError),

    /// Backing store failed while serving a valid request
    #[error("store failure")]
    Internal(#[source] BoxError),

    /// Execution context was cancelled
    #[error("operation cancelled")]
    Cancelled,

    /// Execution context deadline passed
    #[error("deadline exceeded")]
    DeadlineExceeded,
}

impl RepositoryError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            RepositoryError::AlreadyExists => ErrorKind::AlreadyExists,
            RepositoryError::NotFound => ErrorKind::NotFound,
            RepositoryError::Unavailable(_) => ErrorKind::Unavailable,
            RepositoryError::Internal(_) => ErrorKind::Internal,
            RepositoryError::Cancelled => ErrorKind::Cancelled,
            RepositoryError::DeadlineExceeded => ErrorKind::DeadlineExceeded,
        }
    }

    pub fn is(&self, kind: ErrorKind) -> bool {
        self.kind() == kind
    }

    pub fn unavailable(err: impl Into<BoxError>) -> Self {
        RepositoryError::Unavailable(err.into())
    }

    pub fn internal(err: impl Into<BoxError>) -> Self {
        RepositoryError::Internal(err.into())
    }
}

/// Result type alias for repository operations
pub type RepoResult<T> = Result<T, RepositoryError>;

impl From<RepositoryError> for AppError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::AlreadyExists => AppError::conflict("User"),
            RepositoryError::NotFound => AppError::not_found("User"),
            RepositoryError::Cancelled | RepositoryError::DeadlineExceeded => {
                AppError::service_unavailable(err.to_string())
            }
            RepositoryError::Unavailable(source) => {
                AppError::service_unavailable(format!("store unavailable: {}", source))
            }
            RepositoryError::Internal(source) => {
                AppError::internal(format!("store failure: {}", source))
            }
        }
    }
}
