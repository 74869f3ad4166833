//! Error taxonomy of the suggestion-box engine.

use thiserror::Error;

use crate::blob::BlobError;
use crate::store::StoreError;

/// Failure of an engine operation. Every variant aborts the enclosing
/// transaction; nothing the operation wrote is persisted.
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Unauthenticated")]
    Unauthenticated,

    #[error("User not found")]
    UserNotFound,

    #[error("{0} not found")]
    NotFound(&'static str),

    #[error("Only the owner may modify this {0}")]
    Unauthorized(&'static str),

    #[error("You cannot join your own {0}")]
    SelfJoinForbidden(&'static str),

    #[error("You already requested to join this suggestion")]
    DuplicateRequest,

    #[error("You do not have access to this {0}")]
    NoAccess(&'static str),

    #[error("Image not found")]
    ImageNotFound,

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Storage error: {0}")]
    Store(StoreError),

    #[error("Blob store error: {0}")]
    Blob(#[from] BlobError),
}

impl From<StoreError> for DomainError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Conflict(msg) => DomainError::Conflict(msg),
            other => DomainError::Store(other),
        }
    }
}

impl From<validator::ValidationErrors> for DomainError {
    fn from(err: validator::ValidationErrors) -> Self {
        DomainError::Validation(err.to_string())
    }
}

pub type DomainResult<T> = Result<T, DomainError>;
