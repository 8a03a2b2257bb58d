use serde::Serialize;
use thiserror::Error;

use super::ApiError;

#[derive(Error, Debug, Serialize)]
pub enum RepositoryError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Constraint violation: {0}")]
    ConstraintViolation(String),

    #[error("Illegal status transition: {0}")]
    InvalidTransition(String),

    #[error("Status conflict: {0}")]
    StatusConflict(String),
}

impl From<RepositoryError> for ApiError {
    fn from(error: RepositoryError) -> Self {
        match error {
            RepositoryError::NotFound(msg) => ApiError::NotFound(msg),
            RepositoryError::ConstraintViolation(msg)
            | RepositoryError::InvalidTransition(msg)
            | RepositoryError::StatusConflict(msg) => ApiError::InternalError(msg),
        }
    }
}
