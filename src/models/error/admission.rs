use serde::Serialize;
use thiserror::Error;

use super::{ApiError, AuthError, RepositoryError};

/// Reasons an intent is refused at admission. All permanent: the caller must
/// resubmit with corrected fields.
#[derive(Error, Debug, Serialize)]
pub enum AdmissionError {
    #[error("Invalid signature: {0}")]
    InvalidSignature(String),

    #[error("Invalid validity window: executeAfter {execute_after} >= executeBefore {execute_before}")]
    InvalidWindow {
        execute_after: u64,
        execute_before: u64,
    },

    #[error("Intent not yet valid: executeAfter {execute_after}, now {now}")]
    NotYetValid { execute_after: u64, now: u64 },

    #[error("Intent expired: executeBefore {execute_before}, now {now}")]
    Expired { execute_before: u64, now: u64 },

    #[error("Nonce mismatch for user: expected {expected}, provided {provided}")]
    NonceMismatch { expected: u64, provided: u64 },

    #[error("Internal admission error: {0}")]
    Internal(String),
}

impl From<AuthError> for AdmissionError {
    fn from(error: AuthError) -> Self {
        AdmissionError::InvalidSignature(error.to_string())
    }
}

impl From<RepositoryError> for AdmissionError {
    fn from(error: RepositoryError) -> Self {
        AdmissionError::Internal(error.to_string())
    }
}

impl From<AdmissionError> for ApiError {
    fn from(error: AdmissionError) -> Self {
        match error {
            AdmissionError::NonceMismatch { .. } => ApiError::Conflict(error.to_string()),
            AdmissionError::Internal(msg) => ApiError::InternalError(msg),
            _ => ApiError::BadRequest(error.to_string()),
        }
    }
}
