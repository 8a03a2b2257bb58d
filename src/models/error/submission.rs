use serde::Serialize;
use thiserror::Error;

use super::{ProviderError, RepositoryError, SignerError};
use crate::models::FailureReason;

/// Failures on the submission path. Transient variants are retried inside the
/// engine's per-transaction budget; the rest are terminal for the attempt or
/// for the whole transaction.
#[derive(Error, Debug, Serialize)]
pub enum SubmissionError {
    #[error("Transaction expired before submission: executeBefore {execute_before}, now {now}")]
    Expired { execute_before: u64, now: u64 },

    #[error("Sequence conflict on submission identity: {0}")]
    SequenceConflict(String),

    #[error("Target rejected submission: {0}")]
    TargetRejected(String),

    #[error("Execution reverted on target: {0}")]
    TargetReverted(String),

    #[error("No confirmation within watch timeout after {attempts} attempts")]
    WatchTimeout { attempts: u32 },

    #[error("No submission identity available")]
    NoIdentityAvailable,

    #[error("Transient target error: {0}")]
    Transient(String),

    #[error("Signer error: {0}")]
    Signer(#[from] SignerError),

    #[error("Internal submission error: {0}")]
    Internal(String),
}

impl SubmissionError {
    /// Reason recorded on the transaction when this error ends it.
    pub fn failure_reason(&self) -> FailureReason {
        match self {
            SubmissionError::Expired { .. } => FailureReason::Expired,
            SubmissionError::SequenceConflict(_) => FailureReason::SequenceConflict,
            SubmissionError::TargetRejected(_) => FailureReason::TargetRejected,
            SubmissionError::TargetReverted(_) => FailureReason::TargetReverted,
            SubmissionError::WatchTimeout { .. } => FailureReason::WatchTimeout,
            SubmissionError::NoIdentityAvailable
            | SubmissionError::Transient(_)
            | SubmissionError::Signer(_)
            | SubmissionError::Internal(_) => FailureReason::Internal,
        }
    }

    /// Whether another submission attempt may fix this error.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            SubmissionError::Transient(_) | SubmissionError::TargetRejected(_)
        )
    }
}

impl From<ProviderError> for SubmissionError {
    fn from(error: ProviderError) -> Self {
        match error {
            ProviderError::SequenceConflict(msg) => SubmissionError::SequenceConflict(msg),
            ProviderError::Rejected(msg) => SubmissionError::TargetRejected(msg),
            ProviderError::Transient(msg) | ProviderError::InvalidResponse(msg) => {
                SubmissionError::Transient(msg)
            }
        }
    }
}

impl From<RepositoryError> for SubmissionError {
    fn from(error: RepositoryError) -> Self {
        SubmissionError::Internal(error.to_string())
    }
}
