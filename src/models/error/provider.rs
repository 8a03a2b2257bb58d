use serde::Serialize;
use thiserror::Error;

/// Errors surfaced by the external execution target.
///
/// `Transient` covers network faults and target unavailability and is safe to
/// retry. `Rejected` is the target refusing the payload outright.
/// `SequenceConflict` means the identity's sequence number was consumed by a
/// different transaction and the identity must be resynchronized.
#[derive(Error, Debug, Serialize)]
pub enum ProviderError {
    #[error("Transient provider error: {0}")]
    Transient(String),

    #[error("Submission rejected: {0}")]
    Rejected(String),

    #[error("Sequence conflict: {0}")]
    SequenceConflict(String),

    #[error("Invalid provider response: {0}")]
    InvalidResponse(String),
}
